//! # paramini demo application
//!
//! A sample tool that showcases how to integrate
//! [paramini](https://docs.rs/paramini) into a real application. This is
//! **not** a real app. It exists purely to demonstrate and manually verify
//! paramini's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example paramini_demo -- template > demo.inp
//! cargo run --example paramini_demo -- show demo.inp
//! cargo run --example paramini_demo -- show demo.inp display.color=red
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature               | How to exercise it                                              |
//! |-----------------------|-----------------------------------------------------------------|
//! | Template export       | `cargo run --example paramini_demo -- template`                 |
//! | INI import            | `show demo.inp` after editing the template                      |
//! | Located failures      | Put `port = 80` in the file; the caret points at the `80`       |
//! | Collected failures    | Break several lines at once; every one is reported              |
//! | Command-line override | `show demo.inp server.port=9999`                                |
//! | Bool section          | Add a `[verbose]` line to the file                              |
//! | Relative sections     | A `[.name]` header resolves against the last absolute section   |
//! | Defaulted sentinel    | `display.width=auto` returns the width to its fallback          |
//! | Single key lookup     | `get display.color demo.inp`                                    |
//! | Final validation      | Validators re-run over the whole record after every source      |

mod config;

use std::process::ExitCode;

use paramini::{
    Failure, FailureKind, IniImporter, IniRecordKind, export_ini, import_key_value,
    validate_record,
};

use config::{DemoParams, demo_map, demo_reader, demo_specs, demo_writer};

// ---------------------------------------------------------------------------
// Import plumbing
// ---------------------------------------------------------------------------

/// Import `text`, collecting failures instead of stopping, with one house
/// rule on top of the stock dialect: a section name starting with `.` is
/// relative to the last absolute section, so `[server]` followed by
/// `[.timeout]` behaves like `[server.timeout]`.
fn import_with_relative_sections(
    params: &mut DemoParams,
    text: &str,
    source: &str,
) -> Vec<Failure> {
    let map = demo_map();
    let reader = demo_reader();
    let mut importer = IniImporter::new(text).separator(".").source_name(source);
    let mut failures = Vec::new();
    let mut base = String::new();
    loop {
        match importer.run_one(params, &map, &reader) {
            Ok(IniRecordKind::Eof) => return failures,
            Ok(IniRecordKind::Section) => {
                let name = importer.section().to_string();
                match name.strip_prefix('.') {
                    Some(rest) if !base.is_empty() => {
                        importer.set_section(format!("{base}.{rest}"));
                    }
                    Some(rest) => importer.set_section(rest.to_string()),
                    None => base = name,
                }
            }
            Ok(_) => {}
            Err(e) => failures.push(e),
        }
    }
}

/// Fill `params` from an optional file plus `key=value` overrides, then
/// re-validate the whole record. Reports every failure before giving up.
fn load(params: &mut DemoParams, args: &[String]) -> Result<(), ExitCode> {
    let map = demo_map();
    let reader = demo_reader();
    let mut failures = Vec::new();

    let (files, overrides): (Vec<&String>, Vec<&String>) =
        args.iter().partition(|a| !a.contains('='));
    if files.len() > 1 {
        eprintln!("at most one parameter file, got {}", files.len());
        return Err(ExitCode::FAILURE);
    }

    if let Some(path) = files.first() {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{path}: {e}");
                return Err(ExitCode::FAILURE);
            }
        };
        failures.extend(import_with_relative_sections(params, &text, path.as_str()));
    }
    for assignment in &overrides {
        if let Err(e) = import_key_value(params, &map, &reader, assignment, "=") {
            failures.push(e);
        }
    }
    failures.extend(validate_record(params, &demo_specs()));

    if failures.is_empty() {
        return Ok(());
    }
    for failure in &failures {
        eprint!("{}", failure.explain(true));
    }
    Err(ExitCode::FAILURE)
}

// ---------------------------------------------------------------------------
// ANSI color helpers
// ---------------------------------------------------------------------------

fn ansi_color_code(name: &str) -> &str {
    match name {
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn template() -> ExitCode {
    match export_ini(&DemoParams::default(), &demo_specs(), &demo_writer(), ".") {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("template export failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn show(args: &[String]) -> ExitCode {
    let mut params = DemoParams::default();
    if let Err(code) = load(&mut params, args) {
        return code;
    }

    let color = ansi_color_code(&params.display.color);
    if params.verbose {
        println!(
            "{color}[verbose] Resolved parameters for {:?}{RESET}",
            params.name
        );
        println!();
    }

    let writer = demo_writer();
    let mut entries = Vec::new();
    for spec in demo_specs() {
        let value = match spec.write(&params, &writer) {
            Ok(text) => text,
            Err(e) if e.kind == FailureKind::EmptyOptional => "(unset)".to_string(),
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        };
        entries.push((spec.key().to_string(), value));
    }

    if params.display.format == "plain" {
        for (key, value) in &entries {
            println!("{key}={value}");
        }
    } else {
        let max_key_len = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in &entries {
            println!("{color}{key:<max_key_len$}{RESET}  {value}");
        }
    }
    ExitCode::SUCCESS
}

fn get(args: &[String]) -> ExitCode {
    let Some(key) = args.first() else {
        return usage();
    };
    let mut params = DemoParams::default();
    if let Err(code) = load(&mut params, &args[1..]) {
        return code;
    }

    match demo_map().write(&params, key, &demo_writer()) {
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(e) if e.kind == FailureKind::EmptyOptional => {
            println!("(unset)");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn usage() -> ExitCode {
    eprintln!("usage: paramini_demo template");
    eprintln!("       paramini_demo show [FILE] [KEY=VALUE ...]");
    eprintln!("       paramini_demo get KEY [FILE] [KEY=VALUE ...]");
    ExitCode::FAILURE
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        return usage();
    };
    match command.as_str() {
        "template" => template(),
        "show" => show(rest),
        "get" => get(rest),
        _ => usage(),
    }
}
