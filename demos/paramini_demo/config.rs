//! Parameter definitions for the paramini demo application.
//!
//! The demo models a small multi-level record: the root [`DemoParams`]
//! holds two nested records, [`ServerParams`] and [`DisplayParams`]. The
//! structs are plain; everything the demo does with them goes through the
//! specification list built in [`demo_specs`].
//!
//! # Key mapping
//!
//! With the `.` separator, the INI file sections map to nested fields:
//!
//! | INI key                  | Field                    |
//! |--------------------------|--------------------------|
//! | `name`                   | `name`                   |
//! | `verbose`                | `verbose`                |
//! | `server.host`            | `server.host`            |
//! | `server.port`            | `server.port`            |
//! | `server.max_connections` | `server.max_connections` |
//! | `server.timeout`         | `server.timeout`         |
//! | `display.color`          | `display.color`          |
//! | `display.format`         | `display.format`         |
//! | `display.width`          | `display.width`          |

use paramini::{
    Defaulted, Reader, Specification, SpecificationMap, Validator, Writer, bind, bind_defaulted,
    bind_optional, default_reader, default_writer, keys_lowercase_nospace, read_defaulted,
    write_defaulted,
};

pub const COLORS: &[&str] = &[
    "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// Width values below this render unreadably; the validator floors there.
const MIN_WIDTH: u16 = 20;

/// Server-related parameters, addressed as `server.*`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerParams {
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Unset means no limit.
    pub timeout: Option<u32>,
}

impl Default for ServerParams {
    fn default() -> Self {
        ServerParams {
            host: "127.0.0.1".into(),
            port: 3000,
            max_connections: 100,
            timeout: None,
        }
    }
}

/// Display and formatting parameters, addressed as `display.*`.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayParams {
    pub color: String,
    pub format: String,
    /// `auto` in a file returns the width to its fallback.
    pub width: Defaulted<u16>,
}

impl Default for DisplayParams {
    fn default() -> Self {
        DisplayParams {
            color: "yellow".into(),
            format: "pretty".into(),
            width: Defaulted::new(80),
        }
    }
}

/// Root record for the demo application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoParams {
    pub name: String,
    pub verbose: bool,
    pub server: ServerParams,
    pub display: DisplayParams,
}

pub fn server_specs() -> Vec<Specification<ServerParams>> {
    vec![
        Specification::new(
            "host",
            bind(|s: &ServerParams| &s.host, |s: &mut ServerParams| &mut s.host),
            Validator::nonempty(),
        )
        .describe("Hostname to bind to."),
        Specification::new(
            "port",
            bind(|s: &ServerParams| &s.port, |s: &mut ServerParams| &mut s.port),
            Validator::at_least(1024u16),
        )
        .describe("Port number. Ports below 1024 need privileges the demo does not have."),
        Specification::new(
            "max_connections",
            bind(
                |s: &ServerParams| &s.max_connections,
                |s: &mut ServerParams| &mut s.max_connections,
            ),
            Validator::nonzero(),
        )
        .describe("Maximum number of allowed connections."),
        Specification::new(
            "timeout",
            bind_optional(
                |s: &ServerParams| &s.timeout,
                |s: &mut ServerParams| &mut s.timeout,
            ),
            Validator::nonzero(),
        )
        .describe("Request timeout in seconds. Leave unset for no limit."),
    ]
}

pub fn display_specs() -> Vec<Specification<DisplayParams>> {
    vec![
        Specification::new(
            "color",
            bind(
                |d: &DisplayParams| &d.color,
                |d: &mut DisplayParams| &mut d.color,
            ),
            Validator::require(
                |c: &String| COLORS.contains(&c.as_str()),
                "one of red, green, yellow, blue, magenta, cyan, white",
            ),
        )
        .describe("Terminal color for the show command output."),
        Specification::new(
            "format",
            bind(
                |d: &DisplayParams| &d.format,
                |d: &mut DisplayParams| &mut d.format,
            ),
            Validator::require(
                |f: &String| f == "pretty" || f == "plain",
                "pretty or plain",
            ),
        )
        .describe("Output format (pretty or plain)."),
        Specification::new(
            "width",
            bind_defaulted(
                |d: &DisplayParams| &d.width,
                |d: &mut DisplayParams| &mut d.width,
            ),
            Validator::at_least(MIN_WIDTH).defaulted(),
        )
        .describe("Output width in columns. Write `auto` to return to the default."),
    ]
}

/// Every demo parameter, nested records flattened through delegation.
pub fn demo_specs() -> Vec<Specification<DemoParams>> {
    let mut specs = vec![
        Specification::new(
            "name",
            bind(|p: &DemoParams| &p.name, |p: &mut DemoParams| &mut p.name),
            Validator::nonempty(),
        )
        .describe("Application name shown in the banner."),
        Specification::new(
            "verbose",
            bind(
                |p: &DemoParams| &p.verbose,
                |p: &mut DemoParams| &mut p.verbose,
            ),
            Validator::accept(),
        )
        .describe("Enable verbose output. `[verbose]` on a line of its own also works."),
    ];
    for spec in server_specs() {
        specs.push(Specification::delegate(
            format!("server.{}", spec.key()),
            |p: &DemoParams| &p.server,
            |p: &mut DemoParams| &mut p.server,
            spec,
        ));
    }
    for spec in display_specs() {
        specs.push(Specification::delegate(
            format!("display.{}", spec.key()),
            |p: &DemoParams| &p.display,
            |p: &mut DemoParams| &mut p.display,
            spec,
        ));
    }
    specs
}

pub fn demo_map() -> SpecificationMap<DemoParams> {
    SpecificationMap::with_canonical_keys(demo_specs(), keys_lowercase_nospace)
        .unwrap_or_else(|e| panic!("{e}"))
}

/// Default registry plus the `auto` sentinel for the width field.
pub fn demo_reader() -> Reader {
    default_reader()
        .clone()
        .with_recursive(read_defaulted::<u16>("auto"))
}

pub fn demo_writer() -> Writer {
    default_writer()
        .clone()
        .with_recursive(write_defaulted::<u16>("auto"))
}
