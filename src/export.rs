//! INI export.
//!
//! [`export_ini`] renders a record through an ordered specification list,
//! the inverse of [`import_ini`](crate::import_ini). Keys containing the
//! separator are grouped under a section header named by the part before
//! it; unsectioned keys come first, wherever they sit in the list, then
//! the sections in the order their first key does. Descriptions
//! become `#` comment lines above their entry, and unassigned optional
//! fields come out as commented placeholders, so the output doubles as a
//! template a user can fill in.

use indexmap::IndexMap;

use crate::error::{Failure, FailureKind};
use crate::spec::Specification;
use crate::writer::Writer;

/// Render `record` as INI text, in specification order.
///
/// Each specification contributes one entry: its description as `#`
/// lines, then `local = value`. An empty value leaves nothing after the
/// `=`. An unassigned optional field contributes `# local =` instead.
/// Any other write failure aborts the export.
///
/// Unsectioned entries are always emitted before the first section
/// header, so the output re-imports cleanly no matter how the
/// specifications are interleaved.
pub fn export_ini<R: 'static>(
    record: &R,
    specs: &[Specification<R>],
    writer: &Writer,
    separator: &str,
) -> Result<String, Failure> {
    let mut groups: IndexMap<String, String> = IndexMap::new();

    for spec in specs {
        let (section, local) = match spec.key().split_once(separator) {
            Some((section, local)) => (section, local),
            None => ("", spec.key()),
        };

        let mut entry = String::new();
        for line in spec.description().lines() {
            entry.push_str("# ");
            entry.push_str(line);
            entry.push('\n');
        }
        match spec.write(record, writer) {
            Ok(text) => {
                entry.push_str(local);
                entry.push_str(" =");
                if !text.is_empty() {
                    entry.push(' ');
                    entry.push_str(&text);
                }
                entry.push('\n');
            }
            Err(e) if e.kind == FailureKind::EmptyOptional => {
                entry.push_str("# ");
                entry.push_str(local);
                entry.push_str(" =\n");
            }
            Err(e) => return Err(e),
        }

        let group = groups.entry(section.to_string()).or_default();
        if !group.is_empty() {
            group.push('\n');
        }
        group.push_str(&entry);
    }

    let mut out = String::new();
    if let Some(content) = groups.shift_remove("") {
        out.push_str(&content);
    }
    for (section, content) in &groups {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push('[');
        out.push_str(section);
        out.push_str("]\n\n");
        out.push_str(content);
    }
    Ok(out)
}
