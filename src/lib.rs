//! Typed parameter plumbing for plain structs. Describe each field once,
//! and parsing, validation, INI import/export, and exact error locations
//! all follow.
//!
//! Paramini connects text representations to the fields of ordinary Rust
//! structs through small per-field specifications. A specification pairs a
//! pair of accessors with a key, a validator, and a description; a registry
//! of readers and writers handles the text conversion per type. Nothing is
//! derived and no trait is implemented on your types: the struct stays a
//! plain struct, and the specification list is the schema.
//!
//! ```ignore
//! #[derive(Default)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let specs = SpecificationMap::new([
//!     Specification::new(
//!         "host",
//!         bind(|s: &Server| &s.host, |s: &mut Server| &mut s.host),
//!         Validator::nonempty(),
//!     ),
//!     Specification::new(
//!         "port",
//!         bind(|s: &Server| &s.port, |s: &mut Server| &mut s.port),
//!         Validator::at_least(1024),
//!     )
//!     .describe("listen port"),
//! ])?;
//!
//! let mut server = Server::default();
//! import_ini(&mut server, &specs, default_reader(), &text, ".")?;
//! ```
//!
//! When the import hits a bad value, the failure knows exactly where it
//! happened and can say so:
//!
//! ```text
//! server.inp:3:8: invalid value: constraint: at least 1024
//!     3 | port = 80
//!       |        ^
//! ```
//!
//! # Why paramini
//!
//! Hand-rolled parameter loading tends to grow the same way in every
//! program: a parse function per file format, a clump of `if key == ...`
//! dispatch, validation scattered at the use sites, and error messages
//! that name the bad value but not the line it came from. Derive-based
//! deserialization fixes the dispatch but couples your struct to one
//! framework and one wire shape, and still reports failures without
//! positions.
//!
//! Paramini keeps the schema in one list of [`Specification`] values.
//! Import, export, keyed get/set, and whole-record validation all walk the
//! same list, so adding a parameter is one entry, and every failure
//! carries the source name, line, column, and offending line text it was
//! discovered at.
//!
//! # Design: specifications over accessors
//!
//! A [`Specification`] does not store values. It stores two plain
//! accessors for a field of some record type `R`, plus:
//!
//! - **a key** under which the field is addressed externally,
//! - **a [`Validator`]** run on every incoming value,
//! - **a description** that becomes comments in exported files.
//!
//! Everything else is type-erased: the specification remembers the field
//! type as a `TypeId` and converts through a [`Reader`] and [`Writer`]
//! registry at the edges. One [`SpecificationMap`] therefore holds fields
//! of any mix of types, and the registries are shared across every record
//! type in the program.
//!
//! Nested records compose with [`Specification::delegate`]: a
//! specification written against an inner type is re-rooted onto any
//! record that contains it, keeping the inner validator and description.
//!
//! # Readers and writers
//!
//! A [`Reader`] maps `TypeId`s to parse functions, a [`Writer`] maps them
//! to render functions. [`default_reader`] and [`default_writer`] cover
//! `bool`, `String`, the primitive integers and floats, and `Vec`s of the
//! numeric types as comma-separated text. Integer parses distinguish
//! malformed text from out-of-range values.
//!
//! Both registries are value types: clone one, [`add`](Reader::add) your
//! own entries, and pass it wherever text crosses the boundary. An entry
//! can recurse into the registry it was handed, which is how container
//! types delegate their element parsing ([`read_dsv`] does this for
//! delimiter-separated `Vec`s, [`read_defaulted`] for the sentinel
//! wrapper).
//!
//! # Optional and defaulted parameters
//!
//! An `Option<T>` field bound with [`bind_optional`] reads like a plain
//! `T` and is skipped by export and validation while unset; exporting it
//! produces a commented placeholder line instead of a value.
//!
//! [`Defaulted<T>`] distinguishes a configured fallback from an assigned
//! value. Assigning through a specification moves only the assigned
//! state, never the fallback, so a record keeps its configured default
//! when an import resets the field. A sentinel text (for example the
//! empty string) reads as "back to the default" and is written back out
//! for unassigned values, making resets round-trip.
//!
//! # Validation
//!
//! [`Validator`]s are combinators over `T -> Result<T, Failure>`:
//! [`at_least`](Validator::at_least), [`at_most`](Validator::at_most),
//! [`greater_than`](Validator::greater_than),
//! [`nonzero`](Validator::nonzero), [`nonempty`](Validator::nonempty),
//! arbitrary predicates via [`require`](Validator::require), and
//! [`and`](Validator::and) to chain. A validator may also rewrite the
//! value on the way through, so clamping and normalization sit in the
//! same slot as checking.
//!
//! Rejections carry the violated constraint's text, which ends up in the
//! rendered failure (`invalid value: constraint: at least 1024`).
//! [`validate_record`] runs every specification's validator against the
//! current record for a final coherence pass before using it.
//!
//! # INI import
//!
//! [`import_ini`] feeds text through a line parser into a record. The
//! plain dialect ([`simple_ini_parser`]) recognizes, after leading
//! blanks:
//!
//! - blank lines and `#` comments,
//! - `[name]` section headers, name trimmed; `[]` returns to top level,
//! - `key = value`, both sides trimmed; the value may contain `=`, `#`,
//!   and internal spaces,
//! - a bare `key`, which means `true`.
//!
//! Keys inside a section are joined onto the section name with a
//! configurable separator before lookup, so a flat specification map
//! serves sectioned files. A section header that names a `bool` parameter
//! switches that parameter on, letting `[verbose]` act as both a flag and
//! a grouping.
//!
//! A second dialect ([`quoted_ini_parser`]) adds `//` comments and
//! single-quoted values with backslash escapes for text that needs
//! leading or trailing spaces.
//!
//! The driver underneath is [`IniImporter`], which is stateful and
//! resumable: [`run`](IniImporter::run) stops at the first failure and
//! can be called again to continue, [`run_collect`](IniImporter::run_collect)
//! gathers every failure in one pass, and [`run_one`](IniImporter::run_one)
//! steps a line at a time so a driver can rewrite the current section in
//! between (relative section names, for instance).
//!
//! [`import_key_value`] handles the single-assignment form command lines
//! produce (`key=value`, untrimmed), with columns reported against that
//! text.
//!
//! # INI export
//!
//! [`export_ini`] renders a record back to INI in specification order.
//! Descriptions become `#` comment lines above their entry, keys
//! containing the separator are grouped under section headers in
//! discovery order, and unassigned optional fields come out as commented
//! placeholders. The output is a template a user can fill in, and it
//! re-imports to an equal record.
//!
//! # Keyed access
//!
//! [`KeyedView`] and [`KeyedViewMut`] wrap a record and its map for
//! string-keyed access from code: `view.try_get::<u16>("port")`,
//! `view.try_set("port", "8080")`. Sets go through the same parse and
//! validate pipeline as imports. The panicking `get`/`set` variants suit
//! tests and tools where a bad key is a bug.
//!
//! # Error handling
//!
//! All fallible operations return [`Failure`], a closed set of
//! [`FailureKind`]s with an attached [`SourceContext`] (key, source name,
//! line, column, offending line). [`Failure::explain`] renders the
//! location plus a gutter excerpt with a caret. With the `rich-errors`
//! feature, `Failure` also implements `miette::Diagnostic`, so the same
//! location renders through miette's styled reports. See the [`error`]
//! module for the full set.

pub mod error;

mod defaulted;
mod erased;
mod export;
mod import;
mod ini;
mod map;
mod reader;
#[cfg(feature = "rich-errors")]
mod rich;
mod spec;
mod validate;
mod view;
mod writer;

#[cfg(test)]
mod fixtures;

pub use defaulted::{
    Defaulted, read_defaulted, read_defaulted_with, write_defaulted, write_defaulted_with,
};
pub use error::{BadKeySet, Failure, FailureKind, SourceContext};
pub use export::export_ini;
pub use import::{IniImporter, import_ini, import_key_value};
pub use ini::{IniRecord, IniRecordKind, IniToken, quoted_ini_parser, simple_ini_parser};
pub use map::{SpecificationMap, keys_lowercase, keys_lowercase_nospace};
pub use reader::{Reader, default_reader, read_dsv, read_dsv_with, read_from_str};
pub use spec::{
    Bind, Binding, DefaultedBinding, OptionBinding, Specification, bind, bind_defaulted,
    bind_optional, validate_record,
};
pub use validate::{Empty, Validator};
pub use view::{KeyedView, KeyedViewMut};
pub use writer::{Writer, default_writer, write_dsv, write_dsv_with, write_to_string};
