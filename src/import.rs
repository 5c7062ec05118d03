//! Stateful INI import.
//!
//! An [`IniImporter`] walks input text line by line, tracking the current
//! section and the exact location of everything it touches. Keys inside a
//! section are joined onto it with a configurable separator before lookup,
//! so a flat [`SpecificationMap`] serves sectioned files. Failures come
//! back located: source name, line, column, and the offending line's text,
//! ready for [`Failure::explain`].
//!
//! The driver can run to the first failure ([`run`](IniImporter::run)),
//! collect every failure ([`run_collect`](IniImporter::run_collect)), or
//! step one line at a time ([`run_one`](IniImporter::run_one)) and adjust
//! the section in between, which is how relative section names or other
//! house rules are grafted on.

use std::any::TypeId;
use std::str::Lines;

use crate::error::{Failure, SourceContext};
use crate::ini::{IniRecord, IniRecordKind, simple_ini_parser};
use crate::map::SpecificationMap;
use crate::reader::Reader;

/// Line-by-line importer over borrowed input text.
#[derive(Debug)]
pub struct IniImporter<'i, P = fn(&str) -> IniRecord> {
    lines: Lines<'i>,
    parser: P,
    section: String,
    separator: String,
    context: SourceContext,
    finished: bool,
}

impl<'i> IniImporter<'i> {
    /// Import `text` with [`simple_ini_parser`].
    pub fn new(text: &'i str) -> Self {
        IniImporter::with_parser(text, simple_ini_parser)
    }
}

impl<'i, P> IniImporter<'i, P>
where
    P: Fn(&str) -> IniRecord,
{
    /// Import `text`, tokenizing each line with `parser`.
    pub fn with_parser(text: &'i str, parser: P) -> Self {
        IniImporter {
            lines: text.lines(),
            parser,
            section: String::new(),
            separator: String::from("/"),
            context: SourceContext::default(),
            finished: false,
        }
    }

    /// Name the input in reported failures (a file name, `"<stdin>"`, ...).
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.context.source = name.into();
        self
    }

    /// The text joining a section name to the keys inside it. Default `/`.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// The section the importer is currently inside, `""` at top level.
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Override the current section. Called between
    /// [`run_one`](IniImporter::run_one) steps, this rewrites how
    /// subsequent keys are joined, e.g. to make section names relative to
    /// some root.
    pub fn set_section(&mut self, section: impl Into<String>) {
        self.section = section.into();
    }

    /// Whether the input has been fully consumed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Process the next line, reporting what kind of line it was.
    ///
    /// Returns `Eof` (idempotently) once the input is exhausted. A failure
    /// consumes the line it occurred on; the next call moves past it, so a
    /// driver may keep going.
    pub fn run_one<R: 'static>(
        &mut self,
        record: &mut R,
        specs: &SpecificationMap<R>,
        reader: &Reader,
    ) -> Result<IniRecordKind, Failure> {
        if self.finished {
            return Ok(IniRecordKind::Eof);
        }
        let Some(line) = self.lines.next() else {
            self.finished = true;
            return Ok(IniRecordKind::Eof);
        };
        self.context.line += 1;
        self.context.record = line.to_string();

        let parsed = (self.parser)(line);
        match parsed.kind {
            IniRecordKind::Empty => Ok(IniRecordKind::Empty),
            IniRecordKind::Eof => {
                self.finished = true;
                Ok(IniRecordKind::Eof)
            }
            IniRecordKind::SyntaxError => {
                Err(self.locate(Failure::bad_syntax(), parsed.key.column))
            }
            IniRecordKind::Section => {
                self.section = parsed.key.text.clone();
                // A section header naming a bool parameter switches it on.
                if let Some(spec) = specs.get(&parsed.key.text)
                    && spec.field_type() == TypeId::of::<bool>()
                {
                    spec.assign(record, true)
                        .map_err(|e| self.locate(e, parsed.key.column))?;
                }
                Ok(IniRecordKind::Section)
            }
            IniRecordKind::Key | IniRecordKind::KeyValue => {
                let full_key = if self.section.is_empty() {
                    parsed.key.text.clone()
                } else {
                    format!("{}{}{}", self.section, self.separator, parsed.key.text)
                };
                let Some(spec) = specs.get(&full_key) else {
                    return Err(
                        self.locate(Failure::unrecognized_key(full_key), parsed.key.column)
                    );
                };
                // A key on its own means "true"; failures for it point at
                // the key since there is no value text to point at.
                let (repn, column) = if parsed.kind == IniRecordKind::Key {
                    ("true", parsed.key.column)
                } else {
                    (parsed.value.text.as_str(), parsed.value.column)
                };
                spec.read(record, repn, reader)
                    .map_err(|e| self.locate(e, column))?;
                Ok(parsed.kind)
            }
        }
    }

    /// Process lines until the first failure or end of input.
    pub fn run<R: 'static>(
        &mut self,
        record: &mut R,
        specs: &SpecificationMap<R>,
        reader: &Reader,
    ) -> Result<(), Failure> {
        loop {
            if self.run_one(record, specs, reader)? == IniRecordKind::Eof {
                return Ok(());
            }
        }
    }

    /// Process the whole input, collecting every failure. Lines that fail
    /// are skipped; everything else still lands in `record`.
    pub fn run_collect<R: 'static>(
        &mut self,
        record: &mut R,
        specs: &SpecificationMap<R>,
        reader: &Reader,
    ) -> Vec<Failure> {
        let mut failures = Vec::new();
        loop {
            match self.run_one(record, specs, reader) {
                Ok(IniRecordKind::Eof) => return failures,
                Ok(_) => {}
                Err(e) => failures.push(e),
            }
        }
    }

    fn locate(&self, mut failure: Failure, column: usize) -> Failure {
        let mut at = self.context.clone();
        at.column = column;
        failure.context.merge(&at);
        failure
    }
}

/// One-shot import of `text` into `record`, stopping at the first failure.
/// Section names are joined to keys with `separator`.
pub fn import_ini<R: 'static>(
    record: &mut R,
    specs: &SpecificationMap<R>,
    reader: &Reader,
    text: &str,
    separator: &str,
) -> Result<(), Failure> {
    IniImporter::new(text)
        .separator(separator)
        .run(record, specs, reader)
}

/// Import a single `key=value` assignment, the form command lines hand
/// over. Neither side is trimmed; text without `separator` is a bare key
/// meaning `true`. Empty text is a no-op.
///
/// Failure columns index into `text`: an unrecognized key points at
/// column 1, a value failure at the column right after the separator.
pub fn import_key_value<R: 'static>(
    record: &mut R,
    specs: &SpecificationMap<R>,
    reader: &Reader,
    text: &str,
    separator: &str,
) -> Result<(), Failure> {
    if text.is_empty() {
        return Ok(());
    }
    let (key, repn, value_column) = match text.split_once(separator) {
        Some((key, value)) => {
            let consumed = key.len() + separator.len();
            (key, value, text[..consumed].chars().count() + 1)
        }
        None => (text, "true", 1),
    };

    let locate = |mut failure: Failure, column: usize| {
        let at = SourceContext {
            record: text.to_string(),
            column,
            ..SourceContext::default()
        };
        failure.context.merge(&at);
        failure
    };

    let Some(spec) = specs.get(key) else {
        return Err(locate(Failure::unrecognized_key(key), 1));
    };
    spec.read(record, repn, reader)
        .map_err(|e| locate(e, value_column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::fixtures::test::{
        TestInputs, TestService, inputs_map, service_map, service_reader,
    };
    use crate::ini::quoted_ini_parser;
    use crate::reader::default_reader;

    const FIXTURE: &str =
        "foo = two words  \nbar = hash#\nbaz = 2.8, 99\n[ blurgle ]\n\n   baz\n   quux = 1,3,4\n";

    #[test]
    fn full_fixture_lands_every_field() {
        let mut record = TestInputs::default();
        import_ini(&mut record, &inputs_map(), default_reader(), FIXTURE, ".").unwrap();

        assert_eq!(record.foo, "two words");
        assert_eq!(record.bar, "hash#");
        assert_eq!(record.baz, vec![2.8, 99.0]);
        // Bare `baz` inside [ blurgle ] is blurgle.baz = true.
        assert!(record.blurgle_baz);
        assert_eq!(record.blurgle_quux, vec![1, 3, 4]);
        assert!(!record.verbose);
    }

    #[test]
    fn unterminated_section_is_located_after_the_bracket() {
        let mut record = TestInputs::default();
        let err =
            import_ini(&mut record, &inputs_map(), default_reader(), "[oops\n", ".").unwrap_err();

        assert_eq!(err.kind, FailureKind::BadSyntax);
        assert_eq!(err.context.line, 1);
        assert_eq!(err.context.column, 2);
        assert_eq!(err.context.record, "[oops");
        assert_eq!(err.to_string(), "1:2: bad syntax");
        assert_eq!(
            err.explain(true),
            "1:2: bad syntax\n    1 | [oops\n      |  ^\n"
        );
    }

    #[test]
    fn source_name_prefixes_reported_failures() {
        let mut record = TestInputs::default();
        let err = IniImporter::new("[oops\n")
            .source_name("foo.inp")
            .run(&mut record, &inputs_map(), default_reader())
            .unwrap_err();
        assert_eq!(err.to_string(), "foo.inp:1:2: bad syntax");
    }

    #[test]
    fn unrecognized_key_points_at_the_key() {
        let mut record = TestInputs::default();
        let err = import_ini(
            &mut record,
            &inputs_map(),
            default_reader(),
            "zoinks = fish cakes\n",
            ".",
        )
        .unwrap_err();

        assert_eq!(err.kind, FailureKind::UnrecognizedKey);
        assert_eq!(err.context.key, "zoinks");
        assert_eq!(err.context.line, 1);
        assert_eq!(err.context.column, 1);
    }

    #[test]
    fn value_failures_point_at_the_value() {
        let mut record = TestInputs::default();
        let err = import_ini(
            &mut record,
            &inputs_map(),
            default_reader(),
            "baz = fish\n",
            ".",
        )
        .unwrap_err();

        assert_eq!(err.kind, FailureKind::ReadFailure);
        assert_eq!(err.context.key, "baz");
        assert_eq!(err.to_string(), "1:7: read failure");
    }

    #[test]
    fn bare_key_failures_point_at_the_key() {
        // A bare key means "true", which does not parse as Vec<f64>.
        let mut record = TestInputs::default();
        let err = import_ini(&mut record, &inputs_map(), default_reader(), "  baz\n", ".")
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::ReadFailure);
        assert_eq!(err.context.column, 3);
    }

    #[test]
    fn section_header_switches_a_bool_parameter_on() {
        let mut record = TestInputs::default();
        import_ini(&mut record, &inputs_map(), default_reader(), "[verbose]\n", ".").unwrap();
        assert!(record.verbose);
    }

    #[test]
    fn section_bool_still_changes_the_section() {
        let mut record = TestInputs::default();
        let failures = IniImporter::new("[verbose]\nfoo = x\n")
            .separator(".")
            .run_collect(&mut record, &inputs_map(), default_reader());

        assert!(record.verbose);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::UnrecognizedKey);
        assert_eq!(failures[0].context.key, "verbose.foo");
    }

    #[test]
    fn nested_records_import_through_sections() {
        let mut service = TestService::default();
        let text = "name = resolver\n[engine]\nthreads = 4\nrate = 2.5\n[]\ntimeout = 30\n";
        import_ini(&mut service, &service_map(), &service_reader(), text, ".").unwrap();

        assert_eq!(service.name, "resolver");
        assert_eq!(service.engine.threads, 4);
        assert_eq!(service.engine.rate, 2.5);
        // [] returned to top level for the timeout key.
        assert_eq!(service.timeout, Some(30));
    }

    #[test]
    fn defaulted_sentinel_resets_on_import() {
        let mut service = TestService::default();
        service.retries.set(9);
        import_ini(
            &mut service,
            &service_map(),
            &service_reader(),
            "retries =\n",
            ".",
        )
        .unwrap();
        assert!(service.retries.is_default());
        assert_eq!(*service.retries.value(), 3);
    }

    #[test]
    fn validator_failures_are_located_like_any_other() {
        let mut service = TestService::default();
        let err = import_ini(
            &mut service,
            &service_map(),
            &service_reader(),
            "[engine]\nrate = -1\n",
            ".",
        )
        .unwrap_err();

        assert_eq!(err.kind, FailureKind::InvalidValue);
        assert_eq!(err.constraint(), Some("greater than 0"));
        assert_eq!(err.context.key, "engine.rate");
        assert_eq!(err.context.line, 2);
        assert_eq!(err.context.column, 8);
    }

    #[test]
    fn run_stops_at_the_first_failure_and_can_resume() {
        let mut record = TestInputs::default();
        let mut importer = IniImporter::new("foo = ok\nbaz = bad\nbar = rest\n").separator(".");

        let err = importer
            .run(&mut record, &inputs_map(), default_reader())
            .unwrap_err();
        assert_eq!(err.context.line, 2);
        assert_eq!(record.foo, "ok");

        importer
            .run(&mut record, &inputs_map(), default_reader())
            .unwrap();
        assert_eq!(record.bar, "rest");
        assert!(importer.is_finished());
    }

    #[test]
    fn run_collect_reports_every_failure() {
        let mut record = TestInputs::default();
        let text = "foo = ok\n[oops\nzoinks = 1\nbaz = fish\nbar = kept\n";
        let failures = IniImporter::new(text)
            .separator(".")
            .run_collect(&mut record, &inputs_map(), default_reader());

        assert_eq!(failures.len(), 3);
        assert_eq!(failures[0].kind, FailureKind::BadSyntax);
        assert_eq!(failures[0].context.line, 2);
        assert_eq!(failures[1].kind, FailureKind::UnrecognizedKey);
        assert_eq!(failures[1].context.line, 3);
        assert_eq!(failures[2].kind, FailureKind::ReadFailure);
        assert_eq!(failures[2].context.line, 4);
        // The good lines on either side still landed.
        assert_eq!(record.foo, "ok");
        assert_eq!(record.bar, "kept");
    }

    #[test]
    fn stepping_allows_section_rewrites() {
        let mut record = TestInputs::default();
        let map = inputs_map();
        let mut importer = IniImporter::new("[b]\nbaz\n").separator(".");

        let kind = importer
            .run_one(&mut record, &map, default_reader())
            .unwrap();
        assert_eq!(kind, IniRecordKind::Section);
        assert_eq!(importer.section(), "b");

        // Rewrite the section before the next line is joined.
        importer.set_section("blurgle");
        importer
            .run_one(&mut record, &map, default_reader())
            .unwrap();
        assert!(record.blurgle_baz);
    }

    #[test]
    fn alternate_parser_plugs_in() {
        let mut record = TestInputs::default();
        let text = "// config\nfoo = 'two words' // spaced\n";
        IniImporter::with_parser(text, quoted_ini_parser)
            .separator(".")
            .run(&mut record, &inputs_map(), default_reader())
            .unwrap();
        assert_eq!(record.foo, "two words");
    }

    // --- key=value form ---

    #[test]
    fn key_value_assigns_without_trimming() {
        let mut record = TestInputs::default();
        import_key_value(
            &mut record,
            &inputs_map(),
            default_reader(),
            "foo=hello",
            "=",
        )
        .unwrap();
        assert_eq!(record.foo, "hello");

        // Spaces are not stripped from the value side.
        import_key_value(
            &mut record,
            &inputs_map(),
            default_reader(),
            "foo = hello",
            "=",
        )
        .unwrap();
        assert_eq!(record.foo, " hello");
    }

    #[test]
    fn key_value_unrecognized_points_at_column_one() {
        let mut record = TestInputs::default();
        let err = import_key_value(
            &mut record,
            &inputs_map(),
            default_reader(),
            "zoinks = fish cakes",
            "=",
        )
        .unwrap_err();

        assert_eq!(err.kind, FailureKind::UnrecognizedKey);
        assert_eq!(err.context.column, 1);
        assert_eq!(err.context.record, "zoinks = fish cakes");
        assert_eq!(err.context.line, 0);
    }

    #[test]
    fn key_value_failures_point_past_the_separator() {
        let mut record = TestInputs::default();
        let err = import_key_value(
            &mut record,
            &inputs_map(),
            default_reader(),
            "baz=fish",
            "=",
        )
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::ReadFailure);
        assert_eq!(err.context.column, 5);
    }

    #[test]
    fn key_value_bare_key_means_true() {
        let mut record = TestInputs::default();
        import_key_value(&mut record, &inputs_map(), default_reader(), "verbose", "=").unwrap();
        assert!(record.verbose);
    }

    #[test]
    fn key_value_empty_text_is_a_no_op() {
        let mut record = TestInputs::default();
        import_key_value(&mut record, &inputs_map(), default_reader(), "", "=").unwrap();
        assert_eq!(record, TestInputs::default());
    }
}
