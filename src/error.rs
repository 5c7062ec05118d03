//! Failure model: a closed set of error kinds plus the source-location
//! context that accumulates as a failure propagates outward.

use std::fmt;

use thiserror::Error;

/// Maximum number of characters of a source line shown in an excerpt.
const MAX_EXCERPT_CHARS: usize = 120;

/// What went wrong, as a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Programming or registration bug (e.g. a type-erasure downcast
    /// mismatch). Not recoverable by fixing the input.
    InternalError,
    /// Text did not parse as the target type.
    ReadFailure,
    /// Parsed fine but a validator rejected it; carries the constraint text.
    InvalidValue,
    /// No reader/writer registered for the requested type.
    UnsupportedType,
    /// Key not present in the specification map.
    UnrecognizedKey,
    /// Malformed structural syntax: bad section heading, unterminated quote.
    BadSyntax,
    /// An optional field currently holds no value. Expected and recoverable;
    /// several callers (notably the exporter) treat it as "nothing to report".
    EmptyOptional,
}

impl FailureKind {
    fn label(self) -> &'static str {
        match self {
            // EmptyOptional is internal bookkeeping; reaching a rendered
            // message means a caller failed to intercept it.
            FailureKind::InternalError | FailureKind::EmptyOptional => "internal error",
            FailureKind::ReadFailure => "read failure",
            FailureKind::InvalidValue => "invalid value",
            FailureKind::UnsupportedType => "unsupported type",
            FailureKind::UnrecognizedKey => "unrecognized key",
            FailureKind::BadSyntax => "bad syntax",
        }
    }
}

/// Where a failure happened.
///
/// `line` and `column` are 1-based character positions; `0` means unknown.
/// `record` holds the raw text of the offending line, `source` the name of
/// the input (file name, `"<args>"`, ...), `key` the parameter key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceContext {
    pub key: String,
    pub source: String,
    pub record: String,
    pub line: usize,
    pub column: usize,
}

impl SourceContext {
    /// Overlay `other` onto `self`: only `other`'s known (non-empty,
    /// non-zero) fields replace the corresponding fields of `self`.
    ///
    /// Each layer that catches and re-raises a failure merges in just the
    /// context it uniquely knows: the specification sets `key`, the importer
    /// sets `source`/`record`/`line`/`column`.
    pub fn merge(&mut self, other: &SourceContext) {
        if !other.key.is_empty() {
            self.key = other.key.clone();
        }
        if !other.source.is_empty() {
            self.source = other.source.clone();
        }
        if !other.record.is_empty() {
            self.record = other.record.clone();
        }
        if other.line > 0 {
            self.line = other.line;
        }
        if other.column > 0 {
            self.column = other.column;
        }
    }
}

/// A failed parameter operation: the kind of failure plus whatever source
/// context has been attached so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub context: SourceContext,
    constraint: Option<String>,
}

impl Failure {
    fn new(kind: FailureKind) -> Self {
        Failure {
            kind,
            context: SourceContext::default(),
            constraint: None,
        }
    }

    pub fn internal_error() -> Self {
        Failure::new(FailureKind::InternalError)
    }

    pub fn read_failure() -> Self {
        Failure::new(FailureKind::ReadFailure)
    }

    /// A validator rejection carrying the violated constraint's description.
    pub fn invalid_value(constraint: impl Into<String>) -> Self {
        let mut f = Failure::new(FailureKind::InvalidValue);
        f.constraint = Some(constraint.into());
        f
    }

    pub fn unsupported_type() -> Self {
        Failure::new(FailureKind::UnsupportedType)
    }

    pub fn unrecognized_key(key: impl Into<String>) -> Self {
        Failure::new(FailureKind::UnrecognizedKey).with_key(key)
    }

    pub fn bad_syntax() -> Self {
        Failure::new(FailureKind::BadSyntax)
    }

    pub fn empty_optional() -> Self {
        Failure::new(FailureKind::EmptyOptional)
    }

    /// Set the context key, replacing any previous value.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.context.key = key.into();
        self
    }

    /// The violated constraint's description, for `InvalidValue` failures.
    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    /// Render the failure for human consumption.
    ///
    /// The first line is the [`Display`](fmt::Display) form
    /// (`source:line:col: kind`). With `with_excerpt`, and when the offending
    /// line is known, a gutter excerpt with a `^` caret at the column
    /// follows:
    ///
    /// ```text
    /// foo.inp:3:10: read failure
    ///     3 | quibbity seven
    ///       |          ^
    /// ```
    ///
    /// The returned string ends with a newline so it can be written as-is.
    /// The excerpt clips the source line to 120 characters.
    pub fn explain(&self, with_excerpt: bool) -> String {
        let mut out = self.to_string();
        out.push('\n');
        if with_excerpt && !self.context.record.is_empty() {
            let shown: String = self.context.record.chars().take(MAX_EXCERPT_CHARS).collect();
            let gutter = if self.context.line > 0 {
                format!("{:>5}", self.context.line)
            } else {
                " ".repeat(5)
            };
            out.push_str(&gutter);
            out.push_str(" | ");
            out.push_str(&shown);
            out.push('\n');
            if self.context.column > 0 {
                // Keep the caret inside the clipped excerpt.
                let caret = self.context.column.min(MAX_EXCERPT_CHARS);
                out.push_str(&" ".repeat(gutter.len()));
                out.push_str(" | ");
                out.push_str(&" ".repeat(caret - 1));
                out.push_str("^\n");
            }
        }
        out
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = &self.context;
        let mut wrote_prefix = false;
        if !ctx.source.is_empty() {
            f.write_str(&ctx.source)?;
            wrote_prefix = true;
        }
        if ctx.line > 0 {
            if wrote_prefix {
                f.write_str(":")?;
            }
            write!(f, "{}", ctx.line)?;
            wrote_prefix = true;
        }
        if ctx.column > 0 {
            if wrote_prefix {
                f.write_str(":")?;
            }
            write!(f, "{}", ctx.column)?;
            wrote_prefix = true;
        }
        if wrote_prefix {
            f.write_str(": ")?;
        }
        f.write_str(self.kind.label())?;
        if self.kind == FailureKind::UnrecognizedKey && !ctx.key.is_empty() {
            write!(f, " \"{}\"", ctx.key)?;
        }
        if self.kind == FailureKind::InvalidValue
            && let Some(constraint) = &self.constraint
        {
            write!(f, ": constraint: {constraint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Failure {}

/// Construction error for [`SpecificationMap`](crate::SpecificationMap):
/// two specifications mapped to the same canonical key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate parameter key '{key}' after canonicalization")]
pub struct BadKeySet {
    pub key: String,
}
