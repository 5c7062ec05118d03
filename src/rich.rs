//! miette integration, enabled by the `rich-errors` feature.
//!
//! [`Failure`] implements [`miette::Diagnostic`]: the offending line
//! becomes the source snippet and the failure column becomes a labeled
//! span, so a located failure dropped into a `miette::Report` renders
//! with miette's styled caret instead of the plain
//! [`explain`](Failure::explain) gutter.

use miette::{Diagnostic, LabeledSpan, SourceCode};

use crate::error::Failure;

impl Diagnostic for Failure {
    fn source_code(&self) -> Option<&dyn SourceCode> {
        if self.context.record.is_empty() {
            return None;
        }
        Some(&self.context.record)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.context.record.is_empty() || self.context.column == 0 {
            return None;
        }
        // The column counts characters from 1; the span indexes bytes.
        let record = &self.context.record;
        let (offset, len) = match record.char_indices().nth(self.context.column - 1) {
            Some((offset, c)) => (offset, c.len_utf8()),
            None => (record.len(), 0),
        };
        let label = self.constraint().map(str::to_string);
        Some(Box::new(std::iter::once(LabeledSpan::new(
            label, offset, len,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceContext;

    fn located(mut failure: Failure, record: &str, column: usize) -> Failure {
        failure.context = SourceContext {
            record: record.into(),
            line: 1,
            column,
            ..SourceContext::default()
        };
        failure
    }

    #[test]
    fn label_covers_the_column_character() {
        let failure = located(Failure::read_failure(), "baz = fish", 7);
        let spans: Vec<LabeledSpan> = failure.labels().unwrap().collect();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].offset(), 6);
        assert_eq!(spans[0].len(), 1);
        assert!(failure.source_code().is_some());
    }

    #[test]
    fn spans_count_bytes_not_characters() {
        let failure = located(Failure::read_failure(), "é = ö", 5);
        let spans: Vec<LabeledSpan> = failure.labels().unwrap().collect();
        assert_eq!(spans[0].offset(), 5);
        assert_eq!(spans[0].len(), 2);
    }

    #[test]
    fn column_past_the_line_end_becomes_an_empty_span() {
        let failure = located(Failure::read_failure(), "foo =", 6);
        let spans: Vec<LabeledSpan> = failure.labels().unwrap().collect();
        assert_eq!(spans[0].offset(), 5);
        assert_eq!(spans[0].len(), 0);
    }

    #[test]
    fn constraints_label_the_span() {
        let failure = located(Failure::invalid_value("at least 1"), "retries = 0", 11);
        let spans: Vec<LabeledSpan> = failure.labels().unwrap().collect();
        assert_eq!(spans[0].label(), Some("at least 1"));
    }

    #[test]
    fn unlocated_failures_have_no_snippet() {
        let failure = Failure::unsupported_type();
        assert!(failure.labels().is_none());
        assert!(failure.source_code().is_none());
    }
}
