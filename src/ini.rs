//! Line-level INI tokenizing.
//!
//! An importer consumes input one line at a time; a parser function turns
//! each line into an [`IniRecord`] carrying the tokens it found and their
//! 1-based character columns. Two dialects ship here:
//! [`simple_ini_parser`] for the plain `key = value` form, and
//! [`quoted_ini_parser`] which adds `//` comments and single-quoted
//! values. Anything else can be plugged in as a plain
//! `fn(&str) -> IniRecord`.

/// A piece of text with the 1-based column of its first character.
/// Column 0 means the token did not appear on the line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniToken {
    pub text: String,
    pub column: usize,
}

impl IniToken {
    pub fn new(text: impl Into<String>, column: usize) -> Self {
        IniToken {
            text: text.into(),
            column,
        }
    }
}

/// What one line of input turned out to be.
///
/// `Eof` is never produced by a line parser; importers report it when the
/// input runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IniRecordKind {
    Empty,
    Section,
    Key,
    KeyValue,
    SyntaxError,
    Eof,
}

/// One tokenized line: a [`Section`](IniRecordKind::Section) carries the
/// section name in `key`; `Key` and `KeyValue` carry the key and, for the
/// latter, the value; a [`SyntaxError`](IniRecordKind::SyntaxError)
/// carries the offending column in `key.column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniRecord {
    pub kind: IniRecordKind,
    pub key: IniToken,
    pub value: IniToken,
}

impl IniRecord {
    pub fn empty() -> Self {
        IniRecord {
            kind: IniRecordKind::Empty,
            key: IniToken::default(),
            value: IniToken::default(),
        }
    }

    pub fn section(name: impl Into<String>, column: usize) -> Self {
        IniRecord {
            kind: IniRecordKind::Section,
            key: IniToken::new(name, column),
            value: IniToken::default(),
        }
    }

    pub fn bare_key(key: impl Into<String>, column: usize) -> Self {
        IniRecord {
            kind: IniRecordKind::Key,
            key: IniToken::new(key, column),
            value: IniToken::default(),
        }
    }

    pub fn key_value(
        key: impl Into<String>,
        key_column: usize,
        value: impl Into<String>,
        value_column: usize,
    ) -> Self {
        IniRecord {
            kind: IniRecordKind::KeyValue,
            key: IniToken::new(key, key_column),
            value: IniToken::new(value, value_column),
        }
    }

    pub fn syntax_error(column: usize) -> Self {
        IniRecord {
            kind: IniRecordKind::SyntaxError,
            key: IniToken::new("", column),
            value: IniToken::default(),
        }
    }

    pub fn eof() -> Self {
        IniRecord {
            kind: IniRecordKind::Eof,
            key: IniToken::default(),
            value: IniToken::default(),
        }
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn skip_blank(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && is_blank(chars[i]) {
        i += 1;
    }
    i
}

fn trimmed_token(chars: &[char], start: usize, end: usize) -> IniToken {
    let begin = skip_blank(chars, start).min(end);
    let mut stop = end;
    while stop > begin && is_blank(chars[stop - 1]) {
        stop -= 1;
    }
    let text: String = chars[begin..stop].iter().collect();
    // An all-blank span keeps the column just past where it began.
    let column = if text.is_empty() { start + 1 } else { begin + 1 };
    IniToken { text, column }
}

fn parse_section(chars: &[char], open: usize, line_end: usize) -> IniRecord {
    let Some(close) = (open + 1..line_end).find(|&j| chars[j] == ']') else {
        // Unterminated header: point at the character after the bracket.
        return IniRecord::syntax_error(open + 2);
    };
    let trailing = skip_blank(chars, close + 1);
    if trailing < line_end {
        return IniRecord::syntax_error(trailing + 1);
    }
    let name = trimmed_token(chars, open + 1, close);
    IniRecord {
        kind: IniRecordKind::Section,
        key: name,
        value: IniToken::default(),
    }
}

/// Tokenize one line of plain INI.
///
/// Recognized forms, after leading spaces and tabs:
///
/// - blank lines and lines starting with `#` are [`Empty`](IniRecordKind::Empty)
/// - `[name]`, name trimmed; an empty name (`[]`) is how a file returns to
///   top-level keys
/// - `key = value`, both sides trimmed; the value may be empty and may
///   contain `=`, `#`, or internal spaces
/// - `key` alone
///
/// A `[` with no closing `]` is a syntax error at the column after the
/// bracket; text after a closing `]` is a syntax error at that text; a
/// line starting with `=` is a syntax error at the `=`.
pub fn simple_ini_parser(line: &str) -> IniRecord {
    let chars: Vec<char> = line.chars().collect();
    let start = skip_blank(&chars, 0);
    if start == chars.len() || chars[start] == '#' {
        return IniRecord::empty();
    }
    if chars[start] == '[' {
        return parse_section(&chars, start, chars.len());
    }
    match (start..chars.len()).find(|&i| chars[i] == '=') {
        Some(eq) => {
            let key = trimmed_token(&chars, start, eq);
            if key.text.is_empty() {
                return IniRecord::syntax_error(eq + 1);
            }
            let value = trimmed_token(&chars, eq + 1, chars.len());
            IniRecord {
                kind: IniRecordKind::KeyValue,
                key,
                value,
            }
        }
        None => {
            let key = trimmed_token(&chars, start, chars.len());
            IniRecord {
                kind: IniRecordKind::Key,
                key,
                value: IniToken::default(),
            }
        }
    }
}

fn comment_at(chars: &[char], i: usize) -> bool {
    chars[i] == '/' && i + 1 < chars.len() && chars[i + 1] == '/'
}

/// Tokenize one line of commented-and-quoted INI.
///
/// Extends [`simple_ini_parser`]'s forms with:
///
/// - `//` starts a comment, either as the whole line or trailing a
///   section header, a bare key, or a value
/// - a value may be single-quoted; inside quotes, `//`, `=` and spaces
///   are literal, and a backslash escapes the next character (so `\'`
///   and `\\` work)
///
/// An unterminated quote is a syntax error at the opening quote; text
/// between a closing quote and end-of-line that is not a comment is a
/// syntax error where it starts. `#` comments are not part of this
/// dialect.
pub fn quoted_ini_parser(line: &str) -> IniRecord {
    let chars: Vec<char> = line.chars().collect();
    let start = skip_blank(&chars, 0);
    if start == chars.len() || comment_at(&chars, start) {
        return IniRecord::empty();
    }
    // The comment-free extent for everything outside quotes.
    let line_end = (start..chars.len())
        .find(|&i| comment_at(&chars, i))
        .unwrap_or(chars.len());
    if chars[start] == '[' {
        return parse_section(&chars, start, line_end);
    }
    let Some(eq) = (start..line_end).find(|&i| chars[i] == '=') else {
        let key = trimmed_token(&chars, start, line_end);
        return IniRecord {
            kind: IniRecordKind::Key,
            key,
            value: IniToken::default(),
        };
    };
    let key = trimmed_token(&chars, start, eq);
    if key.text.is_empty() {
        return IniRecord::syntax_error(eq + 1);
    }

    let value_start = skip_blank(&chars, eq + 1);
    if value_start < chars.len() && chars[value_start] == '\'' {
        // Quoted values run to the matching quote, comments notwithstanding.
        let mut text = String::new();
        let mut i = value_start + 1;
        loop {
            if i >= chars.len() {
                return IniRecord::syntax_error(value_start + 1);
            }
            match chars[i] {
                '\'' => break,
                '\\' if i + 1 < chars.len() => {
                    text.push(chars[i + 1]);
                    i += 2;
                }
                c => {
                    text.push(c);
                    i += 1;
                }
            }
        }
        let after = skip_blank(&chars, i + 1);
        if after < chars.len() && !comment_at(&chars, after) {
            return IniRecord::syntax_error(after + 1);
        }
        return IniRecord {
            kind: IniRecordKind::KeyValue,
            key,
            value: IniToken::new(text, value_start + 2),
        };
    }

    let value = trimmed_token(&chars, eq + 1, line_end);
    IniRecord {
        kind: IniRecordKind::KeyValue,
        key,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- simple dialect ---

    #[test]
    fn blank_and_comment_lines_are_empty() {
        for line in ["", "   ", "\t", "# note", "   # indented note"] {
            assert_eq!(simple_ini_parser(line).kind, IniRecordKind::Empty, "{line:?}");
        }
    }

    #[test]
    fn key_value_trims_both_sides() {
        let rec = simple_ini_parser("foo = two words  ");
        assert_eq!(rec.kind, IniRecordKind::KeyValue);
        assert_eq!(rec.key, IniToken::new("foo", 1));
        assert_eq!(rec.value, IniToken::new("two words", 7));
    }

    #[test]
    fn hash_inside_a_value_is_literal() {
        let rec = simple_ini_parser("bar = hash#");
        assert_eq!(rec.value.text, "hash#");
    }

    #[test]
    fn value_may_contain_further_equals_signs() {
        let rec = simple_ini_parser("expr = a=b");
        assert_eq!(rec.key.text, "expr");
        assert_eq!(rec.value, IniToken::new("a=b", 8));
    }

    #[test]
    fn empty_value_keeps_its_column() {
        let rec = simple_ini_parser("foo =");
        assert_eq!(rec.kind, IniRecordKind::KeyValue);
        assert_eq!(rec.value, IniToken::new("", 6));
    }

    #[test]
    fn bare_key_is_reported_with_its_column() {
        let rec = simple_ini_parser("   baz");
        assert_eq!(rec.kind, IniRecordKind::Key);
        assert_eq!(rec.key, IniToken::new("baz", 4));
    }

    #[test]
    fn section_name_is_trimmed() {
        let rec = simple_ini_parser("[ blurgle ]");
        assert_eq!(rec.kind, IniRecordKind::Section);
        assert_eq!(rec.key, IniToken::new("blurgle", 3));
    }

    #[test]
    fn empty_section_returns_to_top_level() {
        let rec = simple_ini_parser("[]");
        assert_eq!(rec.kind, IniRecordKind::Section);
        assert_eq!(rec.key.text, "");
    }

    #[test]
    fn unterminated_section_points_after_the_bracket() {
        let rec = simple_ini_parser("[oops");
        assert_eq!(rec.kind, IniRecordKind::SyntaxError);
        assert_eq!(rec.key.column, 2);

        let rec = simple_ini_parser("  [oops");
        assert_eq!(rec.key.column, 4);
    }

    #[test]
    fn trailing_text_after_section_is_an_error() {
        let rec = simple_ini_parser("[name] x");
        assert_eq!(rec.kind, IniRecordKind::SyntaxError);
        assert_eq!(rec.key.column, 8);
    }

    #[test]
    fn missing_key_is_an_error_at_the_equals() {
        let rec = simple_ini_parser("= 3");
        assert_eq!(rec.kind, IniRecordKind::SyntaxError);
        assert_eq!(rec.key.column, 1);

        let rec = simple_ini_parser("  = 3");
        assert_eq!(rec.key.column, 3);
    }

    #[test]
    fn keys_may_contain_spaces() {
        let rec = simple_ini_parser("Edge Count = 9");
        assert_eq!(rec.key, IniToken::new("Edge Count", 1));
    }

    // --- quoted dialect ---

    #[test]
    fn double_slash_comments_whole_line() {
        for line in ["// note", "   // note"] {
            assert_eq!(quoted_ini_parser(line).kind, IniRecordKind::Empty, "{line:?}");
        }
    }

    #[test]
    fn trailing_comments_are_stripped() {
        let rec = quoted_ini_parser("foo = bar // baz");
        assert_eq!(rec.value, IniToken::new("bar", 7));

        let rec = quoted_ini_parser("flag // on by default");
        assert_eq!(rec.kind, IniRecordKind::Key);
        assert_eq!(rec.key.text, "flag");

        let rec = quoted_ini_parser("[s] // section");
        assert_eq!(rec.kind, IniRecordKind::Section);
        assert_eq!(rec.key.text, "s");
    }

    #[test]
    fn quoted_value_preserves_slashes_and_spaces() {
        let rec = quoted_ini_parser("url = 'http://x/y' // home");
        assert_eq!(rec.kind, IniRecordKind::KeyValue);
        assert_eq!(rec.value, IniToken::new("http://x/y", 8));

        let rec = quoted_ini_parser("pad = '  spaced  '");
        assert_eq!(rec.value.text, "  spaced  ");
    }

    #[test]
    fn backslash_escapes_inside_quotes() {
        let rec = quoted_ini_parser(r"name = 'it\'s'");
        assert_eq!(rec.value.text, "it's");

        let rec = quoted_ini_parser(r"path = 'a\\b'");
        assert_eq!(rec.value.text, r"a\b");
    }

    #[test]
    fn unterminated_quote_points_at_the_opening_quote() {
        let rec = quoted_ini_parser("v = 'oops");
        assert_eq!(rec.kind, IniRecordKind::SyntaxError);
        assert_eq!(rec.key.column, 5);
    }

    #[test]
    fn text_after_a_closed_quote_is_an_error() {
        let rec = quoted_ini_parser("v = 'x' y");
        assert_eq!(rec.kind, IniRecordKind::SyntaxError);
        assert_eq!(rec.key.column, 9);

        // A comment there is fine.
        let rec = quoted_ini_parser("v = 'x' // y");
        assert_eq!(rec.kind, IniRecordKind::KeyValue);
        assert_eq!(rec.value.text, "x");
    }

    #[test]
    fn empty_quoted_value() {
        let rec = quoted_ini_parser("v = ''");
        assert_eq!(rec.kind, IniRecordKind::KeyValue);
        assert_eq!(rec.value, IniToken::new("", 6));
    }
}
