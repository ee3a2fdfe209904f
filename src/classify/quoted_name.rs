//! Regex fragments for possibly-quoted object names.
//!
//! Dump output mixes quoted (`"Name"`) and bare (`Name`) identifier forms,
//! optionally schema-qualified. The fragments built here are embedded into
//! the classification rule patterns so every rule recognizes both forms
//! without repeating the quoting logic.

/// The quote characters a platform uses around identifiers.
///
/// Oracle and the SQL standard use `"` on both sides; SQL Server style
/// brackets would be `[` / `]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteChars {
    pub start: char,
    pub end: char,
}

impl Default for QuoteChars {
    fn default() -> Self {
        QuoteChars {
            start: '"',
            end: '"',
        }
    }
}

impl QuoteChars {
    pub fn new(start: char, end: char) -> Self {
        QuoteChars { start, end }
    }

    /// Regex fragment matching one identifier, quoted or bare, without
    /// capturing. Bare identifiers stop at punctuation and whitespace so a
    /// following keyword or `.` is never swallowed into the name.
    pub fn word(&self) -> String {
        format!(
            "(?:{s}[^{e}]+{e}|[A-Za-z_][A-Za-z0-9_$#]*)",
            s = regex::escape(&self.start.to_string()),
            e = regex::escape(&self.end.to_string()),
        )
    }

    /// Regex fragment capturing one identifier.
    pub fn captured_word(&self) -> String {
        format!("({})", self.word())
    }

    /// Regex fragment for an optionally schema-qualified name.
    ///
    /// Produces exactly two capture groups: group 1 is the schema (absent
    /// for bare names), group 2 is the object name.
    pub fn qualified_name(&self) -> String {
        format!(
            "(?:({w})\\s*\\.\\s*)?({w})",
            w = self.word()
        )
    }

    /// Strip the quote pair from an identifier, if present.
    pub fn strip<'a>(&self, ident: &'a str) -> &'a str {
        let trimmed = ident.trim();
        trimmed
            .strip_prefix(self.start)
            .and_then(|rest| rest.strip_suffix(self.end))
            .unwrap_or(trimmed)
    }
}
