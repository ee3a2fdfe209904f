//! Text post-processors applied to matched statement bodies.
//!
//! Each processor is a pure text-to-text transform. A classification rule
//! carries an ordered chain of them, applied left-to-right before the
//! statement becomes a change entry's SQL body.

use regex::{Regex, RegexBuilder};

use super::quoted_name::QuoteChars;

/// Separator line inserted between a package specification and its body
/// when both arrive in one combined statement.
pub const BODY_SEPARATOR: &str = "//// BODY";

/// A single text transform in a rule's post-processing chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcessor {
    /// Strip the platform quote pair from identifiers that need no quoting
    /// (plain word names). Names that genuinely require quotes, such as
    /// ones containing spaces, keep them.
    StripNameQuotes,
    /// Remove `TABLESPACE <name>` storage clauses.
    RemoveTablespace,
    /// Insert a [`BODY_SEPARATOR`] line where a combined
    /// `create package` + `create package body` statement switches to the
    /// body definition.
    SplitPackageBody,
}

impl PostProcessor {
    pub fn apply(&self, sql: &str, quotes: &QuoteChars) -> String {
        match self {
            PostProcessor::StripNameQuotes => strip_name_quotes(sql, quotes),
            PostProcessor::RemoveTablespace => remove_tablespace(sql, quotes),
            PostProcessor::SplitPackageBody => split_package_body(sql),
        }
    }
}

/// Apply a chain of post-processors in declared order.
pub fn apply_chain(chain: &[PostProcessor], sql: &str, quotes: &QuoteChars) -> String {
    let mut result = sql.to_string();
    for processor in chain {
        result = processor.apply(&result, quotes);
    }
    result
}

fn strip_name_quotes(sql: &str, quotes: &QuoteChars) -> String {
    let pattern = format!(
        "{s}([A-Za-z_][A-Za-z0-9_$#]*){e}",
        s = regex::escape(&quotes.start.to_string()),
        e = regex::escape(&quotes.end.to_string()),
    );
    // Quote chars come from configuration, not user data; the pattern is
    // well-formed for any escaped character pair.
    let re = Regex::new(&pattern).expect("invalid quote-strip pattern");
    re.replace_all(sql, "$1").into_owned()
}

fn remove_tablespace(sql: &str, quotes: &QuoteChars) -> String {
    let pattern = format!("\\s+TABLESPACE\\s+{}", quotes.word());
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .expect("invalid tablespace pattern");
    re.replace_all(sql, "").into_owned()
}

fn split_package_body(sql: &str) -> String {
    let re = RegexBuilder::new(r"create\s+(?:or\s+replace\s+)?(?:editionable\s+)?package\s+body\b")
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("invalid package body pattern");

    match re.find(sql) {
        // A body preceded by a specification: split into two logical
        // statements at the point the body begins.
        Some(m) if m.start() > 0 => {
            let head = sql[..m.start()].trim_end();
            format!("{}\n\n{}\n\n{}", head, BODY_SEPARATOR, &sql[m.start()..])
        }
        _ => sql.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quotes() -> QuoteChars {
        QuoteChars::default()
    }

    #[test]
    fn test_strip_name_quotes() {
        let sql = "create table \"S1\".\"T1\" (\"ID\" number)";
        let result = PostProcessor::StripNameQuotes.apply(sql, &quotes());
        assert_eq!(result, "create table S1.T1 (ID number)");
    }

    #[test]
    fn test_strip_name_quotes_keeps_names_that_need_quoting() {
        let sql = "create table \"S1\".\"My Table\" (id number)";
        let result = PostProcessor::StripNameQuotes.apply(sql, &quotes());
        assert_eq!(result, "create table S1.\"My Table\" (id number)");
    }

    #[test]
    fn test_strip_name_quotes_bracket_style() {
        let q = QuoteChars::new('[', ']');
        let sql = "create table [dbo].[T1] ([Id] int)";
        let result = PostProcessor::StripNameQuotes.apply(sql, &q);
        assert_eq!(result, "create table dbo.T1 (Id int)");
    }

    #[test]
    fn test_remove_tablespace() {
        let sql = "create table S1.T1 (id number) TABLESPACE USERS";
        let result = PostProcessor::RemoveTablespace.apply(sql, &quotes());
        assert_eq!(result, "create table S1.T1 (id number)");
    }

    #[test]
    fn test_remove_quoted_tablespace_case_insensitive() {
        let sql = "create index S1.I1 on S1.T1 (id) tablespace \"DATA_01\" compress";
        let result = PostProcessor::RemoveTablespace.apply(sql, &quotes());
        assert_eq!(result, "create index S1.I1 on S1.T1 (id) compress");
    }

    #[test]
    fn test_split_package_body() {
        let sql = "create or replace package P1 as\n  procedure run;\nend;\ncreate or replace package body P1 as\n  procedure run is begin null; end;\nend;";
        let result = PostProcessor::SplitPackageBody.apply(sql, &quotes());
        assert_eq!(
            result,
            "create or replace package P1 as\n  procedure run;\nend;\n\n//// BODY\n\ncreate or replace package body P1 as\n  procedure run is begin null; end;\nend;"
        );
    }

    #[test]
    fn test_split_package_body_leaves_bare_body_alone() {
        let sql = "create or replace package body P1 as\nend;";
        let result = PostProcessor::SplitPackageBody.apply(sql, &quotes());
        assert_eq!(result, sql);
    }

    #[test]
    fn test_split_package_body_leaves_spec_only_alone() {
        let sql = "create or replace package P1 as\nend;";
        let result = PostProcessor::SplitPackageBody.apply(sql, &quotes());
        assert_eq!(result, sql);
    }

    #[test]
    fn test_chain_applies_in_order() {
        let sql = "create table \"S1\".\"T1\" (id number) TABLESPACE \"USERS\"";
        let chain = [PostProcessor::StripNameQuotes, PostProcessor::RemoveTablespace];
        let result = apply_chain(&chain, sql, &quotes());
        assert_eq!(result, "create table S1.T1 (id number)");
    }

    #[test]
    fn test_processors_are_pure() {
        let sql = "create table \"S1\".\"T1\" (id number)";
        let once = PostProcessor::StripNameQuotes.apply(sql, &quotes());
        let twice = PostProcessor::StripNameQuotes.apply(&once, &quotes());
        assert_eq!(once, twice);
    }
}
