//! Statement splitting and noise filtering for raw DDL dumps.
//!
//! A dump is one large text blob with statements separated by a delimiter
//! that sits on its own line (`/` for Oracle-style dumps). The splitter
//! yields statements in source order; dump chatter such as `SET DEFINE OFF`
//! or spool output is filtered out before classification.

/// Predicate deciding whether a candidate statement is dump noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementFilter {
    /// Drop the statement if it contains this text anywhere.
    Contains(String),
    /// Drop the statement if it starts with this text.
    StartsWith(String),
}

impl StatementFilter {
    /// Case-insensitive match against a trimmed statement.
    pub fn matches(&self, statement: &str) -> bool {
        let upper = statement.to_uppercase();
        match self {
            StatementFilter::Contains(text) => upper.contains(&text.to_uppercase()),
            StatementFilter::StartsWith(text) => upper.starts_with(&text.to_uppercase()),
        }
    }
}

/// Filters for the noise a SQL*Plus style extraction session leaves behind.
pub fn default_noise_filters() -> Vec<StatementFilter> {
    vec![
        StatementFilter::StartsWith("SET ".to_string()),
        StatementFilter::StartsWith("SPOOL".to_string()),
        StatementFilter::StartsWith("EXIT".to_string()),
        StatementFilter::Contains("DBMS_METADATA.SET_TRANSFORM_PARAM".to_string()),
    ]
}

/// Split a dump blob into candidate statements.
///
/// A delimiter is a dedicated line containing only the token, optionally
/// followed by trailing whitespace. Statements are trimmed of trailing
/// whitespace; empty chunks and chunks matching a filter are dropped.
/// Source order is preserved.
pub fn split_statements<'a>(
    text: &'a str,
    delimiter: &'a str,
    filters: &'a [StatementFilter],
) -> impl Iterator<Item = String> + 'a {
    let mut lines = text.lines();
    let mut done = false;

    std::iter::from_fn(move || {
        while !done {
            let mut current = String::new();
            let mut saw_line = false;

            loop {
                match lines.next() {
                    Some(line) if line.trim_end() == delimiter => break,
                    Some(line) => {
                        if saw_line {
                            current.push('\n');
                        }
                        current.push_str(line);
                        saw_line = true;
                    }
                    None => {
                        done = true;
                        break;
                    }
                }
            }

            let statement = current.trim_end().to_string();
            if statement.trim().is_empty() {
                continue;
            }
            if filters.iter().any(|f| f.matches(statement.trim())) {
                continue;
            }
            return Some(statement);
        }
        None
    })
}
