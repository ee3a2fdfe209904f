//! The extraction collaborator boundary.
//!
//! The live-database query that produces raw DDL rows is platform glue
//! outside the classification core; this module fixes the row shape, the
//! bulk-then-per-object fallback, and the diagnostic placeholder contract
//! the classifier's unclassified path relies on.

use std::path::{Path, PathBuf};

use anyhow::Result;
use encoding_rs::WINDOWS_1252;

use crate::error::RevengError;

/// Reserved marker opening a diagnostic placeholder row. The classifier
/// recognizes it and recovers the object identity from the comment.
pub const EXTRACT_FAILURE_MARKER: &str = "-- UNABLE TO EXTRACT DDL";

/// One row from the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlRow {
    /// Primary sort hint: table-like objects sort before dependent ones.
    pub primary_sort_key: i32,
    pub object_name: String,
    /// Secondary hint: primary definitions before their comments.
    pub secondary_sort_key: i32,
    pub object_type: String,
    pub raw_text: String,
}

/// Reference to one object, used by the per-object fallback listing.
#[derive(Debug, Clone)]
pub struct ObjectRef {
    pub name: String,
    pub object_type: String,
}

/// A source of DDL rows. Implementations own connection and transport
/// concerns; rows leave this boundary de-duplicated and sorted.
pub trait DdlSource {
    fn rows(&mut self) -> Result<Vec<DdlRow>>;
}

/// Run a best-effort bulk extraction, falling back to a per-object listing
/// plus individual extraction when the bulk call fails. A per-object
/// failure is converted into a diagnostic placeholder row rather than
/// propagated, so one broken object never sinks the run.
pub fn extract_with_fallback<B, L, O>(bulk: B, list: L, mut extract_one: O) -> Result<Vec<DdlRow>>
where
    B: FnOnce() -> Result<Vec<DdlRow>>,
    L: FnOnce() -> Result<Vec<ObjectRef>>,
    O: FnMut(&ObjectRef) -> Result<DdlRow>,
{
    let mut rows = match bulk() {
        Ok(rows) => rows,
        Err(_) => {
            let objects = list()?;
            objects
                .iter()
                .map(|obj| {
                    extract_one(obj).unwrap_or_else(|e| placeholder_row(obj, &e.to_string()))
                })
                .collect()
        }
    };

    rows.sort_by(|a, b| {
        (a.primary_sort_key, &a.object_name, a.secondary_sort_key).cmp(&(
            b.primary_sort_key,
            &b.object_name,
            b.secondary_sort_key,
        ))
    });
    rows.dedup();
    Ok(rows)
}

/// Build the diagnostic placeholder for an object whose DDL could not be
/// extracted. The text is a plain comment a human can act on, and its
/// first line carries the reserved marker the classifier parses.
pub fn placeholder_row(object: &ObjectRef, error: &str) -> DdlRow {
    DdlRow {
        primary_sort_key: i32::MAX,
        object_name: object.name.clone(),
        secondary_sort_key: 0,
        object_type: object.object_type.clone(),
        raw_text: format!(
            "{} FOR OBJECT {} (TYPE {})\n-- {}",
            EXTRACT_FAILURE_MARKER,
            object.name,
            object.object_type.to_uppercase(),
            error.lines().collect::<Vec<_>>().join("\n-- "),
        ),
    }
}

/// A dump file on disk, treated as one pre-extracted row.
///
/// Files written on Windows are often not UTF-8; reading tries UTF-8
/// first, then Windows-1252.
pub struct FileDumpSource {
    path: PathBuf,
}

impl FileDumpSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileDumpSource { path: path.into() }
    }
}

impl DdlSource for FileDumpSource {
    fn rows(&mut self) -> Result<Vec<DdlRow>> {
        let text = read_with_encoding_fallback(&self.path)?;
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);
        Ok(vec![DdlRow {
            primary_sort_key: 0,
            object_name: String::new(),
            secondary_sort_key: 0,
            object_type: String::new(),
            raw_text: text.to_string(),
        }])
    }
}

fn read_with_encoding_fallback(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| RevengError::DumpReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    match String::from_utf8(bytes.clone()) {
        Ok(s) => Ok(s),
        Err(_) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(RevengError::DumpEncodingError {
                    path: path.to_path_buf(),
                }
                .into())
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}
