//! The classified unit of work: one statement mapped to one destination.

use indexmap::IndexSet;

use super::destination::Destination;

/// One classified change produced by the pattern classifier.
///
/// Entries are created once per input statement, never mutated, and
/// consumed exactly once by the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEntry {
    /// Where this change belongs.
    pub destination: Destination,
    /// Name of the sub-change within the destination's history (e.g. a
    /// constraint name for an `ALTER TABLE`). Entries sharing a name are
    /// merged under one change header.
    pub sub_change_name: Option<String>,
    /// Emission priority within the destination. Defaults to the index of
    /// the rule that produced the entry.
    pub order: u32,
    /// The post-processed SQL body.
    pub sql: String,
    /// Directives rendered on the destination's metadata line.
    pub annotations: IndexSet<String>,
    /// Optional suffix appended to this entry's change header.
    pub change_annotation: Option<String>,
    /// Whether the destination keeps an incremental history.
    pub baseline_eligible: bool,
}

impl ChangeEntry {
    /// Sub-change name as used for ordering; absent sorts as empty string.
    pub fn sort_name(&self) -> &str {
        self.sub_change_name.as_deref().unwrap_or("")
    }
}
