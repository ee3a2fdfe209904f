//! Grouping, ordering, and writing of classified change entries.

pub mod policy;
pub mod render;

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::RevengError;
use crate::model::{ChangeEntry, Destination};

pub use policy::{ObjectExclusions, OverwritePolicy, BOOKKEEPING_TABLES};
pub use render::{render_flat, render_group};

/// Output configuration for the write phase.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub output_dir: PathBuf,
    /// Also write the consolidated baseline companion for every
    /// baseline-eligible destination.
    pub generate_baseline: bool,
    pub overwrite: OverwritePolicy,
    pub exclusions: ObjectExclusions,
}

impl WriteOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        WriteOptions {
            output_dir: output_dir.into(),
            generate_baseline: false,
            overwrite: OverwritePolicy::default(),
            exclusions: ObjectExclusions::standard(),
        }
    }
}

/// What the write phase did, for reporting and for the manifest stage.
#[derive(Debug, Default)]
pub struct WriteSummary {
    pub files_written: Vec<PathBuf>,
    pub files_skipped: Vec<PathBuf>,
    /// Surviving (post-exclusion) destinations in first-appearance order.
    pub destinations: Vec<Destination>,
}

/// Group entries by destination, order them, and write one file per
/// surviving destination.
///
/// Any I/O failure aborts the remaining writes; files already written
/// stay on disk and cleanup is the caller's concern.
pub fn write_changes(
    entries: Vec<ChangeEntry>,
    options: &WriteOptions,
) -> Result<WriteSummary, RevengError> {
    let groups = group_entries(entries, &options.exclusions);
    let mut summary = WriteSummary::default();

    for (destination, group) in &groups {
        let main_path = destination.main_path(&options.output_dir);
        if let Some(parent) = main_path.parent() {
            fs::create_dir_all(parent).map_err(|e| RevengError::DestinationWriteError {
                path: main_path.clone(),
                source: e,
            })?;
        }

        if options.overwrite.should_write(&main_path, destination) {
            fs::write(&main_path, render_group(group)).map_err(|e| {
                RevengError::DestinationWriteError {
                    path: main_path.clone(),
                    source: e,
                }
            })?;
            summary.files_written.push(main_path);
        } else {
            summary.files_skipped.push(main_path);
        }

        // The baseline companion tracks the latest full history and is
        // refreshed on every run, independent of the main-file decision.
        if options.generate_baseline && group.iter().any(|e| e.baseline_eligible) {
            let baseline_path = destination.baseline_path(&options.output_dir);
            fs::write(&baseline_path, render_flat(group)).map_err(|e| {
                RevengError::DestinationWriteError {
                    path: baseline_path.clone(),
                    source: e,
                }
            })?;
            summary.files_written.push(baseline_path);
        }

        summary.destinations.push(destination.clone());
    }

    Ok(summary)
}

/// Drop excluded entries, group the rest by destination identity in
/// first-appearance order, and sort each group by the composite
/// `(order, sub-change name)` key.
pub fn group_entries(
    entries: Vec<ChangeEntry>,
    exclusions: &ObjectExclusions,
) -> IndexMap<Destination, Vec<ChangeEntry>> {
    let mut groups: IndexMap<Destination, Vec<ChangeEntry>> = IndexMap::new();
    for entry in entries {
        if exclusions.is_excluded(&entry.destination) {
            continue;
        }
        groups
            .entry(entry.destination.clone())
            .or_default()
            .push(entry);
    }

    for group in groups.values_mut() {
        group.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| a.sort_name().cmp(b.sort_name()))
        });
    }
    groups
}
