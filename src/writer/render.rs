//! Rendering of grouped change entries into file bodies.
//!
//! Output must be byte-stable for a given entry sequence: these files live
//! in version control and spurious diffs defeat the point.

use indexmap::IndexSet;

use crate::model::ChangeEntry;

/// Render a destination's entries, already ordered, into its main file
/// body. Baseline-eligible destinations get named change sections; the
/// rest get a flat concatenation.
pub fn render_group(entries: &[ChangeEntry]) -> String {
    if entries.iter().any(|e| e.baseline_eligible) {
        render_history(entries)
    } else {
        render_flat(entries)
    }
}

/// Flat body: optional metadata line, then trimmed SQL bodies joined with
/// one blank line. Also used for the baseline companion artifact, which is
/// the consolidated full-history view without change headers.
pub fn render_flat(entries: &[ChangeEntry]) -> String {
    let mut out = String::new();
    if let Some(line) = metadata_line(entries) {
        out.push_str(&line);
        out.push('\n');
    }
    for entry in entries {
        out.push_str(entry.sql.trim());
        out.push_str("\n\n");
    }
    normalize_trailing(out)
}

/// History body: change sections with `//// CHANGE name=...` headers. A
/// header is emitted only when the sub-change name differs from the
/// immediately preceding entry's, so consecutive entries sharing a name
/// merge under one header; the first annotation found among the merged
/// entries is rendered on that header.
fn render_history(entries: &[ChangeEntry]) -> String {
    let mut out = String::new();
    if let Some(line) = metadata_line(entries) {
        out.push_str(&line);
        out.push('\n');
    }

    let mut start = 0;
    while start < entries.len() {
        let name = entries[start].sort_name();
        let end = start
            + entries[start..]
                .iter()
                .take_while(|e| e.sort_name() == name)
                .count();
        let section = &entries[start..end];

        out.push_str("//// CHANGE name=");
        out.push_str(name);
        // The header speaks for the whole section, so any merged entry may
        // supply the annotation.
        if let Some(annotation) = section.iter().find_map(|e| e.change_annotation.as_deref()) {
            out.push(' ');
            out.push_str(annotation);
        }
        out.push('\n');

        for entry in section {
            out.push_str(entry.sql.trim());
            out.push_str("\n\n");
        }
        start = end;
    }
    normalize_trailing(out)
}

/// Annotations across all entries, deduplicated in first-appearance order,
/// as one leading directive line.
fn metadata_line(entries: &[ChangeEntry]) -> Option<String> {
    let annotations: IndexSet<&str> = entries
        .iter()
        .flat_map(|e| e.annotations.iter().map(|a| a.as_str()))
        .collect();
    if annotations.is_empty() {
        return None;
    }
    let joined: Vec<&str> = annotations.into_iter().collect();
    Some(format!("//// METADATA {}", joined.join(" ")))
}

fn normalize_trailing(mut out: String) -> String {
    while out.ends_with('\n') {
        out.pop();
    }
    out.push('\n');
    out
}
