//! Overwrite policies and object exclusions for the write phase.

use std::collections::HashSet;
use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::error::RevengError;
use crate::model::{Destination, ObjectType};

/// Audit tables the deployment tooling maintains for itself. They show up
/// in a live schema dump but must never appear in the reverse-engineered
/// scripts that feed the same tooling.
pub const BOOKKEEPING_TABLES: &[&str] = &[
    "SCHEMA_CHANGE_AUDIT",
    "SCHEMA_CHANGE_LOCK",
    "SCHEMA_CHANGE_EXEC*",
];

/// Decides whether a destination's main file may be (re)written.
#[derive(Debug, Clone)]
pub enum OverwritePolicy {
    /// Write only when the file does not exist yet. The default: generated
    /// scripts that were hand-edited after a previous run survive.
    Never,
    /// Always rewrite.
    Always,
    /// Rewrite when the file is absent or the object name is in the
    /// allow-set (case-insensitive).
    TableAllowList(HashSet<String>),
}

impl Default for OverwritePolicy {
    fn default() -> Self {
        OverwritePolicy::Never
    }
}

impl OverwritePolicy {
    pub fn allow_list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        OverwritePolicy::TableAllowList(
            names
                .into_iter()
                .map(|n| n.as_ref().to_uppercase())
                .collect(),
        )
    }

    pub fn should_write(&self, path: &Path, destination: &Destination) -> bool {
        match self {
            OverwritePolicy::Never => !path.exists(),
            OverwritePolicy::Always => true,
            OverwritePolicy::TableAllowList(names) => {
                !path.exists() || names.contains(&destination.name.to_uppercase())
            }
        }
    }
}

/// A caller-supplied deny list of objects to drop before grouping.
///
/// Names match case-insensitively; `*` and `%` act as wildcards. A rule
/// without an object type applies to every type.
#[derive(Debug, Clone, Default)]
pub struct ObjectExclusions {
    rules: Vec<ExclusionRule>,
}

#[derive(Debug, Clone)]
struct ExclusionRule {
    object_type: Option<ObjectType>,
    name: Regex,
}

impl ObjectExclusions {
    pub fn none() -> Self {
        ObjectExclusions::default()
    }

    /// Exclusions every run should carry: the deploy tooling's own
    /// bookkeeping tables.
    pub fn standard() -> Self {
        let mut exclusions = ObjectExclusions::default();
        for name in BOOKKEEPING_TABLES {
            exclusions
                .add(Some(ObjectType::Table), name)
                .expect("Invalid bookkeeping table pattern");
        }
        exclusions
    }

    pub fn add(
        &mut self,
        object_type: Option<ObjectType>,
        pattern: &str,
    ) -> Result<(), RevengError> {
        let translated = format!(
            "^{}$",
            regex::escape(pattern).replace(r"\*", ".*").replace('%', ".*")
        );
        let name = RegexBuilder::new(&translated)
            .case_insensitive(true)
            .build()
            .map_err(|e| RevengError::InvalidExclusionPattern {
                pattern: pattern.to_string(),
                source: e,
            })?;
        self.rules.push(ExclusionRule { object_type, name });
        Ok(())
    }

    pub fn is_excluded(&self, destination: &Destination) -> bool {
        self.rules.iter().any(|rule| {
            rule.object_type
                .map_or(true, |ty| ty == destination.object_type)
                && rule.name.is_match(&destination.name)
        })
    }
}
