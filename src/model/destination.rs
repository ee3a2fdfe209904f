//! Destination identity for classified changes.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::classify::QuoteChars;

/// The kind of schema object a change belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Table,
    View,
    Sequence,
    Index,
    Trigger,
    Procedure,
    Function,
    Package,
    Synonym,
    UserType,
    DbLink,
    /// Sentinel for statements no classification rule matched.
    Unclassified,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Table => "TABLE",
            ObjectType::View => "VIEW",
            ObjectType::Sequence => "SEQUENCE",
            ObjectType::Index => "INDEX",
            ObjectType::Trigger => "TRIGGER",
            ObjectType::Procedure => "PROCEDURE",
            ObjectType::Function => "FUNCTION",
            ObjectType::Package => "PACKAGE",
            ObjectType::Synonym => "SYNONYM",
            ObjectType::UserType => "TYPE",
            ObjectType::DbLink => "DB_LINK",
            ObjectType::Unclassified => "UNCLASSIFIED",
        }
    }

    /// Directory name used under the schema directory in the output tree.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ObjectType::Table => "table",
            ObjectType::View => "view",
            ObjectType::Sequence => "sequence",
            ObjectType::Index => "index",
            ObjectType::Trigger => "trigger",
            ObjectType::Procedure => "procedure",
            ObjectType::Function => "function",
            ObjectType::Package => "package",
            ObjectType::Synonym => "synonym",
            ObjectType::UserType => "usertype",
            ObjectType::DbLink => "dblink",
            ObjectType::Unclassified => "unclassified",
        }
    }

    /// Whether objects of this kind keep an incremental change history.
    ///
    /// Tables evolve through alters and cannot be re-created in place, so
    /// their scripts are a sequence of named changes plus a consolidated
    /// baseline. Everything else is rerunnable and stays flat.
    pub fn is_baseline_eligible(&self) -> bool {
        matches!(self, ObjectType::Table)
    }

    /// Parse a type label case-insensitively (e.g. from an exclusion spec
    /// or an extraction-failure marker).
    pub fn parse(label: &str) -> Option<ObjectType> {
        match label.trim().to_uppercase().as_str() {
            "TABLE" => Some(ObjectType::Table),
            "VIEW" => Some(ObjectType::View),
            "SEQUENCE" => Some(ObjectType::Sequence),
            "INDEX" => Some(ObjectType::Index),
            "TRIGGER" => Some(ObjectType::Trigger),
            "PROCEDURE" => Some(ObjectType::Procedure),
            "FUNCTION" => Some(ObjectType::Function),
            "PACKAGE" | "PACKAGE BODY" | "PACKAGE_BODY" => Some(ObjectType::Package),
            "SYNONYM" => Some(ObjectType::Synonym),
            "TYPE" | "USERTYPE" => Some(ObjectType::UserType),
            "DB_LINK" | "DATABASE LINK" => Some(ObjectType::DbLink),
            "UNCLASSIFIED" => Some(ObjectType::Unclassified),
            _ => None,
        }
    }
}

/// The `(schema, object type, object name)` identity one output artifact
/// corresponds to.
///
/// Quotes are stripped at construction; equality and hashing are
/// case-insensitive so `"Foo"."Bar"` and `FOO.BAR` group together. The
/// original casing is kept for display and path derivation.
#[derive(Debug, Clone)]
pub struct Destination {
    pub schema: String,
    pub object_type: ObjectType,
    pub name: String,
}

impl Destination {
    pub fn new(
        schema: impl Into<String>,
        object_type: ObjectType,
        name: impl Into<String>,
    ) -> Self {
        Destination {
            schema: strip_quotes(&schema.into()),
            object_type,
            name: strip_quotes(&name.into()),
        }
    }

    /// Path of the main change script for this destination.
    pub fn main_path(&self, output_dir: &Path) -> PathBuf {
        self.type_dir(output_dir).join(format!("{}.sql", self.file_stem()))
    }

    /// Path of the baseline companion script.
    pub fn baseline_path(&self, output_dir: &Path) -> PathBuf {
        self.type_dir(output_dir)
            .join(format!("{}.baseline.sql", self.file_stem()))
    }

    fn type_dir(&self, output_dir: &Path) -> PathBuf {
        if self.schema.is_empty() {
            output_dir.join(self.object_type.dir_name())
        } else {
            output_dir
                .join(&self.schema)
                .join(self.object_type.dir_name())
        }
    }

    fn file_stem(&self) -> &str {
        if self.name.is_empty() {
            "unclassified"
        } else {
            &self.name
        }
    }
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool {
        self.object_type == other.object_type
            && self.schema.eq_ignore_ascii_case(&other.schema)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for Destination {}

impl Hash for Destination {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object_type.hash(state);
        self.schema.to_uppercase().hash(state);
        self.name.to_uppercase().hash(state);
    }
}

// Destinations sit below any one platform configuration, so both supported
// quote styles are recognized here.
fn strip_quotes(ident: &str) -> String {
    let trimmed = ident.trim();
    for quotes in [QuoteChars::default(), QuoteChars::new('[', ']')] {
        let stripped = quotes.strip(trimmed);
        if stripped != trimmed {
            return stripped.to_string();
        }
    }
    trimmed.to_string()
}
