//! The pattern classification engine.
//!
//! Takes candidate statements and the ordered rule table and produces
//! exactly one [`ChangeEntry`] per statement. Statements no rule matches
//! are never dropped; they become diagnostic unclassified entries so a
//! human can resolve the gap later.

use std::collections::HashMap;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ChangeEntry, Destination, ObjectType};

use super::postprocess::apply_chain;
use super::quoted_name::QuoteChars;
use super::rules::{MatchRule, NameArity};

/// Emission order assigned to unclassified entries; they sort after
/// everything a rule produced.
pub const UNCLASSIFIED_ORDER: u32 = u32::MAX;

/// Recognizes the diagnostic comment the extraction fallback writes when
/// per-object extraction fails, so the object identity survives into the
/// unclassified entry.
static EXTRACT_FAILURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*--\s*UNABLE TO EXTRACT DDL FOR OBJECT\s+(?:([A-Za-z_][\w$#]*)\.)?([A-Za-z_][\w$#]*)",
    )
    .expect("Invalid extraction failure pattern")
});

/// Statement classifier. First matching rule wins; rule order is fixed at
/// construction and never reordered.
pub struct Classifier {
    rules: Vec<MatchRule>,
    quotes: QuoteChars,
    active_schema: String,
    /// Objects classified so far, keyed by uppercased name. Rules without
    /// a type of their own (grants) resolve against this.
    seen: HashMap<String, Destination>,
}

impl Classifier {
    pub fn new(rules: Vec<MatchRule>, quotes: QuoteChars, active_schema: impl Into<String>) -> Self {
        Classifier {
            rules,
            quotes,
            active_schema: active_schema.into(),
            seen: HashMap::new(),
        }
    }

    /// Classify one statement into exactly one change entry.
    pub fn classify(&mut self, statement: &str) -> ChangeEntry {
        for (index, rule) in self.rules.iter().enumerate() {
            let Some(caps) = rule.regex.captures(statement) else {
                continue;
            };

            let (schema, name) = self.extract_identity(rule, &caps);

            let object_type = match rule.forced_type.or(rule.object_type) {
                Some(ty) => ty,
                // Context-deferred rule: the name must belong to an object
                // already classified in this run.
                None => match self.seen.get(&name.to_uppercase()) {
                    Some(dest) => dest.object_type,
                    None => return self.unclassified(statement),
                },
            };

            let sub_change_name = rule
                .change_name_group
                .and_then(|g| caps.get(g))
                .map(|m| self.quotes.strip(m.as_str()).to_string())
                .or_else(|| rule.change_name.map(|n| n.to_string()));

            let destination = Destination::new(schema, object_type, name);
            self.seen
                .insert(destination.name.to_uppercase(), destination.clone());

            return ChangeEntry {
                baseline_eligible: object_type.is_baseline_eligible(),
                destination,
                sub_change_name,
                order: rule.fixed_order.unwrap_or(index as u32),
                sql: apply_chain(&rule.post_processors, statement, &self.quotes),
                annotations: rule.annotations.iter().map(|a| a.to_string()).collect(),
                change_annotation: None,
            };
        }

        self.unclassified(statement)
    }

    fn extract_identity(&self, rule: &MatchRule, caps: &regex::Captures) -> (String, String) {
        match rule.arity {
            NameArity::One => {
                let name = caps
                    .get(rule.name_group.unwrap_or(1))
                    .map(|m| self.quotes.strip(m.as_str()).to_string())
                    .unwrap_or_default();
                (self.active_schema.clone(), name)
            }
            NameArity::Two => {
                let schema = caps
                    .get(rule.schema_group.unwrap_or(1))
                    .map(|m| self.quotes.strip(m.as_str()).to_string())
                    .unwrap_or_else(|| self.active_schema.clone());
                let name = caps
                    .get(rule.name_group.unwrap_or(2))
                    .map(|m| self.quotes.strip(m.as_str()).to_string())
                    .unwrap_or_default();
                (schema, name)
            }
        }
    }

    /// Fallback for statements no rule matched: keep the raw text and
    /// recover the object identity from the extraction-failure marker when
    /// one is present.
    fn unclassified(&self, statement: &str) -> ChangeEntry {
        let (schema, name) = match EXTRACT_FAILURE_RE.captures(statement) {
            Some(caps) => (
                caps.get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| self.active_schema.clone()),
                caps.get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };

        let mut annotations = IndexSet::new();
        annotations.insert("unclassified".to_string());

        ChangeEntry {
            destination: Destination::new(schema, ObjectType::Unclassified, name),
            sub_change_name: None,
            order: UNCLASSIFIED_ORDER,
            sql: statement.to_string(),
            annotations,
            change_annotation: None,
            baseline_eligible: false,
        }
    }
}
