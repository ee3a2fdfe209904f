//! The ordered classification rule table.
//!
//! Each rule maps a family of statements to an object type and tells the
//! engine where the schema and object name live in the match. Rules are
//! evaluated in declaration order and the declaration index doubles as the
//! default emission order for the entries a rule produces.

use regex::{Regex, RegexBuilder};

use crate::model::ObjectType;

use super::postprocess::PostProcessor;
use super::quoted_name::QuoteChars;

/// Emission order for package bodies. The body rule must dispatch before
/// the specification rule, but the body must still emit after the
/// specification when both arrive as separate statements.
pub const PACKAGE_BODY_ORDER: u32 = 50;

/// Emission order for comment statements; comments always follow the table
/// and constraint changes they describe.
pub const COMMENT_ORDER: u32 = 90;

/// Emission order for grants; permissions come after every definition.
pub const GRANT_ORDER: u32 = 95;

/// How many capture groups in a rule's regex carry name information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameArity {
    /// A single capture: the object name. The active schema supplies the
    /// destination schema.
    One,
    /// Two captures: schema (may be absent) and object name.
    Two,
}

/// One entry in the classification table.
#[derive(Debug, Clone)]
pub struct MatchRule {
    /// Natural object type, or `None` to defer: either `forced_type`
    /// decides, or the engine resolves the name against objects already
    /// classified in this run.
    pub object_type: Option<ObjectType>,
    pub arity: NameArity,
    pub regex: Regex,
    /// Override which capture group holds the schema (default 1).
    pub schema_group: Option<usize>,
    /// Override which capture group holds the identity name (default 2,
    /// or 1 for arity ONE).
    pub name_group: Option<usize>,
    /// Fixed destination type when the natural captures denote something
    /// else (an index statement captures its parent table too, but the
    /// destination is the index).
    pub forced_type: Option<ObjectType>,
    /// Fixed emission order; otherwise the rule's declaration index.
    pub fixed_order: Option<u32>,
    /// Static sub-change name for produced entries.
    pub change_name: Option<&'static str>,
    /// Capture group supplying the sub-change name (e.g. a constraint
    /// name); falls back to `change_name` when the group is empty.
    pub change_name_group: Option<usize>,
    /// Metadata annotations attached to produced entries.
    pub annotations: &'static [&'static str],
    /// Text transforms applied to the statement body, in order.
    pub post_processors: Vec<PostProcessor>,
}

impl MatchRule {
    /// Compile a rule. Patterns match case-insensitively and `.` spans
    /// newlines, so multi-line bodies behave like single-line ones.
    pub fn new(object_type: Option<ObjectType>, arity: NameArity, pattern: &str) -> Self {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .expect("Invalid classification pattern");
        MatchRule {
            object_type,
            arity,
            regex,
            schema_group: None,
            name_group: None,
            forced_type: None,
            fixed_order: None,
            change_name: None,
            change_name_group: None,
            annotations: &[],
            post_processors: vec![PostProcessor::StripNameQuotes],
        }
    }

    pub fn with_name_groups(mut self, schema_group: usize, name_group: usize) -> Self {
        self.schema_group = Some(schema_group);
        self.name_group = Some(name_group);
        self
    }

    pub fn with_forced_type(mut self, object_type: ObjectType) -> Self {
        self.forced_type = Some(object_type);
        self
    }

    pub fn with_fixed_order(mut self, order: u32) -> Self {
        self.fixed_order = Some(order);
        self
    }

    pub fn with_change_name(mut self, name: &'static str) -> Self {
        self.change_name = Some(name);
        self
    }

    pub fn with_change_name_group(mut self, group: usize) -> Self {
        self.change_name_group = Some(group);
        self
    }

    pub fn with_annotations(mut self, annotations: &'static [&'static str]) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_post_processors(mut self, chain: Vec<PostProcessor>) -> Self {
        self.post_processors = chain;
        self
    }
}

/// The rule table for Oracle-style dumps.
///
/// Dispatch order matters: `package body` must precede `package`, and the
/// temporary-table form must precede the general alter/index patterns that
/// could otherwise shadow it.
pub fn oracle_rules(quotes: &QuoteChars) -> Vec<MatchRule> {
    let qn = quotes.qualified_name();
    let word = quotes.captured_word();

    vec![
        MatchRule::new(
            Some(ObjectType::Table),
            NameArity::Two,
            &format!(r"^\s*create\s+global\s+temporary\s+table\s+{qn}"),
        )
        .with_change_name("init")
        .with_annotations(&["temporaryTable"])
        .with_post_processors(vec![
            PostProcessor::StripNameQuotes,
            PostProcessor::RemoveTablespace,
        ]),
        MatchRule::new(
            Some(ObjectType::Table),
            NameArity::Two,
            &format!(r"^\s*create\s+table\s+{qn}"),
        )
        .with_change_name("init")
        .with_post_processors(vec![
            PostProcessor::StripNameQuotes,
            PostProcessor::RemoveTablespace,
        ]),
        MatchRule::new(
            Some(ObjectType::Table),
            NameArity::Two,
            &format!(r"^\s*alter\s+table\s+{qn}(?:\s+add\s+constraint\s+{word})?"),
        )
        .with_change_name("alter")
        .with_change_name_group(3),
        MatchRule::new(
            Some(ObjectType::Table),
            NameArity::Two,
            &format!(r"^\s*comment\s+on\s+(?:table|column)\s+{qn}"),
        )
        .with_fixed_order(COMMENT_ORDER)
        .with_change_name("comments"),
        // Group 1/2 is the index identity; groups 3/4 name the parent
        // table and only disambiguate the statement.
        MatchRule::new(
            None,
            NameArity::Two,
            &format!(r"^\s*create\s+(?:unique\s+|bitmap\s+)?index\s+{qn}\s+on\s+{qn}"),
        )
        .with_forced_type(ObjectType::Index)
        .with_name_groups(1, 2)
        .with_post_processors(vec![
            PostProcessor::StripNameQuotes,
            PostProcessor::RemoveTablespace,
        ]),
        MatchRule::new(
            Some(ObjectType::Sequence),
            NameArity::Two,
            &format!(r"^\s*create\s+sequence\s+{qn}"),
        ),
        MatchRule::new(
            Some(ObjectType::View),
            NameArity::Two,
            &format!(
                r"^\s*create\s+(?:or\s+replace\s+)?(?:no\s+)?(?:force\s+)?(?:editionable\s+)?view\s+{qn}"
            ),
        ),
        MatchRule::new(
            Some(ObjectType::Trigger),
            NameArity::Two,
            &format!(r"^\s*create\s+(?:or\s+replace\s+)?(?:editionable\s+)?trigger\s+{qn}"),
        ),
        MatchRule::new(
            Some(ObjectType::Package),
            NameArity::Two,
            &format!(r"^\s*create\s+(?:or\s+replace\s+)?(?:editionable\s+)?package\s+body\s+{qn}"),
        )
        .with_fixed_order(PACKAGE_BODY_ORDER),
        MatchRule::new(
            Some(ObjectType::Package),
            NameArity::Two,
            &format!(r"^\s*create\s+(?:or\s+replace\s+)?(?:editionable\s+)?package\s+{qn}"),
        )
        .with_post_processors(vec![
            PostProcessor::StripNameQuotes,
            PostProcessor::SplitPackageBody,
        ]),
        MatchRule::new(
            Some(ObjectType::Procedure),
            NameArity::Two,
            &format!(r"^\s*create\s+(?:or\s+replace\s+)?(?:editionable\s+)?procedure\s+{qn}"),
        ),
        MatchRule::new(
            Some(ObjectType::Function),
            NameArity::Two,
            &format!(r"^\s*create\s+(?:or\s+replace\s+)?(?:editionable\s+)?function\s+{qn}"),
        ),
        MatchRule::new(
            Some(ObjectType::UserType),
            NameArity::Two,
            &format!(r"^\s*create\s+(?:or\s+replace\s+)?(?:editionable\s+)?type\s+{qn}"),
        ),
        MatchRule::new(
            Some(ObjectType::Synonym),
            NameArity::Two,
            &format!(r"^\s*create\s+(?:or\s+replace\s+)?(?:public\s+)?synonym\s+{qn}"),
        ),
        MatchRule::new(
            Some(ObjectType::DbLink),
            NameArity::One,
            &format!(r"^\s*create\s+(?:shared\s+)?(?:public\s+)?database\s+link\s+{word}"),
        ),
        // Grants carry no type of their own; the engine resolves the name
        // against objects classified earlier in the run.
        MatchRule::new(
            None,
            NameArity::Two,
            &format!(r"^\s*grant\s+[\w\s,]+?\s+on\s+{qn}\s+to\b"),
        )
        .with_fixed_order(GRANT_ORDER)
        .with_change_name("grants"),
    ]
}
