//! Statement classification: splitting, pattern matching, post-processing

pub mod engine;
pub mod postprocess;
pub mod quoted_name;
pub mod rules;
pub mod splitter;

pub use engine::Classifier;
pub use postprocess::{PostProcessor, BODY_SEPARATOR};
pub use quoted_name::QuoteChars;
pub use rules::{oracle_rules, MatchRule, NameArity};
pub use splitter::{default_noise_filters, split_statements, StatementFilter};
