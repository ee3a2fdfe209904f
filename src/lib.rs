//! sql-reveng: reverse-engineer a database schema dump into change scripts
//!
//! Takes the raw DDL text a live database dumps for its objects, classifies
//! every statement into a typed change belonging to a named schema object,
//! and writes one diff-friendly script per object, optionally with an
//! incremental baseline/history layout for tables.

pub mod classify;
pub mod error;
pub mod extract;
pub mod manifest;
pub mod model;
pub mod writer;

use std::path::PathBuf;

use anyhow::Result;

use classify::{default_noise_filters, oracle_rules, split_statements, Classifier, QuoteChars, StatementFilter};
use extract::DdlSource;
use manifest::{ConnectionHints, ManifestParams, XmlTemplateRenderer};
use writer::{ObjectExclusions, OverwritePolicy, WriteOptions};

pub use error::RevengError;

/// Options for one reverse-engineering run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Root of the generated script tree
    pub output_dir: PathBuf,
    /// Platform label forwarded into the manifest (e.g. "oracle")
    pub platform: String,
    /// Schema assumed for statements whose names carry none
    pub default_schema: String,
    /// Statement delimiter token in the dump
    pub delimiter: String,
    /// Identifier quote characters the dump uses
    pub quotes: QuoteChars,
    /// Noise predicates applied before classification
    pub statement_filters: Vec<StatementFilter>,
    /// Also emit baseline companion files for tables
    pub generate_baseline: bool,
    pub overwrite: OverwritePolicy,
    pub exclusions: ObjectExclusions,
    /// Connection descriptor fields forwarded into the manifest
    pub connection: ConnectionHints,
    /// Enable progress output
    pub verbose: bool,
}

impl GenerateOptions {
    pub fn new(output_dir: impl Into<PathBuf>, default_schema: impl Into<String>) -> Self {
        GenerateOptions {
            output_dir: output_dir.into(),
            platform: "oracle".to_string(),
            default_schema: default_schema.into(),
            delimiter: "/".to_string(),
            quotes: QuoteChars::default(),
            statement_filters: default_noise_filters(),
            generate_baseline: false,
            overwrite: OverwritePolicy::default(),
            exclusions: ObjectExclusions::standard(),
            connection: ConnectionHints::default(),
            verbose: false,
        }
    }
}

/// What a run produced
#[derive(Debug)]
pub struct GenerateResult {
    pub entry_count: usize,
    pub files_written: Vec<PathBuf>,
    pub manifest_path: PathBuf,
}

/// Run the full pipeline: extract rows, split and classify statements,
/// write one script per destination, then emit the manifest.
pub fn generate_change_scripts(
    source: &mut dyn DdlSource,
    options: &GenerateOptions,
) -> Result<GenerateResult> {
    let rows = source.rows()?;

    if options.verbose {
        println!("Extracted {} dump rows", rows.len());
    }

    let mut classifier = Classifier::new(
        oracle_rules(&options.quotes),
        options.quotes,
        options.default_schema.clone(),
    );

    let mut entries = Vec::new();
    for row in &rows {
        for statement in
            split_statements(&row.raw_text, &options.delimiter, &options.statement_filters)
        {
            entries.push(classifier.classify(&statement));
        }
    }

    if options.verbose {
        println!("Classified {} statements", entries.len());
    }

    let entry_count = entries.len();

    let write_options = WriteOptions {
        output_dir: options.output_dir.clone(),
        generate_baseline: options.generate_baseline,
        overwrite: options.overwrite.clone(),
        exclusions: options.exclusions.clone(),
    };
    let summary = writer::write_changes(entries, &write_options)?;

    if options.verbose {
        println!(
            "Wrote {} files ({} skipped by overwrite policy)",
            summary.files_written.len(),
            summary.files_skipped.len()
        );
    }

    let params = ManifestParams::from_destinations(
        options.platform.clone(),
        &summary.destinations,
        options.connection.clone(),
    );
    let manifest_path = manifest::write_manifest(&options.output_dir, &params, &XmlTemplateRenderer)?;

    if options.verbose {
        println!("Wrote manifest: {}", manifest_path.display());
    }

    Ok(GenerateResult {
        entry_count,
        files_written: summary.files_written,
        manifest_path,
    })
}
