use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sql_reveng::classify::QuoteChars;
use sql_reveng::extract::FileDumpSource;
use sql_reveng::manifest::ConnectionHints;
use sql_reveng::model::ObjectType;
use sql_reveng::writer::{ObjectExclusions, OverwritePolicy};
use sql_reveng::{generate_change_scripts, GenerateOptions};

#[derive(Parser)]
#[command(name = "sql-reveng")]
#[command(author, version, about = "Reverse-engineer a schema dump into change scripts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate change scripts from a raw DDL dump file
    Generate {
        /// Path to the dump file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the generated script tree
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Schema assumed for unqualified object names
        #[arg(short, long)]
        schema: String,

        /// Platform label recorded in the manifest
        #[arg(long, default_value = "oracle")]
        platform: String,

        /// Statement delimiter token
        #[arg(long, default_value = "/")]
        delimiter: String,

        /// Also emit baseline companion files for tables
        #[arg(long)]
        baseline: bool,

        /// Overwrite mode: never, always, or tables (allow-listed)
        #[arg(long, default_value = "never")]
        overwrite: String,

        /// Table names the "tables" overwrite mode may rewrite
        #[arg(long)]
        overwrite_table: Vec<String>,

        /// Objects to exclude, as NAME or TYPE:NAME (wildcards allowed)
        #[arg(long)]
        exclude: Vec<String>,

        /// JDBC-style URL recorded in the manifest
        #[arg(long)]
        url: Option<String>,

        /// Database host recorded in the manifest
        #[arg(long)]
        host: Option<String>,

        /// Database port recorded in the manifest
        #[arg(long)]
        port: Option<u16>,

        /// Logical server name recorded in the manifest
        #[arg(long)]
        server_name: Option<String>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output_dir,
            schema,
            platform,
            delimiter,
            baseline,
            overwrite,
            overwrite_table,
            exclude,
            url,
            host,
            port,
            server_name,
            verbose,
        } => {
            let mut options = GenerateOptions::new(output_dir, schema);
            options.platform = platform;
            options.delimiter = delimiter;
            options.quotes = QuoteChars::default();
            options.generate_baseline = baseline;
            options.overwrite = parse_overwrite(&overwrite, &overwrite_table)?;
            options.exclusions = parse_exclusions(&exclude)?;
            options.connection = ConnectionHints {
                url,
                host,
                port,
                server_name,
            };
            options.verbose = verbose;

            let mut source = FileDumpSource::new(input);
            let result = generate_change_scripts(&mut source, &options)?;

            println!(
                "Generated {} files from {} classified changes",
                result.files_written.len(),
                result.entry_count
            );
        }
    }

    Ok(())
}

fn parse_overwrite(mode: &str, tables: &[String]) -> Result<OverwritePolicy> {
    match mode {
        "never" => Ok(OverwritePolicy::Never),
        "always" => Ok(OverwritePolicy::Always),
        "tables" => Ok(OverwritePolicy::allow_list(tables)),
        other => bail!("Unknown overwrite mode: {other} (expected never, always, or tables)"),
    }
}

fn parse_exclusions(specs: &[String]) -> Result<ObjectExclusions> {
    let mut exclusions = ObjectExclusions::standard();
    for spec in specs {
        match spec.split_once(':') {
            Some((type_label, name)) => {
                let Some(object_type) = ObjectType::parse(type_label) else {
                    bail!("Unknown object type in exclusion: {spec}");
                };
                exclusions.add(Some(object_type), name)?;
            }
            None => exclusions.add(None, spec)?,
        }
    }
    Ok(exclusions)
}
