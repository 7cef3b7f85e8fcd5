//! oxide-ddl CLI
//!
//! Reads change commands as JSON and prints the DDL that carries them out.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::input::{load_commands, read_commands};
use oxide_ddl::prelude::*;

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// SQL script with a comment line per action.
    Script,
    /// JSON array of `{label, statement}` objects.
    Json,
}

/// Generate DDL for column and view changes.
#[derive(Parser)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target dialect (mysql, mariadb, postgresql, postgres, pg).
    #[arg(short, long, env = "OXIDE_DDL_DIALECT", default_value = "mysql")]
    dialect: DialectKind,

    /// Only quote identifiers that need it.
    #[arg(long)]
    quote_when_needed: bool,

    /// Fail on column types the dialect does not know instead of
    /// substituting the default type.
    #[arg(long)]
    strict_types: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Script)]
    format: OutputFormat,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Change file (JSON). Reads stdin when omitted.
    input: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the script can be piped
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let commands = match &cli.input {
        Some(path) => load_commands(path)
            .with_context(|| format!("Failed to read change file {}", path.display()))?,
        None => read_commands(io::stdin().lock()).context("Failed to read changes from stdin")?,
    };

    let quote_policy = if cli.quote_when_needed {
        QuotePolicy::WhenNeeded
    } else {
        QuotePolicy::Always
    };
    let dialect = cli.dialect.build(quote_policy);
    let synthesizer = ActionSynthesizer::new(dialect.as_ref()).strict_types(cli.strict_types);

    let actions = synthesizer.synthesize_all(&commands)?;
    info!(
        dialect = %cli.dialect,
        commands = commands.len(),
        actions = actions.len(),
        "Synthesized DDL"
    );

    let out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(out);

    match cli.format {
        OutputFormat::Script => {
            let mut writer = ScriptWriter::new(&mut out);
            execute_actions(&mut writer, &actions)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &actions)?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    Ok(())
}
