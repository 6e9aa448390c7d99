//! Weft CLI
//!
//! Developer tool around the Weft diff engine: diff two JSON documents or
//! replay a patch onto one.

use clap::{Parser, Subcommand, ValueEnum};
use weft_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines on stderr
    Pretty,
    /// One JSON object per line on stderr
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "weft")]
#[command(about = "Weft - structural diff and patch for entity trees", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the patch that turns one JSON document into another
    Diff(commands::diff::DiffArgs),
    /// Replay a patch onto a JSON document and print the result
    Apply(commands::apply::ApplyArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Apply(args) => commands::apply::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
