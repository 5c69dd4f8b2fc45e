//! dmreport CLI - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "dmreport")]
#[command(version)]
#[command(about = "Data model report tools", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two versions of a document and annotate the newer one
    Diff {
        /// Old and new document trees (JSON)
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Comparison settings (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the annotated new tree to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the raw diff records to FILE (JSON)
        #[arg(long)]
        diff_report: Option<PathBuf>,

        /// Don't hide unchanged parts of the new tree
        #[arg(long)]
        show_all: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "dmreport=debug,dmreport_diff=debug"
    } else {
        "dmreport=info,dmreport_diff=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Diff {
            files,
            config,
            output,
            diff_report,
            show_all,
        } => commands::diff::execute(commands::diff::DiffArgs {
            files,
            config,
            output,
            diff_report,
            show_all,
        }),
    }
}
