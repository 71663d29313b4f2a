//! flowlint CLI tool.
//!
//! Usage:
//! ```bash
//! flowlint review [OPTIONS] <RELEASE>
//! flowlint list-rules
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Quality reviewer for exported automation releases
#[derive(Parser)]
#[command(name = "flowlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a release archive and emit the report
    Review {
        /// Path to the exported release XML
        release: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },

    /// List the built-in considerations
    ListRules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Review {
            release,
            output,
            pretty,
        } => commands::review::run(&release, output.as_deref(), pretty),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
    }
}
