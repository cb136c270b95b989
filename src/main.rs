use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mfsheet::cli::quote::QuoteOutput;
use mfsheet::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the normalized metrics of one fund
    Quote {
        /// Fund symbol, e.g. VFIAX
        symbol: String,
        /// Print the provider response as received
        #[arg(long, conflicts_with = "json")]
        raw: bool,
        /// Print the normalized record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search mutual funds by name
    Search {
        /// Part of the fund name
        text: String,
    },
    /// Export funds to a spreadsheet
    Export {
        /// Fund symbols; defaults to the configured watchlist
        symbols: Vec<String>,
        /// File with one fund symbol per line
        #[arg(short, long, conflicts_with = "symbols")]
        file: Option<PathBuf>,
        /// Where to write the spreadsheet
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl From<Commands> for mfsheet::AppCommand {
    fn from(cmd: Commands) -> mfsheet::AppCommand {
        match cmd {
            Commands::Quote { symbol, raw, json } => mfsheet::AppCommand::Quote {
                symbol,
                output: match (raw, json) {
                    (true, _) => QuoteOutput::Raw,
                    (_, true) => QuoteOutput::Json,
                    _ => QuoteOutput::Table,
                },
            },
            Commands::Search { text } => mfsheet::AppCommand::Search { text },
            Commands::Export {
                symbols,
                file,
                output,
            } => mfsheet::AppCommand::Export {
                symbols,
                file,
                output,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => mfsheet::cli::setup::setup(),
        Some(cmd) => mfsheet::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
