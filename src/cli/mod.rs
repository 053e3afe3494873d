use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod config;
pub mod logging;
pub mod tally;
pub mod version;

use config::{default_config_path, OutputFormat, ResultsConfig};

#[derive(Parser)]
#[command(name = "dao-results")]
#[command(author = "dao-results contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aggregate DAO proposal votes into render-ready results", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute results for a proposal from JSON exports
    Tally {
        /// Proposal JSON file (one object or an array)
        #[arg(long)]
        proposal: String,

        /// Votes JSON file (array of vote rows)
        #[arg(long)]
        votes: String,

        /// Proposal to tally when the proposal file holds several
        #[arg(long)]
        proposal_id: Option<String>,

        /// Output format (overrides config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Time series bucket width, e.g. "30m" or "1day" (overrides config)
        #[arg(long)]
        bucket: Option<String>,

        /// Path to config file (default: ~/.config/dao-results/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Write results to this file instead of stdout
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Write a commented default config file
    InitConfig {
        /// Where to write the config (default: ~/.config/dao-results/config.toml)
        #[arg(long)]
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Tally {
            proposal,
            votes,
            proposal_id,
            format,
            bucket,
            config,
            output,
        } => tally::execute(proposal, votes, proposal_id, format, bucket, config, output).await,
        Commands::InitConfig { path, force } => {
            let path = path.map(PathBuf::from).unwrap_or_else(default_config_path);
            ResultsConfig::create_default(&path, force)?;
            println!("Created: {}", path.display());
            Ok(())
        }
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
