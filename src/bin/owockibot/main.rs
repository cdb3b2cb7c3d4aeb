//! owockibot CLI
//!
//! Command-line interface for the owockibot Bounty Board.

mod commands;
mod style;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owockibot::{AsyncBountyClient, BountyStatus, ClientConfig};
use style::*;

#[derive(Parser)]
#[command(name = "owockibot")]
#[command(author = "Open Fred")]
#[command(version)]
#[command(about = "owockibot - Find, claim and submit bounties", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Bounty board API URL
    #[arg(short, long, env = "OWOCKIBOT_BASE_URL", global = true)]
    url: Option<String>,

    /// Wallet address used for claims and submissions
    #[arg(short, long, env = "OWOCKIBOT_WALLET", global = true)]
    wallet: Option<String>,

    /// Path to config file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List open bounties (default)
    #[command(visible_alias = "d")]
    Discover {
        /// Only bounties with any of these tags
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List bounties
    #[command(visible_alias = "ls")]
    List {
        /// Filter by status (open, claimed, submitted, completed)
        #[arg(short, long, value_parser = commands::bounties::parse_status)]
        status: Option<BountyStatus>,

        /// Only bounties with any of these tags
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Show a single bounty
    Show { id: String },

    /// Claim a bounty
    Claim { id: String },

    /// Submit work for a claimed bounty
    Submit {
        id: String,

        /// Description of the work done
        submission: String,

        /// Link to proof (e.g. a pull request URL)
        #[arg(short, long)]
        proof: Option<String>,
    },

    /// Show board statistics
    #[command(visible_alias = "st")]
    Stats,

    /// Show the API metadata document
    About,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "owockibot=debug".into()),
            )
            .init();
    }

    let client = match build_client(&cli) {
        Ok(client) => client,
        Err(e) => {
            print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Default to discover if no command specified
    let command = cli.command.unwrap_or(Commands::Discover { tags: vec![] });

    let result = match command {
        Commands::Discover { tags } => commands::bounties::discover(&client, &tags).await,
        Commands::List { status, tags } => {
            commands::bounties::list(&client, status, &tags).await
        }
        Commands::Show { id } => commands::bounties::show(&client, &id).await,
        Commands::Claim { id } => commands::claim::run(&client, &id).await,
        Commands::Submit {
            id,
            submission,
            proof,
        } => commands::submit::run(&client, &id, &submission, proof.as_deref()).await,
        Commands::Stats => commands::stats::run(&client).await,
        Commands::About => commands::about::run(&client).await,
    };

    if let Err(e) = result {
        print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

/// File config, then environment, then command-line flags
fn build_client(cli: &Cli) -> Result<AsyncBountyClient> {
    let mut config = ClientConfig::load_from(&cli.config)?.apply_env();
    if let Some(url) = &cli.url {
        config.base_url = ClientConfig::new(url.as_str()).base_url;
    }
    if let Some(wallet) = &cli.wallet {
        config = config.with_wallet(wallet.as_str());
    }
    Ok(AsyncBountyClient::new(config))
}
