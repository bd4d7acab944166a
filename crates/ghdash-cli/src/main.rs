//! ghdash CLI - browse GitHub repositories, issues and pull requests.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::Context;

/// ghdash - GitHub dashboard
#[derive(Parser, Debug)]
#[command(name = "ghdash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Token storage file
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the GitHub access token
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Search repositories
    Search {
        /// Search query (GitHub search syntax)
        query: String,
    },

    /// Show a repository
    Repo {
        /// Repository as OWNER/NAME
        repo: String,
    },

    /// List issues of a repository (open and closed)
    Issues {
        /// Repository as OWNER/NAME
        repo: String,
    },

    /// List pull requests of a repository (open, closed and merged)
    Pulls {
        /// Repository as OWNER/NAME
        repo: String,
    },

    /// Call a bridge channel directly
    Invoke {
        /// Channel name, e.g. github:search
        channel: String,
        /// Arguments as a JSON array, e.g. '["facebook","react"]'
        args: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommands {
    /// Validate and save a personal access token
    Set {
        /// Token value (ghp_...)
        token: String,
    },

    /// Remove the saved token
    Clear,

    /// Show whether a token is saved
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("ghdash_cli={log_level},ghdash_api={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ghdash_api::Config::load();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(path) = cli.storage {
        config.storage_path = Some(path);
    }

    let result = match Context::open(&config, cli.json) {
        Ok(ctx) => match cli.command {
            Commands::Token { command } => match command {
                TokenCommands::Set { token } => ctx.token_set(&token).await,
                TokenCommands::Clear => ctx.token_clear(),
                TokenCommands::Status => ctx.token_status(),
            },
            Commands::Search { query } => ctx.search(&query).await,
            Commands::Repo { repo } => ctx.repo(&repo).await,
            Commands::Issues { repo } => ctx.issues(&repo).await,
            Commands::Pulls { repo } => ctx.pulls(&repo).await,
            Commands::Invoke { channel, args } => ctx.invoke(&channel, args.as_deref()).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
