mod commands;
mod config;
mod paprika;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::commands::{cmd_fetch, cmd_get, cmd_list, cmd_render, cmd_search};
use crate::config::Config;
use pantry_core::service::Pantry;

#[derive(Parser)]
#[command(
    name = "pantry",
    version,
    about = "Sync your Paprika recipe box into a local, searchable cache",
    long_about = "\n
  ██████╗  █████╗ ███╗   ██╗████████╗██████╗ ██╗   ██╗
  ██╔══██╗██╔══██╗████╗  ██║╚══██╔══╝██╔══██╗╚██╗ ██╔╝
  ██████╔╝███████║██╔██╗ ██║   ██║   ██████╔╝ ╚████╔╝
  ██╔═══╝ ██╔══██║██║╚██╗██║   ██║   ██╔══██╗  ╚██╔╝
  ██║     ██║  ██║██║ ╚████║   ██║   ██║  ██║   ██║
  ╚═╝     ╚═╝  ╚═╝╚═╝  ╚═══╝   ╚═╝   ╚═╝  ╚═╝   ╚═╝
           your recipe box, close to hand.
"
)]
struct Cli {
    /// Path to the config file (default: platform config directory)
    #[arg(short = 'f', long, value_name = "PATH", global = true)]
    config_file: Option<PathBuf>,

    /// Path to the SQLite database (overrides the config file)
    #[arg(short, long, value_name = "PATH", global = true)]
    database: Option<PathBuf>,

    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download new and changed recipes from your Paprika account
    Fetch {
        /// Paprika account username (overrides config and environment)
        #[arg(short, long)]
        username: Option<String>,
        /// Paprika account password (overrides config and environment)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all cached recipes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search cached recipes by name (case-sensitive substring)
    Search {
        /// Substring to look for in recipe names
        query: String,
        /// Accepted for compatibility; matching stays name-only
        #[arg(short, long)]
        ingredients: bool,
        /// Accepted for compatibility; matching stays name-only
        #[arg(long)]
        description: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a cached recipe document as JSON
    Get {
        /// Recipe ID (see 'pantry list')
        id: i64,
    },
    /// Render a cached recipe as a standalone HTML page
    Render {
        /// Recipe ID (see 'pantry list')
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Logs go to stderr so JSON output on stdout stays parseable.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("pantry={level},pantry_core={level}"))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config_file.as_deref())?;
    let db_path = config.database_path(cli.database.as_deref())?;
    debug!("using database {}", db_path.display());
    let pantry = Pantry::open(&db_path)?;

    match cli.command {
        Commands::Fetch {
            username,
            password,
            json,
        } => cmd_fetch(&pantry, &config, username, password, json).await,
        Commands::List { json } => cmd_list(&pantry, json),
        Commands::Search {
            query,
            ingredients,
            description,
            json,
        } => cmd_search(&pantry, &query, ingredients, description, json),
        Commands::Get { id } => cmd_get(&pantry, id),
        Commands::Render { id } => cmd_render(&pantry, id),
    }
}
