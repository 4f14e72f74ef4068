//! Character Atlas CLI - Browse the character catalog and manage the local
//! account profile.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! atlas page 1
//! atlas character 1 2 3
//! atlas search "rick sanchez"
//!
//! # Accounts (stored in a local JSON file, see ATLAS_DATA_PATH)
//! atlas register -f Rick -l Sanchez -e rick@example.com -p portalgun
//! atlas login -e rick@example.com -p portalgun
//! atlas whoami
//! atlas favorites toggle 42
//!
//! # Cache maintenance
//! atlas cache stats
//! atlas cache sweep
//! ```
//!
//! # Environment Variables
//!
//! - `ATLAS_BASE_URL` - Catalog API base URL
//! - `ATLAS_CACHE_TTL_SECS` - Cache entry lifetime in seconds
//! - `ATLAS_DATA_PATH` - Path of the local account data file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use atlas_client::accounts::AccountStore;
use atlas_client::catalog::CatalogClient;
use atlas_client::config::ClientConfig;
use atlas_client::store::FileStore;

mod commands;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(author, version, about = "Character Atlas CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one page of the character catalog
    Page {
        /// Page number, starting at 1
        number: u32,
    },
    /// Fetch one or more characters by ID
    Character {
        /// Character IDs
        #[arg(required = true)]
        ids: Vec<u32>,
    },
    /// Search characters by name
    Search {
        /// Name fragment to search for
        name: String,
    },
    /// Register a new account
    Register {
        /// Given name
        #[arg(short, long)]
        first_name: String,

        /// Family name
        #[arg(short, long)]
        last_name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Log in and establish the active session
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Keep the session flagged as remembered
        #[arg(long)]
        remember: bool,
    },
    /// Delete the active session
    Logout,
    /// Show the session user
    Whoami,
    /// List all registered users
    Users,
    /// Manage the session user's favorite characters
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Inspect or maintain the in-memory response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Delete all users, sessions, and favorites
    Wipe {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List the session user's favorites
    List,
    /// Add or remove a character from the favorites
    Toggle {
        /// Character ID
        id: u32,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show entry counts (total, valid, expired)
    Stats,
    /// Drop expired entries and report how many were removed
    Sweep,
    /// Drop every entry
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let catalog = CatalogClient::new(&config.catalog);
    let accounts = AccountStore::new(Arc::new(FileStore::open(&config.data_path)?));

    match cli.command {
        Commands::Page { number } => commands::catalog::page(&catalog, number).await?,
        Commands::Character { ids } => commands::catalog::characters(&catalog, &ids).await?,
        Commands::Search { name } => commands::catalog::search(&catalog, &name).await?,
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
        } => commands::account::register(&accounts, &first_name, &last_name, &email, &password)?,
        Commands::Login {
            email,
            password,
            remember,
        } => commands::account::login(&accounts, &email, &password, remember)?,
        Commands::Logout => commands::account::logout(&accounts),
        Commands::Whoami => commands::account::whoami(&accounts)?,
        Commands::Users => commands::account::users(&accounts),
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::account::favorites(&accounts)?,
            FavoritesAction::Toggle { id } => commands::account::toggle_favorite(&accounts, id)?,
        },
        Commands::Cache { action } => match action {
            CacheAction::Stats => commands::catalog::cache_stats(&catalog),
            CacheAction::Sweep => commands::catalog::cache_sweep(&catalog),
            CacheAction::Clear => commands::catalog::cache_clear(&catalog),
        },
        Commands::Wipe { yes } => commands::account::wipe(&accounts, yes)?,
    }
    Ok(())
}
