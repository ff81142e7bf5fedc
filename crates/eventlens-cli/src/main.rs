//! eventlens CLI
//!
//! Browse a user's addresses, list the events recorded against an address
//! and diff two of them, over a JSON fixture file.

use anyhow::{Context, Result};
use async_lock::RwLock;
use clap::{Parser, Subcommand};
use eventlens_app::AppCore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod fixture;
mod render;
mod session;

use config::CliConfig;
use fixture::FixtureDataSource;

#[derive(Parser)]
#[command(name = "eventlens")]
#[command(about = "eventlens - compare the events recorded against a user's addresses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".eventlens/config.toml")]
    config: PathBuf,

    /// Fixture file (overrides `fixtures` in the config file)
    #[arg(short, long, global = true)]
    fixtures: Option<PathBuf>,

    /// Print diff rows whose values match (overrides `show_unchanged`)
    #[arg(long, global = true)]
    show_unchanged: Option<bool>,
}

#[derive(Subcommand)]
enum Commands {
    /// List user ids
    Users,

    /// List the addresses of a user
    Addresses {
        /// User id
        user: String,

        /// Include soft-deleted addresses
        #[arg(short, long)]
        all: bool,
    },

    /// List the events of an address
    Events {
        /// User id
        user: String,
        /// Address id
        address: String,
    },

    /// Diff two events of an address
    Compare {
        /// User id
        user: String,
        /// Address id
        address: String,
        /// First event (list index or guid)
        first: String,
        /// Second event (list index or guid)
        second: String,
    },

    /// Drive the explorer interactively from stdin
    Session,
}

fn init_logging(verbose: bool, config: &CliConfig) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(config.log_level.as_deref().unwrap_or("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(&cli.config).await?;
    init_logging(cli.verbose, &config);

    let fixtures = cli
        .fixtures
        .clone()
        .or_else(|| config.fixtures.clone())
        .context("No fixture file: pass --fixtures or set `fixtures` in the config file")?;
    let show_unchanged = cli.show_unchanged.unwrap_or(config.show_unchanged);

    let source = FixtureDataSource::load(&fixtures).await?;
    let app: commands::App = Arc::new(RwLock::new(AppCore::with_data_source(
        config.app.clone(),
        Arc::new(source),
    )));

    let output = match cli.command {
        Commands::Users => commands::users(&app).await?,
        Commands::Addresses { user, all } => commands::addresses(&app, &user, all).await?,
        Commands::Events { user, address } => commands::events(&app, &user, &address).await?,
        Commands::Compare {
            user,
            address,
            first,
            second,
        } => commands::compare(&app, &user, &address, &first, &second, show_unchanged).await?,
        Commands::Session => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session::run(&app, stdin, tokio::io::stdout(), show_unchanged).await?;
            String::new()
        }
    };

    print!("{output}");
    Ok(())
}
