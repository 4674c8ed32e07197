//! Magellan Server Daemon
//!
//! The `magelland` binary is the ingestion server process that:
//! - Loads configuration (writing a default `magellan.toml` on first run)
//! - Ensures the destination table exists
//! - Serves the HTTP ingestion API until shutdown
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (magellan.toml in the working directory)
//! magelland
//!
//! # Start with a custom database and bind address
//! magelland --database /var/lib/magellan/magellan.db --bind 127.0.0.1:9090
//!
//! # Use a configuration file elsewhere
//! magelland --config /etc/magellan/magellan.toml
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use magellan_server::{serve, MagellanConfig, CONFIG_FILE_NAME};
use magellan_store::{connection, ensure_table};

/// Magellan ingestion daemon
#[derive(Parser, Debug)]
#[command(
    name = "magelland",
    version,
    about = "Magellan JSON ingestion server",
    long_about = "Receives arbitrary JSON documents over HTTP and stores each one\n\
                  in a relational table whose schema grows to fit the documents."
)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(short = 'b', long, env = "MAGELLAN_BIND")]
    bind: Option<String>,

    /// Database file path, overrides the config file
    #[arg(short = 'd', long, value_name = "FILE", env = "MAGELLAN_DATABASE")]
    database: Option<PathBuf>,

    /// Expected X-API-Token value, overrides the config file
    #[arg(long, env = "MAGELLAN_TOKEN")]
    token: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", env = "MAGELLAN_LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level)
        .with_context(|| format!("invalid log level '{}'", args.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&args)?;

    if config.api_token.is_empty() {
        warn!("api_token is empty; /mfrequest accepts requests with an empty X-API-Token header");
    }

    // Bootstrap the table before accepting traffic.
    let conn = connection::open(&config.database)
        .with_context(|| format!("failed to open database '{}'", config.database.display()))?;
    ensure_table(&conn, &config.table).context("failed to ensure destination table")?;
    drop(conn);

    info!(
        database = %config.database.display(),
        table = %config.table,
        "magellan starting"
    );

    serve(config).await.context("server error")
}

/// Load the config file (creating a default one on first run) and apply
/// command-line overrides.
fn load_config(args: &Args) -> Result<MagellanConfig> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    MagellanConfig::write_default_if_missing(&path)?;
    let mut config = MagellanConfig::from_file(&path)?;

    if let Some(bind) = &args.bind {
        config.bind = bind.clone();
    }
    if let Some(database) = &args.database {
        config.database = database.clone();
    }
    if let Some(token) = &args.token {
        config.api_token = token.clone();
    }
    Ok(config)
}
