//! HTTP server command for the itemctl API
//!
//! Wires the store (PostgreSQL or in-memory) into the item routes and runs
//! until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use itemctl_server::db::{create_pool_with_options, ensure_schema, pool::DEFAULT_MAX_CONNECTIONS};
use itemctl_server::http::server::DEFAULT_TIMEOUT_SECS;
use itemctl_server::{run_server, ItemStore, MemoryItemRepo, PgItemRepo, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "ITEMCTL_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, env = "ITEMCTL_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Keep items in memory instead of PostgreSQL (lost on shutdown)
    #[arg(long)]
    pub memory: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            request_timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// Build the item store selected by the arguments.
async fn open_store(args: &ServeArgs) -> Result<Arc<dyn ItemStore>> {
    if args.memory {
        tracing::warn!("Using in-memory store - items are lost on shutdown");
        return Ok(Arc::new(MemoryItemRepo::new()));
    }

    let database_url = args
        .database_url
        .as_deref()
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env or .env, or pass --memory")?;

    let pool = create_pool_with_options(database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    ensure_schema(&pool)
        .await
        .context("Failed to create items table")?;

    Ok(Arc::new(PgItemRepo::new(pool)))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting itemctl server on {}", args.bind);

    let store = open_store(&args).await?;
    let config = args.server_config();

    // Run server (blocks until shutdown)
    run_server(store, config).await.context("Server error")?;

    Ok(())
}
