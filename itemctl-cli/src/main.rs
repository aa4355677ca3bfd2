//! itemctl CLI - HTTP CRUD API for items
//!
//! Entry point for the `itemctl` binary:
//! - `serve`: run the item API over PostgreSQL (or an in-memory store)
//!
//! A `.env` file in the working directory is loaded before arguments are
//! parsed, so `DATABASE_URL` and friends can live there.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "itemctl",
    author,
    version,
    about = "CRUD HTTP API for items backed by PostgreSQL",
    long_about = "Serve list, create, retrieve, update, delete and distinct-value endpoints \
                  over a single items table."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
    }
    Ok(())
}
