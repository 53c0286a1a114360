//! panaderia CLI - bakery product catalog service
//!
//! Entry point for the `panaderia` binary:
//! - `serve`: run the HTTP API (migrates on startup)
//! - `migrate`: apply, revert, or list schema migrations
//! - `seed`: load sample productos into an empty catalog
//! - `config`: print the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

mod commands;
mod config;
mod tracing_setup;

use config::PanaderiaConfig;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "panaderia",
    author,
    version,
    about = "Bakery product catalog REST API backed by PostgreSQL"
)]
struct Cli {
    /// Path to a TOML config file (default: ./panaderia.toml if present)
    #[arg(long, global = true, env = "PANADERIA_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Manage schema migrations (up, down, status)
    Migrate(commands::migrate::MigrateArgs),
    /// Insert sample productos when the catalog is empty
    Seed(commands::seed::SeedArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so clap's env fallbacks see .env values
    let dotenv_path = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;
    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let config = PanaderiaConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args, &config).await,
        Commands::Migrate(args) => commands::run_migrate(args, &config).await,
        Commands::Seed(args) => commands::run_seed(args, &config).await,
        Commands::Config => run_config(&config),
    };

    tracing_setup::shutdown_otel();
    result
}

fn run_config(config: &PanaderiaConfig) -> Result<()> {
    let rendered = config
        .to_redacted_toml()
        .context("Failed to serialize config to TOML")?;
    print!("{}", rendered);
    Ok(())
}
