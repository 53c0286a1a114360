//! HTTP server command
//!
//! Applies pending migrations, optionally seeds, then serves the API.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use panaderia_server::db::{migrations, seed};
use panaderia_server::http::{run_server, ServerConfig};

use crate::config::PanaderiaConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Do not apply pending migrations on startup
    #[arg(long)]
    pub skip_migrations: bool,

    /// Insert sample productos if the table is empty
    #[arg(long)]
    pub seed: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: &PanaderiaConfig) -> Result<()> {
    let bind_addr = args.bind.unwrap_or(config.server.bind);
    let pool = super::connect(args.database_url, args.max_connections, config).await?;

    if args.skip_migrations {
        tracing::warn!("Skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to apply migrations")?;
    }

    if args.seed {
        seed::run(&pool).await.context("Failed to seed productos")?;
    }

    let server_config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
    };

    tracing::info!("Starting panaderia server on {}", bind_addr);

    // Blocks until shutdown
    run_server(pool, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
