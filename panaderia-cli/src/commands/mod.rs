//! Command implementations for the panaderia CLI

pub mod migrate;
pub mod seed;
pub mod serve;

use anyhow::{Context, Result};
use sqlx::PgPool;

use panaderia_server::db::create_pool_with_options;

use crate::config::PanaderiaConfig;

// Re-export dispatcher functions for flat access from main.rs
pub use migrate::run_migrate;
pub use seed::run_seed;
pub use serve::run_serve;

/// Connect using the flag/env URL, falling back to the config file.
pub(crate) async fn connect(
    database_url: Option<String>,
    max_connections: Option<u32>,
    config: &PanaderiaConfig,
) -> Result<PgPool> {
    let database_url = database_url
        .or_else(|| config.database.url.clone())
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, .env, or [database] url in panaderia.toml")?;
    let max_connections = max_connections.unwrap_or(config.database.max_connections);

    create_pool_with_options(&database_url, max_connections)
        .await
        .context("Failed to create database pool")
}
