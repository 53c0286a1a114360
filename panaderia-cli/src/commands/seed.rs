//! Seed command: load the sample catalog into an empty table

use anyhow::{Context, Result};
use clap::Parser;

use panaderia_server::db::seed::{self, SeedOutcome};

use crate::config::PanaderiaConfig;

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

pub async fn run_seed(args: SeedArgs, config: &PanaderiaConfig) -> Result<()> {
    let pool = super::connect(args.database_url, None, config).await?;

    match seed::run(&pool).await.context("Failed to seed productos")? {
        SeedOutcome::Inserted(n) => println!("Inserted {} productos", n),
        SeedOutcome::Skipped => println!("Productos table is not empty, nothing to do"),
    }
    Ok(())
}
