//! Schema migration commands (up, down, status)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use panaderia_server::db::migrations;

use crate::config::PanaderiaConfig;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: MigrateCommands,
}

#[derive(Subcommand, Debug)]
pub enum MigrateCommands {
    /// Apply every pending migration
    Up,
    /// Revert the most recently applied migrations
    Down {
        /// Number of migrations to revert
        #[arg(long, default_value_t = 1)]
        steps: usize,
    },
    /// List known migrations and when they were applied
    Status,
}

pub async fn run_migrate(args: MigrateArgs, config: &PanaderiaConfig) -> Result<()> {
    let pool = super::connect(args.database_url, None, config).await?;

    match args.command {
        MigrateCommands::Up => {
            let applied = migrations::run(&pool)
                .await
                .context("Failed to apply migrations")?;
            println!("Applied {} migration(s)", applied);
        }
        MigrateCommands::Down { steps } => {
            let reverted = migrations::revert(&pool, steps)
                .await
                .context("Failed to revert migrations")?;
            println!("Reverted {} migration(s)", reverted);
        }
        MigrateCommands::Status => {
            let status = migrations::status(&pool)
                .await
                .context("Failed to read migration status")?;
            for s in status {
                let applied = s
                    .applied_at
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_else(|| "pending".to_string());
                println!("{:>4}  {:<32} {}", s.migration.version, s.migration.name, applied);
            }
        }
    }
    Ok(())
}
