//! Database layer - connection pool, migrations, repositories, seed data
//!
//! # Design Principles
//!
//! - Connection pool with explicit limits, no Arc<Mutex<Connection>>
//! - Rely on DB constraints, handle conflicts (no check-then-insert)
//! - Transactions for multi-step operations (migrations, seed)

pub mod pool;
pub mod migrations;
pub mod repos;
pub mod seed;

pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;

/// Serializes unit tests that change the shared test database's schema or rows
#[cfg(test)]
pub(crate) static TEST_DB_LOCK: once_cell::sync::Lazy<tokio::sync::Mutex<()>> =
    once_cell::sync::Lazy::new(|| tokio::sync::Mutex::new(()));
