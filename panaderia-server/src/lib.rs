//! panaderia-server: product catalog service for a bakery
//!
//! Layers, leaf first:
//! - `models`: validated input types
//! - `db`: pool, migrations, repositories, seed data
//! - `http`: axum router, handlers, error mapping

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, DbError, Producto, ProductoRepo};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
