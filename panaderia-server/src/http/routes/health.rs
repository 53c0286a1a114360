//! Banner and health check endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;

use crate::http::server::AppState;

/// Service name reported by /health
pub const SERVICE_NAME: &str = "panaderia-api";

/// Root banner response
#[derive(Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub api: &'static str,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Whether a trivial query succeeded
    pub database: bool,
}

/// GET /
async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Sistema de Gestión de Productos de Panadería",
        version: env!("CARGO_PKG_VERSION"),
        api: "/api/v1",
    })
}

/// GET /health
///
/// Always 200 while the process is serving; `database` reports the pool.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        database: ping(&state.pool).await,
    })
}

async fn ping(pool: &PgPool) -> bool {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            false
        }
    }
}

/// Banner and health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
}
