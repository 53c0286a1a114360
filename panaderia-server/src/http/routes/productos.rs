//! Producto endpoints, nested under /api/v1

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Producto, ProductoFilter, ProductoRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{Categoria, Paginated, Pagination, PaginationParams, ProductoPayload};

/// Producto response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductoResponse {
    pub id: i32,
    pub nombre: String,
    pub sku: String,
    pub categoria: Categoria,
    /// Two decimal places, as a string ("1.25")
    pub precio_unitario: String,
    pub stock: i32,
    pub disponible: bool,
    pub fecha_registro: String,
    pub fecha_actualizacion: String,
}

impl From<Producto> for ProductoResponse {
    fn from(p: Producto) -> Self {
        let mut precio = p.precio_unitario;
        precio.rescale(2);
        Self {
            id: p.id,
            nombre: p.nombre,
            sku: p.sku,
            categoria: p.categoria,
            precio_unitario: precio.to_string(),
            stock: p.stock,
            disponible: p.disponible,
            fecha_registro: p.fecha_registro.to_rfc3339(),
            fecha_actualizacion: p.fecha_actualizacion.to_rfc3339(),
        }
    }
}

/// List query: pagination plus optional filters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub categoria: Option<String>,
    pub disponible: Option<bool>,
}

impl ListParams {
    fn split(self) -> Result<(ProductoFilter, Pagination), ApiError> {
        let categoria = self.categoria.map(|c| c.parse::<Categoria>()).transpose()?;
        let filter = ProductoFilter {
            categoria,
            disponible: self.disponible,
        };
        let page = Pagination::from(PaginationParams {
            page: self.page,
            per_page: self.per_page,
        });
        Ok((filter, page))
    }
}

/// GET /productos - list productos with pagination and filters
async fn list_productos(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ListParams>,
) -> Result<Json<Paginated<ProductoResponse>>, ApiError> {
    let (filter, page) = params.split()?;
    let result = ProductoRepo::new(&state.pool).list(filter, page).await?;
    Ok(Json(result.map(ProductoResponse::from)))
}

/// POST /productos - create a new producto
async fn create_producto(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<ProductoPayload>,
) -> Result<(StatusCode, Json<ProductoResponse>), ApiError> {
    let producto = payload.into_new()?;
    let created = ProductoRepo::new(&state.pool).create(&producto).await?;
    Ok((StatusCode::CREATED, Json(ProductoResponse::from(created))))
}

/// GET /productos/{id} - get a single producto
async fn get_producto(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<ProductoResponse>, ApiError> {
    let producto = ProductoRepo::new(&state.pool).get(id).await?;
    Ok(Json(ProductoResponse::from(producto)))
}

/// PUT /productos/{id} - update supplied fields
async fn update_producto(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(payload): ValidJson<ProductoPayload>,
) -> Result<Json<ProductoResponse>, ApiError> {
    let changes = payload.into_changes()?;
    let updated = ProductoRepo::new(&state.pool).update(id, &changes).await?;
    Ok(Json(ProductoResponse::from(updated)))
}

/// DELETE /productos/{id} - permanently delete
async fn delete_producto(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    ProductoRepo::new(&state.pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /productos/buscar/{nombre} - case-insensitive name search
async fn search_productos(
    State(state): State<Arc<AppState>>,
    Path(nombre): Path<String>,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> Result<Json<Vec<ProductoResponse>>, ApiError> {
    let items = ProductoRepo::new(&state.pool)
        .search_by_nombre(&nombre, Pagination::from(params))
        .await?;
    Ok(Json(items.into_iter().map(ProductoResponse::from).collect()))
}

/// Producto routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/productos", get(list_productos).post(create_producto))
        .route("/productos/", get(list_productos).post(create_producto))
        .route(
            "/productos/{id}",
            get(get_producto).put(update_producto).delete(delete_producto),
        )
        .route("/productos/buscar/{nombre}", get(search_productos))
}
