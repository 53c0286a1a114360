//! Producto repository
//!
//! Every operation is a single statement, so each is atomic on its own:
//! - create/update: rely on `uq_producto_sku`, map unique violations to Conflict
//! - delete: hard delete, NotFound when no row was affected
//! - search: ILIKE with the fragment's wildcards escaped

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor, PgPool, Row};

use crate::models::{Categoria, NewProducto, Paginated, Pagination, ProductoChanges, ValidationError};

/// Producto record from database
#[derive(Debug, Clone, PartialEq)]
pub struct Producto {
    pub id: i32,
    pub nombre: String,
    pub sku: String,
    pub categoria: Categoria,
    pub precio_unitario: Decimal,
    pub stock: i32,
    pub disponible: bool,
    pub fecha_registro: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Producto {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let categoria: String = row.try_get("categoria")?;
        let categoria = categoria
            .parse::<Categoria>()
            .map_err(|e: ValidationError| sqlx::Error::ColumnDecode {
                index: "categoria".into(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            nombre: row.try_get("nombre")?,
            sku: row.try_get("sku")?,
            categoria,
            precio_unitario: row.try_get("precio_unitario")?,
            stock: row.try_get("stock")?,
            disponible: row.try_get("disponible")?,
            fecha_registro: row.try_get("fecha_registro")?,
            fecha_actualizacion: row.try_get("fecha_actualizacion")?,
        })
    }
}

/// Optional list filters
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductoFilter {
    pub categoria: Option<Categoria>,
    pub disponible: Option<bool>,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} with {field} '{value}' already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("applied migration {0} is not known to this build")]
    UnknownMigration(i64),
}

impl DbError {
    fn not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "producto",
            id: id.to_string(),
        }
    }

    /// Turn a unique violation on `sku` into a Conflict.
    fn from_write(e: sqlx::Error, sku: Option<&str>) -> Self {
        match (&e, sku) {
            (sqlx::Error::Database(db), Some(sku)) if db.is_unique_violation() => Self::Conflict {
                resource: "producto",
                field: "sku",
                value: sku.to_owned(),
            },
            _ => Self::Sqlx(e),
        }
    }
}

/// Escape LIKE wildcards so the fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Insert one producto on any executor (pool or open transaction).
pub(crate) async fn insert<'e, E>(executor: E, producto: &NewProducto) -> Result<Producto, DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as(
        r#"
        INSERT INTO productos (nombre, sku, categoria, precio_unitario, stock, disponible)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, nombre, sku, categoria, precio_unitario, stock, disponible,
                  fecha_registro, fecha_actualizacion
        "#,
    )
    .bind(producto.nombre.as_str())
    .bind(producto.sku.as_str())
    .bind(producto.categoria.as_str())
    .bind(producto.precio_unitario.value())
    .bind(producto.stock.value())
    .bind(producto.disponible)
    .fetch_one(executor)
    .await
    .map_err(|e| DbError::from_write(e, Some(producto.sku.as_str())))
}

/// Check for any producto row on any executor.
pub(crate) async fn exists_any<'e, E>(executor: E) -> Result<bool, DbError>
where
    E: PgExecutor<'e>,
{
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM productos)")
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

/// Producto repository
pub struct ProductoRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductoRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a producto; a duplicate sku fails with Conflict.
    pub async fn create(&self, producto: &NewProducto) -> Result<Producto, DbError> {
        let created = insert(self.pool, producto).await?;
        tracing::info!(id = created.id, sku = %created.sku, "Producto created");
        Ok(created)
    }

    /// Get a single producto by id.
    pub async fn get(&self, id: i32) -> Result<Producto, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, nombre, sku, categoria, precio_unitario, stock, disponible,
                   fecha_registro, fecha_actualizacion
            FROM productos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(id))
    }

    /// List productos by ascending id, with optional filters.
    pub async fn list(
        &self,
        filter: ProductoFilter,
        page: Pagination,
    ) -> Result<Paginated<Producto>, DbError> {
        let categoria = filter.categoria.map(|c| c.as_str());

        let items: Vec<Producto> = sqlx::query_as(
            r#"
            SELECT id, nombre, sku, categoria, precio_unitario, stock, disponible,
                   fecha_registro, fecha_actualizacion
            FROM productos
            WHERE ($1::text IS NULL OR categoria = $1)
              AND ($2::bool IS NULL OR disponible = $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(categoria)
        .bind(filter.disponible)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        // Counted separately so the total stays right on pages past the end
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM productos
            WHERE ($1::text IS NULL OR categoria = $1)
              AND ($2::bool IS NULL OR disponible = $2)
            "#,
        )
        .bind(categoria)
        .bind(filter.disponible)
        .fetch_one(self.pool)
        .await?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Case-insensitive substring search on nombre.
    pub async fn search_by_nombre(
        &self,
        fragment: &str,
        page: Pagination,
    ) -> Result<Vec<Producto>, DbError> {
        let pattern = format!("%{}%", escape_like(fragment));

        let items = sqlx::query_as(
            r#"
            SELECT id, nombre, sku, categoria, precio_unitario, stock, disponible,
                   fecha_registro, fecha_actualizacion
            FROM productos
            WHERE nombre ILIKE $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Apply the supplied fields and refresh fecha_actualizacion.
    ///
    /// An empty change set still touches fecha_actualizacion.
    pub async fn update(&self, id: i32, changes: &ProductoChanges) -> Result<Producto, DbError> {
        let sku = changes.sku.as_ref().map(|s| s.as_str());
        if changes.is_empty() {
            tracing::debug!(id, "Empty update, only fecha_actualizacion changes");
        }

        let updated: Producto = sqlx::query_as(
            r#"
            UPDATE productos SET
                nombre = COALESCE($2, nombre),
                sku = COALESCE($3, sku),
                categoria = COALESCE($4, categoria),
                precio_unitario = COALESCE($5, precio_unitario),
                stock = COALESCE($6, stock),
                disponible = COALESCE($7, disponible),
                fecha_actualizacion = NOW()
            WHERE id = $1
            RETURNING id, nombre, sku, categoria, precio_unitario, stock, disponible,
                      fecha_registro, fecha_actualizacion
            "#,
        )
        .bind(id)
        .bind(changes.nombre.as_ref().map(|n| n.as_str()))
        .bind(sku)
        .bind(changes.categoria.map(|c| c.as_str()))
        .bind(changes.precio_unitario.map(|p| p.value()))
        .bind(changes.stock.map(|s| s.value()))
        .bind(changes.disponible)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::from_write(e, sku))?
        .ok_or_else(|| DbError::not_found(id))?;

        tracing::info!(id, sku = %updated.sku, "Producto updated");
        Ok(updated)
    }

    /// Permanently delete a producto.
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM productos WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(id));
        }

        tracing::info!(id, "Producto deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_wildcards() {
        assert_eq!(escape_like("pan"), "pan");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\x"), "c:\\\\x");
    }

    #[test]
    fn conflict_only_for_unique_violations() {
        let err = DbError::from_write(sqlx::Error::RowNotFound, Some("PAN-0001"));
        assert!(matches!(err, DbError::Sqlx(_)));
    }

    #[test]
    fn not_found_message() {
        assert_eq!(
            DbError::not_found(7).to_string(),
            "not found: producto '7'"
        );
    }

    // Database-backed behaviour is covered in tests/productos_api.rs
    // Run with: DATABASE_URL=... cargo test -p panaderia-server -- --ignored
}
