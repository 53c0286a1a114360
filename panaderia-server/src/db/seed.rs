//! Sample catalog data
//!
//! Seeding only touches an empty table and inserts every row in one
//! transaction, so a failed seed leaves nothing behind. The emptiness check
//! runs inside that transaction under an advisory lock, so concurrent seeds
//! insert the sample once and the rest skip.

use sqlx::PgPool;

use super::repos::{self, DbError};
use crate::models::{NewProducto, ProductoPayload, ValidationErrors};

/// Seed error type
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("invalid seed row: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for SeedError {
    fn from(e: sqlx::Error) -> Self {
        Self::Db(DbError::Sqlx(e))
    }
}

/// What a seed run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted(usize),
    /// Table already had rows
    Skipped,
}

/// Advisory lock key held while checking and seeding
const SEED_LOCK_KEY: i64 = 0x7061_6e61_7365;

/// (nombre, sku, categoria, precio_unitario, stock)
const SAMPLE: &[(&str, &str, &str, &str, i64)] = &[
    ("Pan Francés", "PAN-0001", "Pan", "1.25", 120),
    ("Croissant", "PAS-0101", "Pastelería", "2.75", 60),
    ("Café Americano", "BEB-0201", "Bebidas", "1.50", 200),
    ("Empanada de Pollo", "EMP-0301", "Otros", "3.00", 50),
];

/// Sample productos, validated through the same path as API input.
pub fn seed_productos() -> Result<Vec<NewProducto>, ValidationErrors> {
    SAMPLE
        .iter()
        .map(|&(nombre, sku, categoria, precio, stock)| {
            ProductoPayload {
                nombre: Some(nombre.into()),
                sku: Some(sku.into()),
                categoria: Some(categoria.into()),
                precio_unitario: Some(precio.into()),
                stock: Some(stock.into()),
                disponible: Some(true.into()),
            }
            .into_new()
        })
        .collect()
}

/// Insert the sample catalog when the table is empty.
pub async fn run(pool: &PgPool) -> Result<SeedOutcome, SeedError> {
    let rows = seed_productos()?;

    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SEED_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    if repos::productos::exists_any(&mut *tx).await? {
        tracing::info!("Productos table not empty, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    for producto in &rows {
        repos::productos::insert(&mut *tx, producto).await?;
    }
    tx.commit().await?;

    tracing::info!(count = rows.len(), "Seeded productos");
    Ok(SeedOutcome::Inserted(rows.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_rows_are_valid() {
        let rows = seed_productos().expect("seed rows must validate");
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|p| p.disponible));
    }

    #[test]
    fn sample_skus_are_unique() {
        let rows = seed_productos().unwrap();
        let skus: HashSet<_> = rows.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus.len(), rows.len());
    }

    #[test]
    fn sample_covers_every_categoria() {
        let rows = seed_productos().unwrap();
        for c in crate::models::Categoria::ALL {
            assert!(rows.iter().any(|p| p.categoria == c), "no {c} row");
        }
    }

    async fn seeded_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    async fn count(pool: &PgPool) -> i64 {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM productos")
            .fetch_one(pool)
            .await
            .expect("count failed");
        n
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn non_empty_table_is_skipped() {
        let _guard = crate::db::TEST_DB_LOCK.lock().await;
        let pool = seeded_pool().await;

        sqlx::query("DELETE FROM productos WHERE sku = 'TST-0099'")
            .execute(&pool)
            .await
            .expect("cleanup failed");
        let existing = ProductoPayload {
            nombre: Some("Pan de Prueba".into()),
            sku: Some("TST-0099".into()),
            categoria: Some("Pan".into()),
            precio_unitario: Some("0.50".into()),
            stock: Some(1.into()),
            disponible: None,
        }
        .into_new()
        .unwrap();
        crate::db::ProductoRepo::new(&pool)
            .create(&existing)
            .await
            .expect("create failed");

        let before = count(&pool).await;
        assert_eq!(run(&pool).await.expect("seed failed"), SeedOutcome::Skipped);
        assert_eq!(count(&pool).await, before);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_seeds_insert_once() {
        let _guard = crate::db::TEST_DB_LOCK.lock().await;
        let pool = seeded_pool().await;

        sqlx::query("DELETE FROM productos")
            .execute(&pool)
            .await
            .expect("cleanup failed");

        let (a, b) = tokio::join!(run(&pool), run(&pool));
        let mut outcomes = [a.expect("first seed failed"), b.expect("second seed failed")];
        outcomes.sort_by_key(|o| matches!(o, SeedOutcome::Skipped));

        assert_eq!(outcomes, [SeedOutcome::Inserted(SAMPLE.len()), SeedOutcome::Skipped]);
        assert_eq!(count(&pool).await, SAMPLE.len() as i64);
    }
}
