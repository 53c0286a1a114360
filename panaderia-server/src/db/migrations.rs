//! Versioned schema migrations
//!
//! Migrations are embedded in the binary and recorded in
//! `schema_migrations`. Each one runs in its own transaction under an
//! advisory lock, so concurrent starts apply it exactly once.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::repos::DbError;

/// Advisory lock key shared by every migration transaction
const MIGRATION_LOCK_KEY: i64 = 0x7061_6e61_6465;

/// A single reversible schema change
#[derive(Debug)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub up: &'static [&'static str],
    pub down: &'static [&'static str],
}

/// All migrations, in application order
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_productos_table",
    up: &[
        r#"
        CREATE TABLE IF NOT EXISTS productos (
            id SERIAL PRIMARY KEY,
            nombre VARCHAR(150) NOT NULL,
            sku VARCHAR(20) NOT NULL,
            categoria VARCHAR(20) NOT NULL
                CHECK (categoria IN ('Pan', 'Pastelería', 'Bebidas', 'Otros')),
            precio_unitario NUMERIC(10, 2) NOT NULL CHECK (precio_unitario > 0),
            stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
            disponible BOOLEAN NOT NULL DEFAULT TRUE,
            fecha_registro TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            fecha_actualizacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT uq_producto_sku UNIQUE (sku)
        )
        "#,
        "CREATE INDEX IF NOT EXISTS ix_productos_nombre ON productos(nombre)",
    ],
    down: &[
        "DROP INDEX IF EXISTS ix_productos_nombre",
        "DROP TABLE IF EXISTS productos",
    ],
}];

/// A row of `schema_migrations`
#[derive(Debug, Clone, FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// Known migration with its applied timestamp, if any
#[derive(Debug)]
pub struct MigrationStatus {
    pub migration: &'static Migration,
    pub applied_at: Option<DateTime<Utc>>,
}

async fn ensure_table(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// List applied migrations, oldest first.
pub async fn applied(pool: &PgPool) -> Result<Vec<AppliedMigration>, DbError> {
    ensure_table(pool).await?;
    let rows = sqlx::query_as(
        "SELECT version, name, applied_at FROM schema_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Apply every pending migration. Returns how many were applied.
pub async fn run(pool: &PgPool) -> Result<usize, DbError> {
    ensure_table(pool).await?;
    tracing::info!("Running migrations...");

    let mut count = 0;
    for migration in MIGRATIONS {
        let mut tx = pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let (done,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&mut *tx)
                .await?;
        if done {
            continue;
        }

        for statement in migration.up {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO schema_migrations (version, name) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(version = migration.version, name = migration.name, "Applied migration");
        count += 1;
    }

    tracing::info!(applied = count, "Migrations complete");
    Ok(count)
}

/// Revert the latest `steps` applied migrations. Returns how many were reverted.
pub async fn revert(pool: &PgPool, steps: usize) -> Result<usize, DbError> {
    let mut latest = applied(pool).await?;
    latest.reverse();

    let mut count = 0;
    for row in latest.into_iter().take(steps) {
        let migration = find(row.version).ok_or(DbError::UnknownMigration(row.version))?;

        let mut tx = pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await?;
        for statement in migration.down {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }
        sqlx::query("DELETE FROM schema_migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(version = migration.version, name = migration.name, "Reverted migration");
        count += 1;
    }

    Ok(count)
}

/// Status of every known migration.
pub async fn status(pool: &PgPool) -> Result<Vec<MigrationStatus>, DbError> {
    let applied = applied(pool).await?;
    Ok(MIGRATIONS
        .iter()
        .map(|migration| MigrationStatus {
            migration,
            applied_at: applied
                .iter()
                .find(|a| a.version == migration.version)
                .map(|a| a.applied_at),
        })
        .collect())
}

fn find(version: i64) -> Option<&'static Migration> {
    MIGRATIONS.iter().find(|m| m.version == version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_strictly_increase() {
        for pair in MIGRATIONS.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
    }

    #[test]
    fn every_migration_is_reversible() {
        for m in MIGRATIONS {
            assert!(!m.up.is_empty(), "{} has no up statements", m.name);
            assert!(!m.down.is_empty(), "{} has no down statements", m.name);
        }
    }

    #[test]
    fn schema_enforces_constraints() {
        let create = MIGRATIONS[0].up[0];
        assert!(create.contains("CONSTRAINT uq_producto_sku UNIQUE (sku)"));
        assert!(create.contains("CHECK (precio_unitario > 0)"));
        assert!(create.contains("CHECK (stock >= 0)"));
        for c in crate::models::Categoria::ALL {
            assert!(create.contains(&format!("'{}'", c.as_str())));
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn run_is_idempotent() {
        let _guard = crate::db::TEST_DB_LOCK.lock().await;
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        run(&pool).await.expect("first run failed");
        assert_eq!(run(&pool).await.expect("second run failed"), 0);

        let status = status(&pool).await.expect("status failed");
        assert!(status.iter().all(|s| s.applied_at.is_some()));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn revert_then_run_restores_schema() {
        let _guard = crate::db::TEST_DB_LOCK.lock().await;
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        run(&pool).await.expect("initial run failed");
        assert_eq!(revert(&pool, 1).await.expect("revert failed"), 1);

        let pending = status(&pool).await.expect("status failed");
        let first = pending
            .iter()
            .find(|s| s.migration.version == 1)
            .expect("migration 1 missing from status");
        assert!(first.applied_at.is_none());

        let (table,): (Option<String>,) = sqlx::query_as("SELECT to_regclass('productos')::text")
            .fetch_one(&pool)
            .await
            .expect("table lookup failed");
        assert!(table.is_none(), "productos should be dropped");

        assert_eq!(run(&pool).await.expect("re-run failed"), 1);
        let restored = status(&pool).await.expect("status failed");
        assert!(restored.iter().all(|s| s.applied_at.is_some()));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn revert_with_nothing_applied_is_a_no_op() {
        let _guard = crate::db::TEST_DB_LOCK.lock().await;
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        run(&pool).await.expect("initial run failed");
        let steps = MIGRATIONS.len();
        assert_eq!(revert(&pool, steps + 1).await.expect("revert failed"), steps);
        assert_eq!(revert(&pool, 1).await.expect("second revert failed"), 0);

        assert_eq!(run(&pool).await.expect("re-run failed"), steps);
    }
}
