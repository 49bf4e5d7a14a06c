//! PostgreSQL persistence for the Citadel catalog.
//!
//! - [`models`] -- row structs and create/update DTOs.
//! - [`repositories`] -- zero-sized repository structs with async CRUD methods.
//! - [`ImportLock`] -- run-level guard so only one import writes at a time.

use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::Connection;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Advisory-lock key reserved for catalog imports.
const IMPORT_LOCK_KEY: i64 = 0x4349_5441_4445_4c01;

/// Session-level PostgreSQL advisory lock held for the duration of an import.
///
/// The lock lives on a connection detached from the pool, so it is released
/// by [`ImportLock::release`] or, failing that, when the connection is dropped
/// and the server ends the session.
pub struct ImportLock {
    conn: PgConnection,
}

impl ImportLock {
    /// Try to take the import lock without waiting.
    ///
    /// Returns `Ok(None)` when another session (CLI or API) holds it.
    pub async fn try_acquire(pool: &DbPool) -> Result<Option<Self>, sqlx::Error> {
        let mut conn = pool.acquire().await?.detach();
        let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
            .bind(IMPORT_LOCK_KEY)
            .fetch_one(&mut conn)
            .await?;

        if acquired {
            Ok(Some(Self { conn }))
        } else {
            conn.close().await?;
            Ok(None)
        }
    }

    /// Release the lock and close its connection.
    pub async fn release(mut self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_unlock($1)")
            .bind(IMPORT_LOCK_KEY)
            .execute(&mut self.conn)
            .await?;
        self.conn.close().await
    }
}
