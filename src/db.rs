use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to build database pool: {0}")]
    Pool(String),

    #[error("schema initialization failed: {0}")]
    Migration(String),
}

/// Build the connection pool and bring the schema up to date.
///
/// Migrations are idempotent and each one runs inside its own transaction, so
/// a failure leaves the schema untouched. The caller must treat any error as
/// fatal: the process must not serve traffic against an unready schema.
pub fn create_pool(database_url: &str) -> Result<DbPool, InitError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .map_err(|e| InitError::Pool(e.to_string()))?;

    let mut conn = pool.get().map_err(|e| InitError::Pool(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| InitError::Migration(e.to_string()))?;

    Ok(pool)
}
