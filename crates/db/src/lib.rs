//! Persistence layer: connection pool, migrations, row models and repositories.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// SQLSTATE raised when an exclusion constraint rejects a row.
pub const EXCLUSION_VIOLATION: &str = "23P01";

/// SQLSTATE raised on a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Prefix shared by the booking overlap exclusion constraints.
pub const BOOKING_OVERLAP_CONSTRAINT_PREFIX: &str = "ex_bookings_";

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Whether `err` is a booking overlap rejected by the storage layer, i.e.
/// a concurrent writer inserted an overlapping active booking first.
pub fn is_booking_overlap(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(EXCLUSION_VIOLATION)
                && db_err
                    .constraint()
                    .is_some_and(|c| c.starts_with(BOOKING_OVERLAP_CONSTRAINT_PREFIX))
        }
        _ => false,
    }
}
