use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use crate::error::ApiError;

/// Type alias for the PostgreSQL connection pool
pub type DbPool = PgPool;

/// Creates and configures a PostgreSQL connection pool
///
/// # Arguments
/// * `database_url` - PostgreSQL connection string
///
/// # Returns
/// * `Result<DbPool>` - Configured connection pool or error
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Whether an error is a unique-constraint violation
///
/// Pre-insert existence checks race with concurrent writers; callers map
/// the constraint error itself to a conflict response.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Check if a facility with the given name already exists
///
/// Facility names are unique across the center; checked before inserts.
pub async fn check_duplicate_facility(
    pool: &PgPool,
    name: &str,
) -> Result<bool, ApiError> {
    tracing::debug!("Checking for duplicate facility: {}", name);

    let exists: Option<bool> = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM facilities WHERE name = $1)"
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    let is_duplicate = exists.unwrap_or(false);
    if is_duplicate {
        tracing::debug!("Duplicate facility found: {}", name);
    }

    Ok(is_duplicate)
}

/// Check if a facility name is taken by another facility
///
/// Used by updates so a facility can keep its own name.
pub async fn check_duplicate_facility_excluding_id(
    pool: &PgPool,
    name: &str,
    exclude_id: i32,
) -> Result<bool, ApiError> {
    let exists: Option<bool> = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM facilities WHERE name = $1 AND id != $2)"
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;

    Ok(exists.unwrap_or(false))
}
