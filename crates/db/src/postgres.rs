//! PostgreSQL connectivity used by the diagnostic tooling.
//!
//! The API itself never touches Postgres; these helpers back the
//! `databridge-ops db` and `diagnose` commands.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub type DbPool = sqlx::PgPool;

/// Errors from administrative database operations.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Invalid database name '{0}': use letters, digits and underscores only")]
    InvalidName(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Open a small pool, failing if no connection is acquired within `timeout`.
pub async fn connect(options: PgConnectOptions, timeout: Duration) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// The server's `version()` string.
pub async fn server_version(pool: &DbPool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT version()").fetch_one(pool).await?;
    Ok(row.0)
}

/// Names of all non-template databases on the server, sorted.
pub async fn list_databases(pool: &DbPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT datname FROM pg_database WHERE datistemplate = false ORDER BY datname",
    )
    .fetch_all(pool)
    .await
}

pub async fn database_exists(pool: &DbPool, name: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(name)
        .fetch_one(pool)
        .await
}

/// Whether `name` can be interpolated into DDL as an identifier.
///
/// `CREATE DATABASE` does not accept bind parameters.
pub fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Create database `name` if it does not exist yet.
///
/// Returns `true` if the database was created, `false` if it already existed.
pub async fn ensure_database(pool: &DbPool, name: &str) -> Result<bool, AdminError> {
    if !is_safe_identifier(name) {
        return Err(AdminError::InvalidName(name.to_string()));
    }
    if database_exists(pool, name).await? {
        return Ok(false);
    }

    sqlx::query(&format!("CREATE DATABASE \"{name}\""))
        .execute(pool)
        .await?;
    tracing::info!(database = name, "Database created");
    Ok(true)
}

/// Apply the embedded migrations (base tables plus sample rows).
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Row counts of the tables created by [`run_migrations`].
pub async fn base_table_counts(pool: &DbPool) -> Result<Vec<(&'static str, i64)>, sqlx::Error> {
    let mut counts = Vec::with_capacity(BASE_TABLES.len());
    for table in BASE_TABLES {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await?;
        counts.push((table, count));
    }
    Ok(counts)
}

/// Tables created by the embedded migrations.
pub const BASE_TABLES: [&str; 3] = ["file_uploads", "data_records", "clients"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(is_safe_identifier("databridge"));
        assert!(is_safe_identifier("_scratch_01"));
    }

    #[test]
    fn rejects_identifiers_that_need_quoting() {
        assert!(!is_safe_identifier(""));
        assert!(!is_safe_identifier("1db"));
        assert!(!is_safe_identifier("data-bridge"));
        assert!(!is_safe_identifier("x\"; DROP DATABASE postgres; --"));
        assert!(!is_safe_identifier(&"a".repeat(64)));
    }
}
