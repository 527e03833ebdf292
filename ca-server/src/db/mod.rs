//! Database access layer for ca-server
//!
//! SQLite holds sedes, organisational units (estructuras), people and their
//! visits. The schema is created on connect when missing.

use ca_common::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

pub mod persons;
pub mod schema;
pub mod structure;
pub mod visits;

/// Open (creating if needed) the database at `db_path` and ensure the schema
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    schema::init_schema(&pool).await?;

    info!("Database ready at {}", db_path.display());
    Ok(pool)
}

/// Private in-memory database with the schema applied
///
/// A single connection keeps every query on the same in-memory database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    schema::init_schema(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("control_acceso.db");

        let pool = connect(&db_path).await.expect("Should create database");
        assert!(db_path.exists());

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('sedes', 'estructuras', 'personas', 'visitas')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 4);

        pool.close().await;
    }
}
