//! Sedes and organisational units referenced by visits

use ca_common::Result;
use sqlx::SqlitePool;

pub async fn insert_sede(pool: &SqlitePool, nombre: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO sedes (nombre) VALUES (?)")
        .bind(nombre)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Insert an organisational unit; `padre` is the parent's siglas
pub async fn insert_estructura(
    pool: &SqlitePool,
    unidad_organica: &str,
    siglas: &str,
    padre: Option<&str>,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO estructuras (unidad_organica, siglas, padre) VALUES (?, ?, ?)",
    )
    .bind(unidad_organica)
    .bind(siglas)
    .bind(padre)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}
