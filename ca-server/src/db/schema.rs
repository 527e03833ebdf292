//! Table definitions

use ca_common::Result;
use sqlx::SqlitePool;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS sedes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL,
        direccion TEXT,
        activo INTEGER NOT NULL DEFAULT 1
    )",
    // Organisational units; `padre` holds the siglas of the parent unit
    "CREATE TABLE IF NOT EXISTS estructuras (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        unidad_organica TEXT NOT NULL,
        siglas TEXT NOT NULL,
        padre TEXT,
        activo INTEGER NOT NULL DEFAULT 1
    )",
    "CREATE TABLE IF NOT EXISTS personas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT,
        apellido TEXT,
        dni INTEGER NOT NULL UNIQUE,
        telefono TEXT,
        email TEXT,
        tarjetavisita TEXT,
        observaciones TEXT,
        photo BLOB,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    // A visit is open while hora_salida is NULL
    "CREATE TABLE IF NOT EXISTS visitas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        person_id INTEGER NOT NULL REFERENCES personas(id) ON DELETE CASCADE,
        sede_id INTEGER NOT NULL REFERENCES sedes(id) ON DELETE CASCADE,
        area_id INTEGER NOT NULL REFERENCES estructuras(id) ON DELETE CASCADE,
        subarea_id INTEGER REFERENCES estructuras(id) ON DELETE SET NULL,
        fecha TEXT NOT NULL,
        hora_entrada TEXT NOT NULL,
        fecha_salida TEXT,
        hora_salida TEXT,
        observaciones TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE INDEX IF NOT EXISTS idx_visitas_person_open ON visitas(person_id, hora_salida)",
    "CREATE INDEX IF NOT EXISTS idx_visitas_sede_open ON visitas(sede_id, hora_salida)",
];

/// Create missing tables and indexes
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
