//! People registered as visitors

use ca_common::Result;
use sqlx::{FromRow, SqlitePool};

/// Person row without the photo payload
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Person {
    pub id: i64,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub dni: i64,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub tarjetavisita: Option<String>,
    pub observaciones: Option<String>,
    pub has_photo: bool,
}

/// Fields of a person to insert
#[derive(Debug, Clone, Default)]
pub struct NewPerson {
    pub dni: i64,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub tarjetavisita: Option<String>,
    pub observaciones: Option<String>,
    pub photo: Option<Vec<u8>>,
}

pub async fn find_by_dni(pool: &SqlitePool, dni: i64) -> Result<Option<Person>> {
    let person = sqlx::query_as::<_, Person>(
        "SELECT id, nombre, apellido, dni, telefono, email, tarjetavisita, observaciones,
                (photo IS NOT NULL AND length(photo) > 0) AS has_photo
         FROM personas
         WHERE dni = ?",
    )
    .bind(dni)
    .fetch_optional(pool)
    .await?;
    Ok(person)
}

/// Stored photo of a person; `None` when the person is unknown or has none
pub async fn photo(pool: &SqlitePool, person_id: i64) -> Result<Option<Vec<u8>>> {
    let photo: Option<Option<Vec<u8>>> =
        sqlx::query_scalar("SELECT photo FROM personas WHERE id = ?")
            .bind(person_id)
            .fetch_optional(pool)
            .await?;
    Ok(photo.flatten().filter(|bytes| !bytes.is_empty()))
}

pub async fn insert(pool: &SqlitePool, person: NewPerson) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO personas (dni, nombre, apellido, telefono, email, tarjetavisita, observaciones, photo)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(person.dni)
    .bind(person.nombre)
    .bind(person.apellido)
    .bind(person.telefono)
    .bind(person.email)
    .bind(person.tarjetavisita)
    .bind(person.observaciones)
    .bind(person.photo)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}
