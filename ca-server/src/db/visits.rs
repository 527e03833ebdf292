//! Visits and their exit registration

use ca_common::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{FromRow, SqlitePool};

/// Visit joined with its person, sede and organisational units
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct VisitSummary {
    pub id: i64,
    pub person_id: i64,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub dni: i64,
    pub tarjetavisita: Option<String>,
    pub sede_id: i64,
    pub sede: String,
    pub area: String,
    pub subarea: Option<String>,
    pub fecha: NaiveDate,
    pub hora_entrada: NaiveTime,
    pub fecha_salida: Option<NaiveDate>,
    pub hora_salida: Option<NaiveTime>,
}

impl VisitSummary {
    pub fn is_active(&self) -> bool {
        self.hora_salida.is_none()
    }

    /// "Nombre Apellido", trimmed
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.nombre.as_deref().unwrap_or(""),
            self.apellido.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

/// Fields of a visit to insert
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub person_id: i64,
    pub sede_id: i64,
    pub area_id: i64,
    pub subarea_id: Option<i64>,
    pub fecha: NaiveDate,
    pub hora_entrada: NaiveTime,
}

/// Result of [`register_exit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    Registered(VisitSummary),
    AlreadyExited(VisitSummary),
    NotFound,
}

const SUMMARY_SELECT: &str = "SELECT v.id, v.person_id, p.nombre, p.apellido, p.dni, p.tarjetavisita,
            v.sede_id, s.nombre AS sede, a.unidad_organica AS area, sa.unidad_organica AS subarea,
            v.fecha, v.hora_entrada, v.fecha_salida, v.hora_salida
     FROM visitas v
     JOIN personas p ON p.id = v.person_id
     JOIN sedes s ON s.id = v.sede_id
     JOIN estructuras a ON a.id = v.area_id
     LEFT JOIN estructuras sa ON sa.id = v.subarea_id";

const NEWEST_FIRST: &str = "ORDER BY v.fecha DESC, v.hora_entrada DESC LIMIT 1";

pub async fn get(pool: &SqlitePool, visit_id: i64) -> Result<Option<VisitSummary>> {
    let visit = sqlx::query_as::<_, VisitSummary>(&format!("{} WHERE v.id = ?", SUMMARY_SELECT))
        .bind(visit_id)
        .fetch_optional(pool)
        .await?;
    Ok(visit)
}

/// Most recent open visit of a person, optionally within one sede
pub async fn active_visit_for(
    pool: &SqlitePool,
    person_id: i64,
    sede_id: Option<i64>,
) -> Result<Option<VisitSummary>> {
    let visit = sqlx::query_as::<_, VisitSummary>(&format!(
        "{} WHERE v.person_id = ? AND v.hora_salida IS NULL AND (? IS NULL OR v.sede_id = ?) {}",
        SUMMARY_SELECT, NEWEST_FIRST
    ))
    .bind(person_id)
    .bind(sede_id)
    .bind(sede_id)
    .fetch_optional(pool)
    .await?;
    Ok(visit)
}

/// Open visit in `sede_id` of anyone holding visitor card `tarjeta`
pub async fn active_visit_with_card(
    pool: &SqlitePool,
    tarjeta: &str,
    sede_id: i64,
) -> Result<Option<VisitSummary>> {
    let visit = sqlx::query_as::<_, VisitSummary>(&format!(
        "{} WHERE p.tarjetavisita = ? AND v.sede_id = ? AND v.hora_salida IS NULL {}",
        SUMMARY_SELECT, NEWEST_FIRST
    ))
    .bind(tarjeta)
    .bind(sede_id)
    .fetch_optional(pool)
    .await?;
    Ok(visit)
}

pub async fn insert(pool: &SqlitePool, visit: NewVisit) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO visitas (person_id, sede_id, area_id, subarea_id, fecha, hora_entrada)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(visit.person_id)
    .bind(visit.sede_id)
    .bind(visit.area_id)
    .bind(visit.subarea_id)
    .bind(visit.fecha)
    .bind(visit.hora_entrada)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Close an open visit at `at`
pub async fn register_exit(
    pool: &SqlitePool,
    visit_id: i64,
    at: NaiveDateTime,
) -> Result<ExitOutcome> {
    let Some(visit) = get(pool, visit_id).await? else {
        return Ok(ExitOutcome::NotFound);
    };
    if !visit.is_active() {
        return Ok(ExitOutcome::AlreadyExited(visit));
    }

    let updated = sqlx::query(
        "UPDATE visitas
         SET fecha_salida = ?, hora_salida = ?, updated_at = CURRENT_TIMESTAMP
         WHERE id = ? AND hora_salida IS NULL",
    )
    .bind(at.date())
    .bind(at.time())
    .bind(visit_id)
    .execute(pool)
    .await?;

    // Closed concurrently between the read and the update
    if updated.rows_affected() == 0 {
        return match get(pool, visit_id).await? {
            Some(visit) => Ok(ExitOutcome::AlreadyExited(visit)),
            None => Ok(ExitOutcome::NotFound),
        };
    }

    match get(pool, visit_id).await? {
        Some(visit) => Ok(ExitOutcome::Registered(visit)),
        None => Ok(ExitOutcome::NotFound),
    }
}
