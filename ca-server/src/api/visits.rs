//! Exit registration for open visits

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::api::ApiError;
use crate::db::visits::{self, ExitOutcome, VisitSummary};
use crate::AppState;

pub const ALREADY_EXITED_MESSAGE: &str = "Esta visita ya tiene registrada la salida.";

/// Visit as shown on the exit-registration page
#[derive(Debug, Serialize)]
pub struct VisitResponse {
    pub id: i64,
    pub person_id: i64,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub dni: i64,
    pub tarjetavisita: Option<String>,
    pub sede: String,
    pub area: String,
    pub subarea: Option<String>,
    pub fecha: String,
    pub hora_entrada: String,
    pub fecha_salida: Option<String>,
    pub hora_salida: Option<String>,
    pub active: bool,
}

impl From<VisitSummary> for VisitResponse {
    fn from(visit: VisitSummary) -> Self {
        let active = visit.is_active();
        Self {
            id: visit.id,
            person_id: visit.person_id,
            nombre: visit.nombre,
            apellido: visit.apellido,
            dni: visit.dni,
            tarjetavisita: visit.tarjetavisita,
            sede: visit.sede,
            area: visit.area,
            subarea: visit.subarea,
            fecha: visit.fecha.format("%Y-%m-%d").to_string(),
            hora_entrada: visit.hora_entrada.format("%H:%M").to_string(),
            fecha_salida: visit.fecha_salida.map(|d| d.format("%Y-%m-%d").to_string()),
            hora_salida: visit.hora_salida.map(|t| t.format("%H:%M").to_string()),
            active,
        }
    }
}

/// Response to a successful exit registration
#[derive(Debug, Serialize)]
pub struct ExitResponse {
    pub message: String,
    pub visit: VisitResponse,
}

/// Success message, mentioning the freed card when the person has one
pub fn exit_message(tarjeta: Option<&str>) -> String {
    match tarjeta.filter(|t| !t.trim().is_empty()) {
        Some(tarjeta) => format!(
            "Salida registrada exitosamente. La tarjeta #{} está ahora disponible.",
            tarjeta
        ),
        None => "Salida registrada exitosamente.".to_string(),
    }
}

/// GET /register-exit/:visit_id/
pub async fn show_visit(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<VisitResponse>, ApiError> {
    let Path(visit_id) = path?;
    let visit = visits::get(&state.db, visit_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Visita {} no encontrada", visit_id)))?;
    Ok(Json(visit.into()))
}

/// POST /register-exit/:visit_id/
///
/// Closes the visit at the current local date and time.
pub async fn register_exit(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ExitResponse>, ApiError> {
    let Path(visit_id) = path?;
    let now = chrono::Local::now().naive_local();

    match visits::register_exit(&state.db, visit_id, now).await? {
        ExitOutcome::Registered(visit) => {
            info!(visit_id, person_id = visit.person_id, "Exit registered");
            Ok(Json(ExitResponse {
                message: exit_message(visit.tarjetavisita.as_deref()),
                visit: visit.into(),
            }))
        }
        ExitOutcome::AlreadyExited(_) => Err(ApiError::Conflict(ALREADY_EXITED_MESSAGE.to_string())),
        ExitOutcome::NotFound => Err(ApiError::NotFound(format!(
            "Visita {} no encontrada",
            visit_id
        ))),
    }
}
