//! Person lookup by DNI

use axum::{
    extract::{Query, State},
    Json,
};
use ca_common::{ActiveVisit, PersonLookupResult, PersonRecord};
use serde::Deserialize;
use tracing::debug;

use crate::api::ApiError;
use crate::db::{persons, visits};
use crate::AppState;

/// Query parameters for the person lookup
#[derive(Debug, Deserialize)]
pub struct SearchPersonQuery {
    /// DNI as typed by the operator
    #[serde(default)]
    pub dni: Option<String>,

    /// Restrict the active-visit check to this sede; ignored unless numeric
    #[serde(default)]
    pub sede: Option<String>,
}

/// GET /search-person/?dni=30123456[&sede=1]
///
/// `{"found": false}` for a missing, non-numeric or unknown DNI. Otherwise
/// the person's data, whether a photo exists, and their open visit if any.
pub async fn search_person(
    State(state): State<AppState>,
    Query(query): Query<SearchPersonQuery>,
) -> Result<Json<PersonLookupResult>, ApiError> {
    let Some(dni) = query
        .dni
        .as_deref()
        .map(str::trim)
        .and_then(|d| d.parse::<i64>().ok())
    else {
        debug!(dni = ?query.dni, "Lookup without a usable DNI");
        return Ok(Json(PersonLookupResult::not_found()));
    };

    let Some(person) = persons::find_by_dni(&state.db, dni).await? else {
        debug!(dni, "DNI not registered");
        return Ok(Json(PersonLookupResult::not_found()));
    };

    let sede = query.sede.as_deref().and_then(|s| s.trim().parse::<i64>().ok());

    let active_visit = visits::active_visit_for(&state.db, person.id, sede)
        .await?
        .map(|visit| ActiveVisit {
            id: visit.id,
            sede: visit.sede,
            area: visit.area,
            subarea: visit.subarea,
            fecha: visit.fecha.format("%Y-%m-%d").to_string(),
            hora_entrada: visit.hora_entrada.format("%H:%M").to_string(),
            tarjeta: person.tarjetavisita.clone(),
        });

    debug!(
        dni,
        person_id = person.id,
        has_active_visit = active_visit.is_some(),
        "DNI found"
    );

    let record = PersonRecord {
        id: person.id,
        dni: Some(person.dni),
        nombre: person.nombre.into(),
        apellido: person.apellido.into(),
        telefono: person.telefono.into(),
        email: person.email.into(),
        tarjetavisita: person.tarjetavisita.into(),
        observaciones: person.observaciones.into(),
        has_photo: person.has_photo,
        active_visit,
    };

    Ok(Json(record.into()))
}
