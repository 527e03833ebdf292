//! Visitor card availability

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::db::visits;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TarjetaQuery {
    #[serde(default)]
    pub tarjeta: Option<String>,
    #[serde(default)]
    pub sede_id: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TarjetaResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_id: Option<i64>,
}

impl TarjetaResponse {
    fn available() -> Self {
        Self {
            available: true,
            message: None,
            visit_id: None,
        }
    }
}

/// GET /api/check-tarjeta-disponible/?tarjeta=12&sede_id=1
///
/// A card is available unless someone with that card has an open visit in
/// the sede. Missing parameters count as available.
pub async fn check_tarjeta_disponible(
    State(state): State<AppState>,
    Query(query): Query<TarjetaQuery>,
) -> Result<Json<TarjetaResponse>, ApiError> {
    let tarjeta = query.tarjeta.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let sede_id = query.sede_id.as_deref().and_then(|s| s.trim().parse::<i64>().ok());

    let (Some(tarjeta), Some(sede_id)) = (tarjeta, sede_id) else {
        return Ok(Json(TarjetaResponse::available()));
    };

    let Some(visit) = visits::active_visit_with_card(&state.db, tarjeta, sede_id).await? else {
        return Ok(Json(TarjetaResponse::available()));
    };

    let message = format!(
        "La tarjeta #{} ya está en uso por <strong>{}</strong> desde {} a las {}.<br><br>\
         Debe registrar la salida antes de volver a usar esta tarjeta en esta sede.",
        tarjeta,
        visit.full_name(),
        visit.fecha.format("%Y-%m-%d"),
        visit.hora_entrada.format("%H:%M"),
    );

    Ok(Json(TarjetaResponse {
        available: false,
        message: Some(message),
        visit_id: Some(visit.id),
    }))
}
