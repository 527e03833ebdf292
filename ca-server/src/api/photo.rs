//! Person photo

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::api::ApiError;
use crate::db::persons;
use crate::AppState;

/// GET /get-person-photo/:person_id/
///
/// Raw JPEG bytes; 404 when the person is unknown or has no photo.
pub async fn get_person_photo(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(person_id) = path?;
    let photo = persons::photo(&state.db, person_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Sin foto para la persona {}", person_id)))?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], photo).into_response())
}
