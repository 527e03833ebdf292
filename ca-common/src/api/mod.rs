//! Endpoint paths shared by `ca-server` and `ca-lookup`
//!
//! The backend registers its routes from these constants and the lookup
//! client builds its request URLs from the same helpers, so both sides agree
//! on the exact paths (including trailing slashes).

/// Person lookup: `GET /search-person/?dni=<dni>`
pub const SEARCH_PERSON: &str = "/search-person/";

/// Query parameter carrying the DNI on [`SEARCH_PERSON`]
pub const DNI_PARAM: &str = "dni";

/// Optional query parameter restricting the active-visit check to one sede
pub const SEDE_PARAM: &str = "sede";

/// Route pattern for the binary photo of a person
pub const PERSON_PHOTO_ROUTE: &str = "/get-person-photo/:person_id/";

/// Route pattern for the exit-registration page of a visit
pub const REGISTER_EXIT_ROUTE: &str = "/register-exit/:visit_id/";

/// Card availability check: `GET /api/check-tarjeta-disponible/?tarjeta=..&sede_id=..`
pub const CHECK_TARJETA: &str = "/api/check-tarjeta-disponible/";

/// Health endpoint
pub const HEALTH: &str = "/health";

/// Path of the photo of `person_id`
pub fn person_photo_path(person_id: i64) -> String {
    format!("/get-person-photo/{}/", person_id)
}

/// Path of the exit-registration route for `visit_id`
pub fn register_exit_path(visit_id: i64) -> String {
    format!("/register-exit/{}/", visit_id)
}
