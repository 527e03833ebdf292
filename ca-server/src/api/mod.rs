//! HTTP API handlers for ca-server

pub mod error;
pub mod health;
pub mod photo;
pub mod search;
pub mod tarjeta;
pub mod visits;

pub use error::ApiError;
pub use health::health_routes;
pub use photo::get_person_photo;
pub use search::search_person;
pub use tarjeta::check_tarjeta_disponible;
pub use visits::{register_exit, show_visit};
