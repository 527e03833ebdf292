//! # Control de Acceso Common Library
//!
//! Shared code for the access-control workspace:
//! - Person lookup wire types and their typed view
//! - Endpoint paths shared by the backend and the lookup client
//! - Configuration loading
//! - Common error type

pub mod api;
pub mod config;
pub mod error;
pub mod lookup;

pub use error::{Error, Result};
pub use lookup::{ActiveVisit, FieldText, LookupResult, PersonLookupResult, PersonRecord};
