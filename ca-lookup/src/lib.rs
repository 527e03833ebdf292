//! ca-lookup: DNI lookup-and-autofill for the visit registration form
//!
//! When the operator leaves the DNI field (or presses Enter in it) the
//! [`LookupController`] asks the backend for the person, then fills the
//! form, clears it for a new registration, or warns about an open visit.

pub mod banner;
pub mod client;
pub mod controller;
pub mod error;
pub mod form;
pub mod pipeline;
pub mod render;

pub use banner::{AlertLevel, Banner};
pub use client::{HttpLookupClient, LookupClient, Photo};
pub use controller::{Completion, EventResponse, FormEvent, Key, LookupController, RenderState};
pub use error::LookupError;
pub use form::FormView;
