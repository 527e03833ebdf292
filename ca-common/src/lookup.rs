//! Person lookup records
//!
//! [`PersonLookupResult`] is the flat JSON body returned by
//! `GET /search-person/`. It is converted into the typed [`LookupResult`]
//! before anything touches a form, so consumers never deal with "field
//! present but null" or "visit flag set but visit data missing" cases.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::register_exit_path;
use crate::{Error, Result};

/// Placeholder shown when an active visit has no sub-area
pub const SUBAREA_PLACEHOLDER: &str = "N/A";

/// Flat wire record of a person lookup
///
/// `{"found": false}` when the DNI is unknown. When found, every optional
/// text field may be absent or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonLookupResult {
    pub found: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dni: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarjetavisita: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_photo: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_active_visit: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_visit_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_visit_sede: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_visit_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_visit_subarea: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_visit_fecha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_visit_hora_entrada: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_visit_tarjeta: Option<String>,
}

impl PersonLookupResult {
    /// The `{"found": false}` record
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Optional text value with the empty string as its form default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldText(Option<String>);

impl FieldText {
    pub fn new(value: Option<String>) -> Self {
        Self(value)
    }

    /// Value to put into a form field: the text, or `""` when absent
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    /// True when absent or empty
    pub fn is_blank(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn into_option(self) -> Option<String> {
        self.0
    }
}

impl From<Option<String>> for FieldText {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl From<&str> for FieldText {
    fn from(value: &str) -> Self {
        Self(Some(value.to_string()))
    }
}

impl fmt::Display for FieldText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open visit of a found person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVisit {
    pub id: i64,
    pub sede: String,
    pub area: String,
    /// `None` when the visit has no sub-area (an empty string counts as none)
    pub subarea: Option<String>,
    /// `YYYY-MM-DD`
    pub fecha: String,
    /// `HH:MM`
    pub hora_entrada: String,
    pub tarjeta: Option<String>,
}

impl ActiveVisit {
    /// Sub-area name, or [`SUBAREA_PLACEHOLDER`]
    pub fn subarea_or_placeholder(&self) -> &str {
        self.subarea.as_deref().unwrap_or(SUBAREA_PLACEHOLDER)
    }

    /// Link target for registering the exit of this visit
    pub fn exit_path(&self) -> String {
        register_exit_path(self.id)
    }
}

/// Found person, as used to fill the registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub id: i64,
    pub dni: Option<i64>,
    pub nombre: FieldText,
    pub apellido: FieldText,
    pub telefono: FieldText,
    pub email: FieldText,
    pub tarjetavisita: FieldText,
    pub observaciones: FieldText,
    pub has_photo: bool,
    pub active_visit: Option<ActiveVisit>,
}

/// Typed outcome of a person lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    NotFound,
    Found(PersonRecord),
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<PersonLookupResult> for LookupResult {
    type Error = Error;

    fn try_from(raw: PersonLookupResult) -> Result<Self> {
        if !raw.found {
            return Ok(LookupResult::NotFound);
        }

        let id = raw
            .id
            .ok_or_else(|| Error::MalformedRecord("found person without id".to_string()))?;

        let active_visit = if raw.has_active_visit {
            let visit_id = raw.active_visit_id.ok_or_else(|| {
                Error::MalformedRecord(format!("person {} has an active visit without id", id))
            })?;
            Some(ActiveVisit {
                id: visit_id,
                sede: raw.active_visit_sede.unwrap_or_default(),
                area: raw.active_visit_area.unwrap_or_default(),
                subarea: non_empty(raw.active_visit_subarea),
                fecha: raw.active_visit_fecha.unwrap_or_default(),
                hora_entrada: raw.active_visit_hora_entrada.unwrap_or_default(),
                tarjeta: non_empty(raw.active_visit_tarjeta),
            })
        } else {
            None
        };

        Ok(LookupResult::Found(PersonRecord {
            id,
            dni: raw.dni,
            nombre: raw.nombre.into(),
            apellido: raw.apellido.into(),
            telefono: raw.telefono.into(),
            email: raw.email.into(),
            tarjetavisita: raw.tarjetavisita.into(),
            observaciones: raw.observaciones.into(),
            has_photo: raw.has_photo,
            active_visit,
        }))
    }
}

impl From<PersonRecord> for PersonLookupResult {
    fn from(person: PersonRecord) -> Self {
        let mut raw = PersonLookupResult {
            found: true,
            id: Some(person.id),
            dni: person.dni,
            nombre: person.nombre.into_option(),
            apellido: person.apellido.into_option(),
            telefono: person.telefono.into_option(),
            email: person.email.into_option(),
            tarjetavisita: person.tarjetavisita.into_option(),
            observaciones: person.observaciones.into_option(),
            has_photo: person.has_photo,
            ..Default::default()
        };

        if let Some(visit) = person.active_visit {
            raw.has_active_visit = true;
            raw.active_visit_id = Some(visit.id);
            raw.active_visit_sede = Some(visit.sede);
            raw.active_visit_area = Some(visit.area);
            raw.active_visit_subarea = visit.subarea;
            raw.active_visit_fecha = Some(visit.fecha);
            raw.active_visit_hora_entrada = Some(visit.hora_entrada);
            raw.active_visit_tarjeta = visit.tarjeta;
        }

        raw
    }
}
