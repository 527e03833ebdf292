//! User-visible banners shown in the form's message container
//!
//! Banners render either as Bootstrap alert markup (for a browser message
//! container) or as plain text (for the terminal client).

use ca_common::ActiveVisit;
use std::fmt;

pub const NOT_FOUND_MESSAGE: &str =
    "Persona no encontrada. Por favor complete los datos para registrarla.";
pub const LOOKUP_FAILED_MESSAGE: &str = "Error al buscar persona. Por favor intente nuevamente.";
pub const ACTIVE_VISIT_HEADING: &str = "¡Atención! Esta persona tiene una visita activa";
pub const ACTIVE_VISIT_NOTICE: &str =
    "No se puede registrar una nueva visita hasta registrar la salida de la visita actual:";
pub const EXIT_LINK_LABEL: &str = "Registrar Salida";

const CLOSE_BUTTON: &str =
    r#"<button type="button" class="btn-close" data-bs-dismiss="alert" aria-label="Close"></button>"#;

/// Bootstrap alert level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            AlertLevel::Info => "alert-info",
            AlertLevel::Warning => "alert-warning",
            AlertLevel::Danger => "alert-danger",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            AlertLevel::Info => "INFO",
            AlertLevel::Warning => "ATENCIÓN",
            AlertLevel::Danger => "ERROR",
        }
    }
}

/// Content of the message container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    /// The DNI is not registered; invite the operator to complete the form
    PersonNotFound,
    /// The person lookup failed
    LookupFailed,
    /// The person already has an open visit
    ActiveVisit(ActiveVisit),
}

impl Banner {
    pub fn level(&self) -> AlertLevel {
        match self {
            Banner::PersonNotFound => AlertLevel::Info,
            Banner::LookupFailed => AlertLevel::Danger,
            Banner::ActiveVisit(_) => AlertLevel::Warning,
        }
    }

    /// Labelled detail lines of an active-visit banner, in display order
    pub fn visit_details(&self) -> Vec<(&'static str, String)> {
        match self {
            Banner::ActiveVisit(visit) => vec![
                ("Sede", visit.sede.clone()),
                ("Área", visit.area.clone()),
                ("Subárea", visit.subarea_or_placeholder().to_string()),
                ("Fecha", visit.fecha.clone()),
                ("Hora de entrada", visit.hora_entrada.clone()),
            ],
            _ => Vec::new(),
        }
    }

    /// Exit-registration link target, only for active-visit banners
    pub fn exit_link(&self) -> Option<String> {
        match self {
            Banner::ActiveVisit(visit) => Some(visit.exit_path()),
            _ => None,
        }
    }

    /// Bootstrap alert markup; interpolated values are HTML-escaped
    pub fn to_html(&self) -> String {
        let body = match self {
            Banner::PersonNotFound => NOT_FOUND_MESSAGE.to_string(),
            Banner::LookupFailed => LOOKUP_FAILED_MESSAGE.to_string(),
            Banner::ActiveVisit(visit) => {
                let info = self
                    .visit_details()
                    .iter()
                    .map(|(label, value)| format!("<strong>{}:</strong> {}", label, escape_html(value)))
                    .collect::<Vec<_>>()
                    .join("<br>");
                format!(
                    r#"<h5 class="alert-heading">{}</h5><p>{}</p><p>{}</p><hr><a href="{}" class="btn btn-primary">{}</a>"#,
                    ACTIVE_VISIT_HEADING,
                    ACTIVE_VISIT_NOTICE,
                    info,
                    escape_html(&visit.exit_path()),
                    EXIT_LINK_LABEL
                )
            }
        };

        format!(
            r#"<div class="alert {} alert-dismissible fade show" role="alert">{}{}</div>"#,
            self.level().css_class(),
            body,
            CLOSE_BUTTON
        )
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.level().tag();
        match self {
            Banner::PersonNotFound => write!(f, "[{}] {}", tag, NOT_FOUND_MESSAGE),
            Banner::LookupFailed => write!(f, "[{}] {}", tag, LOOKUP_FAILED_MESSAGE),
            Banner::ActiveVisit(visit) => {
                writeln!(f, "[{}] {}", tag, ACTIVE_VISIT_HEADING)?;
                writeln!(f, "{}", ACTIVE_VISIT_NOTICE)?;
                for (label, value) in self.visit_details() {
                    writeln!(f, "  {}: {}", label, value)?;
                }
                write!(f, "{}: {}", EXIT_LINK_LABEL, visit.exit_path())
            }
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
