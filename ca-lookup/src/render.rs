//! Plain-text rendering of a [`FormView`] for the terminal client

use std::fmt::Write;

use crate::form::{FormView, InputField};

const LABEL_WIDTH: usize = 18;

fn line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{:<width$}{}", format!("{}:", label), value, width = LABEL_WIDTH);
}

fn field(out: &mut String, label: &str, input: &InputField) {
    line(out, label, input.value());
}

/// Render the form fields, photo preview and banner
pub fn render_form(form: &FormView) -> String {
    let mut out = String::new();

    field(&mut out, "DNI", &form.dni);
    if let Some(person_id) = &form.person_id {
        field(&mut out, "Persona (id)", person_id);
    }
    field(&mut out, "Nombre", &form.nombre);
    field(&mut out, "Apellido", &form.apellido);
    field(&mut out, "Teléfono", &form.telefono);
    field(&mut out, "Email", &form.email);
    field(&mut out, "Tarjeta de visita", &form.tarjetavisita);
    field(&mut out, "Observaciones", &form.observaciones);

    if let Some(preview) = &form.photo_preview {
        let photo = match preview.source() {
            Some(photo) if preview.is_visible() => {
                format!("{} ({} bytes)", photo.content_type, photo.bytes.len())
            }
            _ => "-".to_string(),
        };
        line(&mut out, "Foto", &photo);
    }

    if let Some(banner) = form.banner() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", banner);
    }

    out
}
