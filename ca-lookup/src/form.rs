//! Registration form binding
//!
//! [`FormView`] is built once and handed to the controller. It holds every
//! element the controller touches; elements a page may omit (hidden person
//! id, photo preview, loading indicator, message container) are `Option`s and
//! operations on a missing one are skipped.

use ca_common::PersonRecord;

use crate::banner::Banner;
use crate::client::Photo;

/// Element ids of the registration page
pub mod element_ids {
    pub const DNI: &str = "id_dni";
    pub const PERSON_ID: &str = "person_id";
    pub const NOMBRE: &str = "id_nombre";
    pub const APELLIDO: &str = "id_apellido";
    pub const TELEFONO: &str = "id_telefono";
    pub const EMAIL: &str = "id_email";
    pub const TARJETAVISITA: &str = "id_tarjetavisita";
    pub const OBSERVACIONES: &str = "id_observaciones";
    pub const PHOTO_PREVIEW: &str = "photo-preview";
    pub const LOADING_INDICATOR: &str = "loading-indicator";
    pub const MESSAGE_CONTAINER: &str = "message-container";
}

/// Text input bound to a page element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    element_id: &'static str,
    value: String,
}

impl InputField {
    pub fn new(element_id: &'static str) -> Self {
        Self {
            element_id,
            value: String::new(),
        }
    }

    pub fn element_id(&self) -> &'static str {
        self.element_id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// Photo preview image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoPreview {
    source: Option<Photo>,
    visible: bool,
}

impl PhotoPreview {
    pub fn source(&self) -> Option<&Photo> {
        self.source.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Load `photo` and reveal the preview
    pub fn show_photo(&mut self, photo: Photo) {
        self.source = Some(photo);
        self.visible = true;
    }

    /// Drop the image and hide the preview
    pub fn clear(&mut self) {
        self.source = None;
        self.visible = false;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingIndicator {
    visible: bool,
}

impl LoadingIndicator {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Container for a single banner; a new banner replaces the previous one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContainer {
    banner: Option<Banner>,
}

impl MessageContainer {
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn show(&mut self, banner: Banner) {
        self.banner = Some(banner);
    }

    pub fn clear(&mut self) {
        self.banner = None;
    }

    /// Markup currently rendered in the container (empty when no banner)
    pub fn inner_html(&self) -> String {
        self.banner.as_ref().map(Banner::to_html).unwrap_or_default()
    }
}

/// The visit registration form as seen by the lookup controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub dni: InputField,
    pub person_id: Option<InputField>,
    pub nombre: InputField,
    pub apellido: InputField,
    pub telefono: InputField,
    pub email: InputField,
    pub tarjetavisita: InputField,
    pub observaciones: InputField,
    pub photo_preview: Option<PhotoPreview>,
    pub loading: Option<LoadingIndicator>,
    pub messages: Option<MessageContainer>,
}

impl Default for FormView {
    fn default() -> Self {
        Self::new()
    }
}

impl FormView {
    /// Form with the required inputs only
    pub fn new() -> Self {
        use element_ids::*;

        Self {
            dni: InputField::new(DNI),
            person_id: None,
            nombre: InputField::new(NOMBRE),
            apellido: InputField::new(APELLIDO),
            telefono: InputField::new(TELEFONO),
            email: InputField::new(EMAIL),
            tarjetavisita: InputField::new(TARJETAVISITA),
            observaciones: InputField::new(OBSERVACIONES),
            photo_preview: None,
            loading: None,
            messages: None,
        }
    }

    /// Form with every optional element present
    pub fn with_all_elements() -> Self {
        Self::new()
            .with_person_id_field()
            .with_photo_preview()
            .with_loading_indicator()
            .with_message_container()
    }

    pub fn with_person_id_field(mut self) -> Self {
        self.person_id = Some(InputField::new(element_ids::PERSON_ID));
        self
    }

    pub fn with_photo_preview(mut self) -> Self {
        self.photo_preview = Some(PhotoPreview::default());
        self
    }

    pub fn with_loading_indicator(mut self) -> Self {
        self.loading = Some(LoadingIndicator::default());
        self
    }

    pub fn with_message_container(mut self) -> Self {
        self.messages = Some(MessageContainer::default());
        self
    }

    /// Visible fields filled from a lookup, in page order
    pub fn dependent_fields(&self) -> [&InputField; 6] {
        [
            &self.nombre,
            &self.apellido,
            &self.telefono,
            &self.email,
            &self.tarjetavisita,
            &self.observaciones,
        ]
    }

    fn dependent_fields_mut(&mut self) -> [&mut InputField; 6] {
        [
            &mut self.nombre,
            &mut self.apellido,
            &mut self.telefono,
            &mut self.email,
            &mut self.tarjetavisita,
            &mut self.observaciones,
        ]
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.messages.as_ref().and_then(MessageContainer::banner)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.as_ref().is_some_and(LoadingIndicator::is_visible)
    }

    pub fn is_photo_visible(&self) -> bool {
        self.photo_preview.as_ref().is_some_and(PhotoPreview::is_visible)
    }

    /// Copy a found person into the form; absent values become `""`
    pub fn fill_person(&mut self, person: &PersonRecord) {
        if let Some(field) = self.person_id.as_mut() {
            field.set_value(person.id.to_string());
        }

        self.nombre.set_value(person.nombre.as_str());
        self.apellido.set_value(person.apellido.as_str());
        self.telefono.set_value(person.telefono.as_str());
        self.email.set_value(person.email.as_str());
        self.tarjetavisita.set_value(person.tarjetavisita.as_str());
        self.observaciones.set_value(person.observaciones.as_str());
    }

    /// Reset everything tied to a person, keeping the typed DNI
    pub fn clear_person(&mut self) {
        for field in self.dependent_fields_mut() {
            field.clear();
        }
        if let Some(field) = self.person_id.as_mut() {
            field.clear();
        }
        self.clear_photo();
    }

    pub fn clear_photo(&mut self) {
        if let Some(preview) = self.photo_preview.as_mut() {
            preview.clear();
        }
    }

    pub fn show_loading(&mut self) {
        if let Some(loading) = self.loading.as_mut() {
            loading.show();
        }
    }

    pub fn hide_loading(&mut self) {
        if let Some(loading) = self.loading.as_mut() {
            loading.hide();
        }
    }

    pub fn show_banner(&mut self, banner: Banner) {
        if let Some(messages) = self.messages.as_mut() {
            messages.show(banner);
        }
    }

    pub fn clear_banner(&mut self) {
        if let Some(messages) = self.messages.as_mut() {
            messages.clear();
        }
    }
}
