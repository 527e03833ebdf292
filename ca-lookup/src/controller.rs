//! Lookup-and-autofill controller
//!
//! Binds the DNI field of a [`FormView`]: on blur or Enter it looks the
//! person up and renders one of four states into the form.
//!
//! Overlapping lookups: latest wins. Each lookup gets a new generation number
//! and only completions carrying the current generation are applied; older
//! ones are dropped without touching the fields or the banner. Any received
//! completion hides the loading indicator.

use ca_common::PersonRecord;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::banner::Banner;
use crate::client::LookupClient;
use crate::form::FormView;
use crate::pipeline::{
    CompletedLookup, CompletedPhoto, LookupOutcome, LookupRequest, PendingLookup, PendingPhoto,
    PhotoOutcome, PhotoRequest,
};

/// What the form currently shows as a result of lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// No lookup has completed yet
    Initial,
    Filled,
    FilledWithActiveVisitWarning,
    NotFoundCleared,
    Error,
}

/// Key pressed in the DNI field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Character(char),
    Other,
}

/// Event delivered by the DNI field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Blur,
    KeyPress(Key),
}

/// Result of handling a [`FormEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventResponse {
    /// The event's default action (form submit on Enter) must not run
    pub default_prevented: bool,
    /// State rendered by the lookup this event triggered, if any
    pub rendered: Option<RenderState>,
}

/// Result of applying a completed lookup
pub enum Completion<C> {
    /// Superseded by a newer lookup; only the loading indicator was hidden
    Stale,
    Rendered {
        state: RenderState,
        /// Photo step to run next, when the person has a photo
        photo: Option<PendingPhoto<C>>,
    },
}

pub struct LookupController<C> {
    client: Arc<C>,
    generation: u64,
    state: RenderState,
}

impl<C: LookupClient> LookupController<C> {
    pub fn new(client: C) -> Self {
        Self::with_shared_client(Arc::new(client))
    }

    pub fn with_shared_client(client: Arc<C>) -> Self {
        Self {
            client,
            generation: 0,
            state: RenderState::Initial,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Generation of the most recently started lookup (0 before any)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Dispatch a DNI field event
    pub async fn handle_event(&mut self, form: &mut FormView, event: FormEvent) -> EventResponse {
        match event {
            FormEvent::Blur => EventResponse {
                default_prevented: false,
                rendered: self.on_blur_or_enter(form).await,
            },
            FormEvent::KeyPress(Key::Enter) => EventResponse {
                default_prevented: true,
                rendered: self.on_blur_or_enter(form).await,
            },
            FormEvent::KeyPress(_) => EventResponse {
                default_prevented: false,
                rendered: None,
            },
        }
    }

    /// Look up the trimmed DNI field value; blank values issue no request
    pub async fn on_blur_or_enter(&mut self, form: &mut FormView) -> Option<RenderState> {
        let dni = form.dni.value().trim().to_string();
        if dni.is_empty() {
            debug!("DNI field is blank, skipping lookup");
            return None;
        }
        Some(self.search_person(form, &dni).await)
    }

    /// Run the whole pipeline for `dni` and render the result
    pub async fn search_person(&mut self, form: &mut FormView, dni: &str) -> RenderState {
        let completed = self.begin(form, dni).run().await;

        match self.complete(form, completed) {
            Completion::Stale => self.state,
            Completion::Rendered { state, photo } => {
                if let Some(photo) = photo {
                    let completed = photo.run().await;
                    self.complete_photo(form, completed);
                }
                state
            }
        }
    }

    /// Start a lookup: supersede outstanding ones and show the loading indicator
    pub fn begin(&mut self, form: &mut FormView, dni: &str) -> PendingLookup<C> {
        self.generation += 1;
        form.show_loading();

        info!(dni = %dni, generation = self.generation, "Searching person by DNI");

        PendingLookup::new(
            Arc::clone(&self.client),
            LookupRequest {
                dni: dni.to_string(),
                generation: self.generation,
            },
        )
    }

    /// Apply a finished lookup to the form
    pub fn complete(&mut self, form: &mut FormView, completed: CompletedLookup) -> Completion<C> {
        let CompletedLookup { request, outcome } = completed;

        form.hide_loading();

        if request.generation != self.generation {
            debug!(
                dni = %request.dni,
                generation = request.generation,
                current = self.generation,
                "Discarding superseded lookup result"
            );
            return Completion::Stale;
        }

        let (state, photo) = match outcome {
            LookupOutcome::Found(person) => self.render_found(form, person, request.generation),
            LookupOutcome::NotFound => {
                info!(dni = %request.dni, "Person not found, clearing form");
                form.clear_person();
                form.show_banner(Banner::PersonNotFound);
                (RenderState::NotFoundCleared, None)
            }
            LookupOutcome::Failed(e) => {
                error!(dni = %request.dni, error = %e, "Person lookup failed");
                form.show_banner(Banner::LookupFailed);
                (RenderState::Error, None)
            }
        };

        self.state = state;
        Completion::Rendered { state, photo }
    }

    fn render_found(
        &self,
        form: &mut FormView,
        person: PersonRecord,
        generation: u64,
    ) -> (RenderState, Option<PendingPhoto<C>>) {
        info!(
            person_id = person.id,
            has_photo = person.has_photo,
            has_active_visit = person.active_visit.is_some(),
            "Person found, filling form"
        );

        form.fill_person(&person);

        let photo = if person.has_photo {
            Some(PendingPhoto::new(
                Arc::clone(&self.client),
                PhotoRequest {
                    person_id: person.id,
                    generation,
                },
            ))
        } else {
            form.clear_photo();
            None
        };

        let state = match person.active_visit {
            Some(visit) => {
                warn!(person_id = person.id, visit_id = visit.id, "Person has an active visit");
                form.show_banner(Banner::ActiveVisit(visit));
                RenderState::FilledWithActiveVisitWarning
            }
            None => {
                form.clear_banner();
                RenderState::Filled
            }
        };

        (state, photo)
    }

    /// Apply a finished photo fetch; returns true when the preview changed
    pub fn complete_photo(&mut self, form: &mut FormView, completed: CompletedPhoto) -> bool {
        let CompletedPhoto { request, outcome } = completed;

        if request.generation != self.generation {
            debug!(
                person_id = request.person_id,
                generation = request.generation,
                current = self.generation,
                "Discarding superseded photo"
            );
            return false;
        }

        match outcome {
            PhotoOutcome::Loaded(photo) => match form.photo_preview.as_mut() {
                Some(preview) => {
                    debug!(person_id = request.person_id, bytes = photo.bytes.len(), "Showing photo");
                    preview.show_photo(photo);
                    true
                }
                None => false,
            },
            PhotoOutcome::Failed(e) => {
                error!(person_id = request.person_id, error = %e, "Error al cargar la foto");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Photo;
    use crate::error::LookupError;
    use async_trait::async_trait;
    use ca_common::PersonLookupResult;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeClient {
        people: HashMap<String, Result<PersonLookupResult, LookupError>>,
        photos: HashMap<i64, Result<Photo, LookupError>>,
        lookups: Mutex<Vec<String>>,
        photo_requests: Mutex<Vec<i64>>,
    }

    impl FakeClient {
        fn with_person(mut self, dni: &str, result: PersonLookupResult) -> Self {
            self.people.insert(dni.to_string(), Ok(result));
            self
        }

        fn with_lookup_error(mut self, dni: &str, error: LookupError) -> Self {
            self.people.insert(dni.to_string(), Err(error));
            self
        }

        fn with_photo(mut self, person_id: i64, result: Result<Photo, LookupError>) -> Self {
            self.photos.insert(person_id, result);
            self
        }

        fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }

        fn photo_requests(&self) -> Vec<i64> {
            self.photo_requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LookupClient for FakeClient {
        async fn search_person(&self, dni: &str) -> Result<PersonLookupResult, LookupError> {
            self.lookups.lock().unwrap().push(dni.to_string());
            self.people
                .get(dni)
                .cloned()
                .unwrap_or_else(|| Ok(PersonLookupResult::not_found()))
        }

        async fn fetch_photo(&self, person_id: i64) -> Result<Photo, LookupError> {
            self.photo_requests.lock().unwrap().push(person_id);
            self.photos
                .get(&person_id)
                .cloned()
                .unwrap_or_else(|| Err(LookupError::Api(404, String::new())))
        }
    }

    fn ana() -> PersonLookupResult {
        PersonLookupResult {
            found: true,
            id: Some(7),
            nombre: Some("Ana".to_string()),
            apellido: Some("Diaz".to_string()),
            ..Default::default()
        }
    }

    fn jpeg() -> Photo {
        Photo {
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8, 0xff],
        }
    }

    fn setup(client: FakeClient) -> (LookupController<FakeClient>, Arc<FakeClient>, FormView) {
        let client = Arc::new(client);
        let controller = LookupController::with_shared_client(Arc::clone(&client));
        (controller, client, FormView::with_all_elements())
    }

    #[tokio::test]
    async fn test_blur_fills_form() {
        let (mut controller, client, mut form) = setup(FakeClient::default().with_person("30123456", ana()));
        form.dni.set_value("30123456");

        let response = controller.handle_event(&mut form, FormEvent::Blur).await;

        assert!(!response.default_prevented);
        assert_eq!(response.rendered, Some(RenderState::Filled));
        assert_eq!(client.lookups(), vec!["30123456"]);
        assert_eq!(form.nombre.value(), "Ana");
        assert_eq!(form.apellido.value(), "Diaz");
        assert_eq!(form.telefono.value(), "");
        assert_eq!(form.email.value(), "");
        assert_eq!(form.tarjetavisita.value(), "");
        assert_eq!(form.observaciones.value(), "");
        assert_eq!(form.person_id.as_ref().unwrap().value(), "7");
        assert!(form.banner().is_none());
        assert!(!form.is_loading());
        assert!(!form.is_photo_visible());
        assert!(client.photo_requests().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_uses_trimmed_value() {
        let (mut controller, client, mut form) = setup(FakeClient::default().with_person("30123456", ana()));
        form.dni.set_value("  30123456 \t");

        controller.handle_event(&mut form, FormEvent::Blur).await;

        assert_eq!(client.lookups(), vec!["30123456"]);
        assert_eq!(form.dni.value(), "  30123456 \t");
    }

    #[tokio::test]
    async fn test_blank_dni_issues_no_request() {
        let (mut controller, client, mut form) = setup(FakeClient::default());

        for value in ["", "   ", "\t\n"] {
            form.dni.set_value(value);
            let blur = controller.handle_event(&mut form, FormEvent::Blur).await;
            let enter = controller
                .handle_event(&mut form, FormEvent::KeyPress(Key::Enter))
                .await;
            assert_eq!(blur.rendered, None);
            assert_eq!(enter.rendered, None);
            assert!(enter.default_prevented);
        }

        assert!(client.lookups().is_empty());
        assert_eq!(controller.state(), RenderState::Initial);
        assert_eq!(controller.generation(), 0);
    }

    #[tokio::test]
    async fn test_enter_prevents_submit_and_searches() {
        let (mut controller, client, mut form) = setup(FakeClient::default().with_person("30123456", ana()));
        form.dni.set_value("30123456");

        let response = controller
            .handle_event(&mut form, FormEvent::KeyPress(Key::Enter))
            .await;

        assert!(response.default_prevented);
        assert_eq!(response.rendered, Some(RenderState::Filled));
        assert_eq!(client.lookups().len(), 1);
    }

    #[tokio::test]
    async fn test_other_keys_do_nothing() {
        let (mut controller, client, mut form) = setup(FakeClient::default());
        form.dni.set_value("30123456");

        let response = controller
            .handle_event(&mut form, FormEvent::KeyPress(Key::Character('5')))
            .await;

        assert_eq!(
            response,
            EventResponse {
                default_prevented: false,
                rendered: None
            }
        );
        assert!(client.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_clears_dependents_and_keeps_dni() {
        let (mut controller, _client, mut form) = setup(FakeClient::default());
        form.dni.set_value("99999999");
        form.nombre.set_value("Viejo");
        form.email.set_value("viejo@example.com");
        form.person_id.as_mut().unwrap().set_value("3");
        form.photo_preview.as_mut().unwrap().show_photo(jpeg());

        let state = controller.search_person(&mut form, "99999999").await;

        assert_eq!(state, RenderState::NotFoundCleared);
        assert_eq!(form.dni.value(), "99999999");
        assert!(form.dependent_fields().iter().all(|f| f.value().is_empty()));
        assert_eq!(form.person_id.as_ref().unwrap().value(), "");
        assert!(!form.is_photo_visible());
        assert_eq!(form.banner(), Some(&Banner::PersonNotFound));
    }

    #[tokio::test]
    async fn test_transport_failure_shows_danger_banner_without_mutation() {
        let client = FakeClient::default()
            .with_lookup_error("30123456", LookupError::Network("connection refused".to_string()));
        let (mut controller, _client, mut form) = setup(client);
        form.dni.set_value("30123456");
        form.nombre.set_value("Previo");
        let before = form.clone();

        let state = controller.search_person(&mut form, "30123456").await;

        assert_eq!(state, RenderState::Error);
        assert!(!form.is_loading());
        assert_eq!(form.banner(), Some(&Banner::LookupFailed));
        assert_eq!(form.dni, before.dni);
        assert_eq!(form.nombre.value(), "Previo");
        assert_eq!(form.person_id, before.person_id);
        assert_eq!(form.photo_preview, before.photo_preview);
    }

    #[tokio::test]
    async fn test_active_visit_warning() {
        let person = PersonLookupResult {
            has_active_visit: true,
            active_visit_id: Some(42),
            active_visit_sede: Some("Sede Central".to_string()),
            active_visit_area: Some("Legales".to_string()),
            active_visit_fecha: Some("2024-05-02".to_string()),
            active_visit_hora_entrada: Some("09:15".to_string()),
            ..ana()
        };
        let (mut controller, _client, mut form) = setup(FakeClient::default().with_person("30123456", person));

        let state = controller.search_person(&mut form, "30123456").await;

        assert_eq!(state, RenderState::FilledWithActiveVisitWarning);
        assert_eq!(form.nombre.value(), "Ana");
        let html = form.messages.as_ref().unwrap().inner_html();
        assert!(html.contains("Sede Central"));
        assert!(html.contains("Legales"));
        assert!(html.contains("<strong>Subárea:</strong> N/A"));
        assert!(html.contains("2024-05-02"));
        assert!(html.contains("09:15"));
        assert_eq!(form.banner().unwrap().exit_link().as_deref(), Some("/register-exit/42/"));
    }

    #[tokio::test]
    async fn test_partial_active_visit_still_fills_and_warns() {
        let person = PersonLookupResult {
            has_active_visit: true,
            active_visit_id: Some(42),
            active_visit_sede: Some("Sede Central".to_string()),
            ..ana()
        };
        let (mut controller, _client, mut form) = setup(FakeClient::default().with_person("30123456", person));

        let state = controller.search_person(&mut form, "30123456").await;

        assert_eq!(state, RenderState::FilledWithActiveVisitWarning);
        assert_eq!(form.nombre.value(), "Ana");
        assert_eq!(form.person_id.as_ref().unwrap().value(), "7");
        let Some(Banner::ActiveVisit(visit)) = form.banner() else {
            panic!("expected an active visit banner");
        };
        assert_eq!(visit.sede, "Sede Central");
        assert_eq!(visit.fecha, "");
        assert_eq!(visit.hora_entrada, "");
        assert_eq!(form.banner().unwrap().exit_link().as_deref(), Some("/register-exit/42/"));
    }

    #[tokio::test]
    async fn test_photo_is_fetched_and_shown() {
        let person = PersonLookupResult {
            has_photo: true,
            ..ana()
        };
        let client = FakeClient::default()
            .with_person("30123456", person)
            .with_photo(7, Ok(jpeg()));
        let (mut controller, client, mut form) = setup(client);

        controller.search_person(&mut form, "30123456").await;

        assert_eq!(client.photo_requests(), vec![7]);
        assert!(form.is_photo_visible());
        assert_eq!(form.photo_preview.as_ref().unwrap().source(), Some(&jpeg()));
    }

    #[tokio::test]
    async fn test_photo_failure_leaves_preview_untouched() {
        let person = PersonLookupResult {
            has_photo: true,
            ..ana()
        };
        let client = FakeClient::default()
            .with_person("30123456", person)
            .with_photo(7, Err(LookupError::Network("reset".to_string())));
        let (mut controller, client, mut form) = setup(client);

        let state = controller.search_person(&mut form, "30123456").await;

        assert_eq!(state, RenderState::Filled);
        assert_eq!(client.photo_requests(), vec![7]);
        assert!(!form.is_photo_visible());
        assert!(form.banner().is_none());
    }

    #[tokio::test]
    async fn test_found_clears_previous_banner() {
        let (mut controller, _client, mut form) = setup(FakeClient::default().with_person("30123456", ana()));

        controller.search_person(&mut form, "11111111").await;
        assert_eq!(form.banner(), Some(&Banner::PersonNotFound));

        controller.search_person(&mut form, "30123456").await;
        assert!(form.banner().is_none());
    }

    #[tokio::test]
    async fn test_latest_lookup_wins() {
        let luis = PersonLookupResult {
            id: Some(8),
            nombre: Some("Luis".to_string()),
            ..ana()
        };
        let client = FakeClient::default()
            .with_person("111", ana())
            .with_person("222", luis);
        let (mut controller, _client, mut form) = setup(client);

        let first = controller.begin(&mut form, "111");
        let second = controller.begin(&mut form, "222");
        assert!(form.is_loading());
        assert_eq!(first.request().generation, 1);
        assert_eq!(second.request().generation, 2);
        assert_eq!(second.request().dni, "222");

        let second_done = second.run().await;
        let first_done = first.run().await;

        assert!(matches!(
            controller.complete(&mut form, second_done),
            Completion::Rendered { state: RenderState::Filled, .. }
        ));
        assert_eq!(form.nombre.value(), "Luis");

        assert!(matches!(controller.complete(&mut form, first_done), Completion::Stale));
        assert_eq!(form.nombre.value(), "Luis");
        assert_eq!(form.person_id.as_ref().unwrap().value(), "8");
    }

    #[tokio::test]
    async fn test_stale_result_hides_loading_without_rendering() {
        let (mut controller, _client, mut form) = setup(FakeClient::default().with_person("111", ana()));

        let first = controller.begin(&mut form, "111");
        let _second = controller.begin(&mut form, "222");
        let first_done = first.run().await;

        assert!(matches!(controller.complete(&mut form, first_done), Completion::Stale));
        assert!(!form.is_loading());
        assert!(form.banner().is_none());
        assert_eq!(form.nombre.value(), "");
        assert_eq!(controller.state(), RenderState::Initial);
    }

    #[tokio::test]
    async fn test_stale_photo_is_discarded() {
        let person = PersonLookupResult {
            has_photo: true,
            ..ana()
        };
        let client = FakeClient::default()
            .with_person("111", person)
            .with_photo(7, Ok(jpeg()));
        let (mut controller, _client, mut form) = setup(client);

        let done = controller.begin(&mut form, "111").run().await;
        let Completion::Rendered { photo: Some(photo), .. } = controller.complete(&mut form, done) else {
            panic!("expected a photo step");
        };
        assert_eq!(photo.request().person_id, 7);
        assert_eq!(photo.request().generation, controller.generation());

        // A new lookup starts before the photo arrives
        let _newer = controller.begin(&mut form, "222");
        let photo_done = photo.run().await;

        assert!(!controller.complete_photo(&mut form, photo_done));
        assert!(!form.is_photo_visible());
    }

    #[tokio::test]
    async fn test_form_without_optional_elements() {
        let person = PersonLookupResult {
            has_photo: true,
            has_active_visit: true,
            active_visit_id: Some(1),
            active_visit_fecha: Some("2024-05-02".to_string()),
            active_visit_hora_entrada: Some("09:15".to_string()),
            ..ana()
        };
        let client = FakeClient::default()
            .with_person("30123456", person)
            .with_photo(7, Ok(jpeg()));
        let mut controller = LookupController::new(client);
        let mut form = FormView::new();
        form.dni.set_value("30123456");

        let response = controller.handle_event(&mut form, FormEvent::Blur).await;

        assert_eq!(response.rendered, Some(RenderState::FilledWithActiveVisitWarning));
        assert_eq!(form.nombre.value(), "Ana");
        assert!(form.banner().is_none());
    }
}
