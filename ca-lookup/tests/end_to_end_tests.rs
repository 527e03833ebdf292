//! End-to-end tests: controller + HTTP client against a running ca-server
//!
//! Each test starts the backend on an ephemeral port with its own in-memory
//! database.

use std::time::Duration;

use ca_lookup::{Banner, FormEvent, FormView, HttpLookupClient, Key, LookupController, RenderState};
use ca_server::db::persons::{self, NewPerson};
use ca_server::db::structure::{insert_estructura, insert_sede};
use ca_server::db::visits::{self, NewVisit};
use ca_server::{build_router, db, AppState};
use sqlx::types::chrono::{NaiveDate, NaiveTime};
use tokio::net::TcpListener;

const PHOTO: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];

struct TestBackend {
    base_url: String,
    ana_visit: i64,
    central: i64,
    anexo: i64,
}

/// Start ca-server with two seeded people; Ana (with photo) is on an open visit
async fn start_backend() -> TestBackend {
    let pool = db::connect_in_memory().await.expect("Should create database");

    let central = insert_sede(&pool, "Sede Central").await.unwrap();
    let anexo = insert_sede(&pool, "Anexo").await.unwrap();
    insert_estructura(&pool, "Ministerio", "MIN", None).await.unwrap();
    let area = insert_estructura(&pool, "Mesa de Entradas", "ME", Some("MIN"))
        .await
        .unwrap();

    let ana = persons::insert(
        &pool,
        NewPerson {
            dni: 30123456,
            nombre: Some("Ana".to_string()),
            apellido: Some("Diaz".to_string()),
            tarjetavisita: Some("12".to_string()),
            photo: Some(PHOTO.to_vec()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    persons::insert(
        &pool,
        NewPerson {
            dni: 28999111,
            nombre: Some("Luis".to_string()),
            apellido: Some("Gomez".to_string()),
            telefono: Some("11-5555-0000".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let ana_visit = visits::insert(
        &pool,
        NewVisit {
            person_id: ana,
            sede_id: central,
            area_id: area,
            subarea_id: None,
            fecha: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            hora_entrada: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
        },
    )
    .await
    .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(AppState::new(pool));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend {
        base_url: format!("http://{}", addr),
        ana_visit,
        central,
        anexo,
    }
}

fn controller(backend: &TestBackend, sede: Option<i64>) -> LookupController<HttpLookupClient> {
    let client = HttpLookupClient::new(&backend.base_url, Duration::from_secs(5), sede).unwrap();
    LookupController::new(client)
}

#[tokio::test]
async fn test_blur_fills_form_from_backend() {
    let backend = start_backend().await;
    let mut controller = controller(&backend, None);
    let mut form = FormView::with_all_elements();
    form.dni.set_value(" 28999111 ");

    let response = controller.handle_event(&mut form, FormEvent::Blur).await;

    assert_eq!(response.rendered, Some(RenderState::Filled));
    assert_eq!(form.dni.value(), " 28999111 ");
    assert_eq!(form.nombre.value(), "Luis");
    assert_eq!(form.apellido.value(), "Gomez");
    assert_eq!(form.telefono.value(), "11-5555-0000");
    assert_eq!(form.email.value(), "");
    assert!(form.banner().is_none());
    assert!(!form.is_photo_visible());
    assert!(!form.is_loading());
}

#[tokio::test]
async fn test_active_visit_and_photo_from_backend() {
    let backend = start_backend().await;
    let mut controller = controller(&backend, None);
    let mut form = FormView::with_all_elements();
    form.dni.set_value("30123456");

    let response = controller
        .handle_event(&mut form, FormEvent::KeyPress(Key::Enter))
        .await;

    assert!(response.default_prevented);
    assert_eq!(response.rendered, Some(RenderState::FilledWithActiveVisitWarning));
    assert_eq!(form.nombre.value(), "Ana");
    assert_eq!(form.tarjetavisita.value(), "12");

    let preview = form.photo_preview.as_ref().unwrap();
    assert!(preview.is_visible());
    let photo = preview.source().unwrap();
    assert_eq!(photo.bytes, PHOTO);
    assert_eq!(photo.content_type, "image/jpeg");

    let Some(Banner::ActiveVisit(visit)) = form.banner() else {
        panic!("expected an active visit banner");
    };
    assert_eq!(visit.sede, "Sede Central");
    assert_eq!(visit.area, "Mesa de Entradas");
    assert_eq!(visit.subarea_or_placeholder(), "N/A");
    assert_eq!(visit.fecha, "2024-05-02");
    assert_eq!(visit.hora_entrada, "09:15");
    assert_eq!(visit.exit_path(), format!("/register-exit/{}/", backend.ana_visit));
}

#[tokio::test]
async fn test_sede_filter_hides_visit_elsewhere() {
    let backend = start_backend().await;

    let mut form = FormView::with_all_elements();
    form.dni.set_value("30123456");
    let mut elsewhere = controller(&backend, Some(backend.anexo));
    assert_eq!(
        elsewhere.handle_event(&mut form, FormEvent::Blur).await.rendered,
        Some(RenderState::Filled)
    );

    let mut here = controller(&backend, Some(backend.central));
    assert_eq!(
        here.handle_event(&mut form, FormEvent::Blur).await.rendered,
        Some(RenderState::FilledWithActiveVisitWarning)
    );
}

#[tokio::test]
async fn test_unknown_dni_clears_form() {
    let backend = start_backend().await;
    let mut controller = controller(&backend, None);
    let mut form = FormView::with_all_elements();

    form.dni.set_value("30123456");
    controller.handle_event(&mut form, FormEvent::Blur).await;
    assert!(form.is_photo_visible());

    form.dni.set_value("40000000");
    let response = controller.handle_event(&mut form, FormEvent::Blur).await;

    assert_eq!(response.rendered, Some(RenderState::NotFoundCleared));
    assert_eq!(form.dni.value(), "40000000");
    assert!(form.dependent_fields().iter().all(|f| f.value().is_empty()));
    assert_eq!(form.person_id.as_ref().unwrap().value(), "");
    assert!(!form.is_photo_visible());
    assert_eq!(form.banner(), Some(&Banner::PersonNotFound));
}

#[tokio::test]
async fn test_backend_down_shows_error_banner() {
    // Bind then drop a listener to get a port nobody is serving
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        HttpLookupClient::new(&format!("http://{}", addr), Duration::from_secs(2), None).unwrap();
    let mut controller = LookupController::new(client);
    let mut form = FormView::with_all_elements();
    form.dni.set_value("30123456");
    form.nombre.set_value("Sin cambios");

    let response = controller.handle_event(&mut form, FormEvent::Blur).await;

    assert_eq!(response.rendered, Some(RenderState::Error));
    assert!(!form.is_loading());
    assert_eq!(form.banner(), Some(&Banner::LookupFailed));
    assert!(form.banner().unwrap().to_html().contains("alert-danger"));
    assert_eq!(form.nombre.value(), "Sin cambios");
}
