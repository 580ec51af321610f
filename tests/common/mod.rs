//! In-process mock of the Configuration API for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use tokio::net::TcpListener;

use config_client::client::{ApiClient, Application, Configuration};

type Shared = Arc<MockApi>;
type Failure = (StatusCode, String);

#[derive(Default)]
struct Store {
    applications: Vec<Application>,
    configurations: Vec<Configuration>,
    next_id: i32,
}

impl Store {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared state behind the mock endpoints.
#[derive(Default)]
pub struct MockApi {
    store: Mutex<Store>,
    /// Calls to `GetByApplicationName`.
    pub fetches: AtomicUsize,
    /// When set, `GetByApplicationName` answers 500.
    pub failing: AtomicBool,
    /// When set, `Heartbeat/Get` answers without a UTC offset, as a SQL `datetime` does.
    pub offsetless_time: AtomicBool,
    fetch_delay: Mutex<Duration>,
}

impl MockApi {
    pub fn seed_application(&self, name: &str) -> i32 {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let mut application = Application::new(name, None);
        application.id = id;
        store.applications.push(application);
        id
    }

    pub fn seed_configuration(&self, application_id: i32, key: &str, value: &str) -> i32 {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let mut configuration = Configuration::new(application_id, key, value);
        configuration.id = id;
        store.configurations.push(configuration);
        id
    }

    /// Change a stored value in place, bypassing the API.
    pub fn set_value(&self, application_id: i32, key: &str, value: &str) {
        let mut store = self.store.lock().unwrap();
        for c in store
            .configurations
            .iter_mut()
            .filter(|c| c.application_id == application_id && c.key == key)
        {
            c.value = value.to_string();
        }
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = delay;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

/// Start the mock on an ephemeral port; returns its state and base URL.
pub async fn start_mock_api() -> (Arc<MockApi>, String) {
    let state = Arc::new(MockApi::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (state, format!("http://{}", addr))
}

/// Plain-HTTP client pointed at the mock.
pub fn api_client(base_url: &str) -> ApiClient {
    ApiClient::new(reqwest::Client::new(), base_url).unwrap()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/Configuration/GetAll", get(configurations_all))
        .route("/Configuration/GetById/{id}", get(configuration_by_id))
        .route(
            "/Configuration/GetByApplicationName/{name}",
            get(configurations_for_application),
        )
        .route("/Configuration/Insert", post(configuration_insert))
        .route("/Configuration/Update", put(configuration_update))
        .route("/Configuration/Delete/{id}", delete(configuration_delete))
        .route("/Application/GetAll", get(applications_all))
        .route("/Application/GetById/{id}", get(application_by_id))
        .route("/Application/GetByName/{name}", get(application_by_name))
        .route("/Application/Insert", post(application_insert))
        .route("/Application/Update", put(application_update))
        .route("/Application/Delete/{id}", delete(application_delete))
        .route("/Heartbeat/Get", get(heartbeat))
        .with_state(state)
}

async fn configurations_all(State(api): State<Shared>) -> Json<Vec<Configuration>> {
    Json(api.store.lock().unwrap().configurations.clone())
}

async fn configuration_by_id(
    State(api): State<Shared>,
    Path(id): Path<i32>,
) -> Result<Json<Configuration>, StatusCode> {
    let store = api.store.lock().unwrap();
    store
        .configurations
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn configurations_for_application(
    State(api): State<Shared>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Configuration>>, Failure> {
    api.fetches.fetch_add(1, Ordering::SeqCst);
    let delay = *api.fetch_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    if api.failing.load(Ordering::SeqCst) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "store unavailable".to_string()));
    }

    let store = api.store.lock().unwrap();
    let Some(application_id) = store
        .applications
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.id)
    else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(
        store
            .configurations
            .iter()
            .filter(|c| c.application_id == application_id)
            .cloned()
            .collect(),
    ))
}

async fn configuration_insert(
    State(api): State<Shared>,
    Json(mut configuration): Json<Configuration>,
) -> Result<Json<i32>, Failure> {
    let mut store = api.store.lock().unwrap();
    let duplicate = store
        .configurations
        .iter()
        .any(|c| c.application_id == configuration.application_id && c.key == configuration.key);
    if duplicate {
        return Err((
            StatusCode::CONFLICT,
            format!("key '{}' already exists", configuration.key),
        ));
    }

    let id = store.next_id();
    configuration.id = id;
    configuration.created_at = Some(Utc::now());
    store.configurations.push(configuration);
    Ok(Json(id))
}

async fn configuration_update(
    State(api): State<Shared>,
    Json(configuration): Json<Configuration>,
) -> Json<i32> {
    let mut store = api.store.lock().unwrap();
    let mut rows = 0;
    for existing in store.configurations.iter_mut().filter(|c| c.id == configuration.id) {
        *existing = Configuration {
            modified_at: Some(Utc::now()),
            created_at: existing.created_at,
            ..configuration.clone()
        };
        rows += 1;
    }
    Json(rows)
}

async fn configuration_delete(State(api): State<Shared>, Path(id): Path<i32>) -> Json<i32> {
    let mut store = api.store.lock().unwrap();
    let before = store.configurations.len();
    store.configurations.retain(|c| c.id != id);
    Json((before - store.configurations.len()) as i32)
}

async fn applications_all(State(api): State<Shared>) -> Json<Vec<Application>> {
    Json(api.store.lock().unwrap().applications.clone())
}

async fn application_by_id(
    State(api): State<Shared>,
    Path(id): Path<i32>,
) -> Result<Json<Application>, StatusCode> {
    let store = api.store.lock().unwrap();
    store
        .applications
        .iter()
        .find(|a| a.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn application_by_name(
    State(api): State<Shared>,
    Path(name): Path<String>,
) -> Result<Json<Application>, StatusCode> {
    let store = api.store.lock().unwrap();
    store
        .applications
        .iter()
        .find(|a| a.name == name)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn application_insert(
    State(api): State<Shared>,
    Json(mut application): Json<Application>,
) -> Result<Json<i32>, Failure> {
    let mut store = api.store.lock().unwrap();
    if store.applications.iter().any(|a| a.name == application.name) {
        return Err((
            StatusCode::CONFLICT,
            format!("application '{}' already exists", application.name),
        ));
    }

    let id = store.next_id();
    application.id = id;
    application.created_at = Some(Utc::now());
    store.applications.push(application);
    Ok(Json(id))
}

async fn application_update(
    State(api): State<Shared>,
    Json(application): Json<Application>,
) -> Json<i32> {
    let mut store = api.store.lock().unwrap();
    let mut rows = 0;
    for existing in store.applications.iter_mut().filter(|a| a.id == application.id) {
        *existing = Application {
            modified_at: Some(Utc::now()),
            created_at: existing.created_at,
            ..application.clone()
        };
        rows += 1;
    }
    Json(rows)
}

async fn application_delete(State(api): State<Shared>, Path(id): Path<i32>) -> Json<i32> {
    let mut store = api.store.lock().unwrap();
    let before = store.applications.len();
    store.applications.retain(|a| a.id != id);
    store.configurations.retain(|c| c.application_id != id);
    Json((before - store.applications.len()) as i32)
}

async fn heartbeat(State(api): State<Shared>) -> Json<String> {
    let now = Utc::now();
    if api.offsetless_time.load(Ordering::SeqCst) {
        return Json(now.naive_utc().format("%Y-%m-%dT%H:%M:%S%.3f").to_string());
    }
    Json(now.to_rfc3339())
}
