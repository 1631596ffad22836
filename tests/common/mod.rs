#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use pantry_client::client::{
    Item, ItemId, ItemPatch, ItemsResponse, PantryApi, PantryClient, Settings,
};
use pantry_client::download::DownloadSink;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// State of the in-process fake backend.
#[derive(Clone)]
pub struct Backend {
    pub items: Arc<Mutex<Vec<Value>>>,
    pub recipes: Arc<Mutex<Vec<String>>>,
    pub soon_days: Arc<Mutex<i64>>,
    /// `METHOD path` of every request, in arrival order
    pub requests: Arc<Mutex<Vec<String>>>,
    pub created: Arc<Mutex<Vec<Value>>>,
    pub exported: Arc<Mutex<Vec<Value>>>,
    pub delete_status: Arc<Mutex<StatusCode>>,
    pub fail_listing: Arc<AtomicBool>,
    next_id: Arc<Mutex<i64>>,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            items: Arc::default(),
            recipes: Arc::default(),
            soon_days: Arc::new(Mutex::new(3)),
            requests: Arc::default(),
            created: Arc::default(),
            exported: Arc::default(),
            delete_status: Arc::new(Mutex::new(StatusCode::OK)),
            fail_listing: Arc::default(),
            next_id: Arc::new(Mutex::new(100)),
        }
    }
}

impl Backend {
    pub fn with_items(items: Vec<Value>) -> Self {
        let backend = Self::default();
        *backend.items.lock().unwrap() = items;
        backend
    }

    pub fn set_recipes(&self, recipes: &[&str]) {
        *self.recipes.lock().unwrap() = recipes.iter().map(|r| r.to_string()).collect();
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record(&self, request: impl Into<String>) {
        self.requests.lock().unwrap().push(request.into());
    }
}

async fn list_items(State(backend): State<Backend>) -> impl IntoResponse {
    backend.record("GET /api/items");
    if backend.fail_listing.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"})));
    }
    let items = backend.items.lock().unwrap().clone();
    let soon_days = *backend.soon_days.lock().unwrap();
    (
        StatusCode::OK,
        Json(json!({"items": items, "settings": {"soon_days": soon_days}})),
    )
}

async fn create_item(State(backend): State<Backend>, Json(payload): Json<Value>) -> impl IntoResponse {
    backend.record("POST /api/items");
    backend.created.lock().unwrap().push(payload.clone());

    if payload.get("name").is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Invalid payload"})));
    }

    let id = {
        let mut next = backend.next_id.lock().unwrap();
        *next += 1;
        *next
    };
    let item = json!({
        "id": id,
        "name": payload["name"],
        "category": payload.get("category").cloned().unwrap_or(json!("General")),
        "qty": payload.get("qty").cloned().unwrap_or(json!(1)),
        "expiry": payload.get("expiry").cloned().unwrap_or(Value::Null),
        "notes": payload.get("notes").cloned().unwrap_or(json!("")),
        "days_left": null
    });
    backend.items.lock().unwrap().push(item.clone());
    (StatusCode::CREATED, Json(item))
}

async fn update_item(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> impl IntoResponse {
    backend.record(format!("PUT /api/items/{}", id));
    let mut items = backend.items.lock().unwrap();
    match items.iter_mut().find(|it| it["id"] == json!(id)) {
        Some(item) => {
            if let (Some(target), Some(fields)) = (item.as_object_mut(), patch.as_object()) {
                for (k, v) in fields {
                    target.insert(k.clone(), v.clone());
                }
            }
            (StatusCode::OK, Json(item.clone()))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))),
    }
}

async fn delete_item(State(backend): State<Backend>, Path(id): Path<i64>) -> impl IntoResponse {
    backend.record(format!("DELETE /api/items/{}", id));
    let status = *backend.delete_status.lock().unwrap();
    if !status.is_success() {
        return (status, Json(json!({"error": "refused"})));
    }
    let mut items = backend.items.lock().unwrap();
    let before = items.len();
    items.retain(|it| it["id"] != json!(id));
    (StatusCode::OK, Json(json!({"deleted": before - items.len()})))
}

async fn list_recipes(State(backend): State<Backend>) -> impl IntoResponse {
    backend.record("GET /api/recipes");
    let recipes = backend.recipes.lock().unwrap().clone();
    Json(json!({ "recipes": recipes }))
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

async fn export_shopping(State(backend): State<Backend>, Json(payload): Json<Value>) -> impl IntoResponse {
    backend.record("POST /api/export_shopping");
    let items = payload["items"].as_array().cloned().unwrap_or_default();
    backend.exported.lock().unwrap().extend(items.iter().cloned());

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Name", "Quantity", "Category", "Notes"])
        .unwrap();
    for it in &items {
        writer
            .write_record([cell(&it["name"]), cell(&it["qty"]), cell(&it["category"]), cell(&it["notes"])])
            .unwrap();
    }
    let body = writer.into_inner().unwrap();
    ([(header::CONTENT_TYPE, "text/csv")], body)
}

async fn update_settings(State(backend): State<Backend>, Json(payload): Json<Value>) -> impl IntoResponse {
    backend.record("POST /api/settings");
    if let Some(days) = payload["soon_days"].as_i64() {
        *backend.soon_days.lock().unwrap() = days;
    }
    Json(json!({"soon_days": *backend.soon_days.lock().unwrap()}))
}

/// Serves `backend` on an ephemeral local port and returns its base URL.
pub async fn spawn_backend(backend: Backend) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/:id", put(update_item).delete(delete_item))
        .route("/api/recipes", get(list_recipes))
        .route("/api/export_shopping", post(export_shopping))
        .route("/api/settings", post(update_settings))
        .with_state(backend);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

/// A base URL nothing is listening on.
pub async fn dead_backend_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

/// Client for the local fake backend that never goes through a system proxy.
pub fn local_client(base_url: String) -> PantryClient {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build reqwest client");
    PantryClient::with_client(base_url, client)
}

pub fn item_json(id: i64, name: &str, expiry: Option<&str>, days_left: Option<i64>) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": "General",
        "qty": 1,
        "expiry": expiry,
        "days_left": days_left,
        "notes": ""
    })
}

pub fn item(id: i64, name: &str) -> Item {
    serde_json::from_value(item_json(id, name, None, None)).expect("valid item")
}

/// Download sink that keeps files in memory.
#[derive(Clone, Default)]
pub struct MemoryDownloads {
    pub saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

#[async_trait]
impl DownloadSink for MemoryDownloads {
    async fn save(&self, filename: &str, contents: &[u8]) -> Result<PathBuf> {
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), contents.to_vec()));
        Ok(PathBuf::from(filename))
    }
}

/// API whose listings each wait for an explicit release, for ordering tests.
///
/// Recipe listings are only gated when queued; otherwise they answer at once
/// with no recipes.
#[derive(Default)]
pub struct GatedApi {
    pending: Mutex<VecDeque<(oneshot::Receiver<()>, Vec<Item>)>>,
    pending_recipes: Mutex<VecDeque<(oneshot::Receiver<()>, Vec<String>)>>,
    releases: Mutex<Vec<Option<oneshot::Sender<()>>>>,
    calls: AtomicUsize,
    recipe_calls: AtomicUsize,
}

impl GatedApi {
    fn gate(&self) -> (usize, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let mut releases = self.releases.lock().unwrap();
        releases.push(Some(tx));
        (releases.len() - 1, rx)
    }

    /// Queues a listing response; returns its index for [`GatedApi::release`].
    pub fn push_listing(&self, items: Vec<Item>) -> usize {
        let (index, rx) = self.gate();
        self.pending.lock().unwrap().push_back((rx, items));
        index
    }

    /// Queues a recipes response; returns its index for [`GatedApi::release`].
    pub fn push_recipes(&self, recipes: &[&str]) -> usize {
        let (index, rx) = self.gate();
        let recipes = recipes.iter().map(|r| r.to_string()).collect();
        self.pending_recipes.lock().unwrap().push_back((rx, recipes));
        index
    }

    pub fn release(&self, index: usize) {
        if let Some(tx) = self.releases.lock().unwrap()[index].take() {
            let _ = tx.send(());
        }
    }

    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    pub async fn wait_for_recipe_calls(&self, n: usize) {
        while self.recipe_calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl PantryApi for GatedApi {
    async fn list_items(&self) -> Result<ItemsResponse> {
        let next = self.pending.lock().unwrap().pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (gate, items) = next.ok_or_else(|| anyhow::anyhow!("no listing queued"))?;
        gate.await?;
        Ok(ItemsResponse {
            items,
            settings: Settings::default(),
        })
    }

    async fn create_item(&self, _fields: &BTreeMap<String, String>) -> Result<reqwest::StatusCode> {
        Ok(reqwest::StatusCode::CREATED)
    }

    async fn update_item(&self, _id: ItemId, _patch: &ItemPatch) -> Result<reqwest::StatusCode> {
        Ok(reqwest::StatusCode::OK)
    }

    async fn delete_item(&self, _id: ItemId) -> Result<reqwest::StatusCode> {
        Ok(reqwest::StatusCode::OK)
    }

    async fn list_recipes(&self) -> Result<Vec<String>> {
        let next = self.pending_recipes.lock().unwrap().pop_front();
        self.recipe_calls.fetch_add(1, Ordering::SeqCst);
        match next {
            Some((gate, recipes)) => {
                gate.await?;
                Ok(recipes)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn export_shopping(&self, _items: &[Item]) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn update_settings(&self, soon_days: i64) -> Result<Settings> {
        Ok(Settings { soon_days })
    }
}

pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
