//! Integration test support for the ZOCO storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zoco-integration-tests
//! ```
//!
//! Nothing external is needed. Remote success paths run against
//! [`FakeBackend`], a small axum server answering the PostgREST and storage
//! routes the storefront uses; failure paths point the client at a port
//! nobody listens on.
//!
//! # Test Categories
//!
//! - `fallback` - Local tier answers when the backend is down
//! - `remote` - Backend data wins when it is reachable
//! - `storefront_api` - The JSON API over a real socket

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use zoco_storefront::blob::{BlobStore, MemoryBlobStore};
use zoco_storefront::config::SupabaseConfig;
use zoco_storefront::services::Api;
use zoco_storefront::supabase::SupabaseClient;

/// Anon key the fake backend expects.
pub const ANON_KEY: &str = "test-anon-key";

/// An address nothing listens on.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Serve `router` on an ephemeral local port.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Backend configuration pointing at `url`.
#[must_use]
pub fn supabase_config(url: &str) -> SupabaseConfig {
    SupabaseConfig {
        url: Url::parse(url).unwrap(),
        anon_key: SecretString::from(ANON_KEY),
        storage_bucket: "products".to_string(),
        timeout: Duration::from_secs(2),
    }
}

/// A facade talking to `url`, with an in-memory local tier.
#[must_use]
pub fn api_for(url: &str) -> (Api, Arc<MemoryBlobStore>) {
    let blobs = Arc::new(MemoryBlobStore::new());
    let supabase = SupabaseClient::new(Some(&supabase_config(url))).unwrap();
    let local: Arc<dyn BlobStore> = blobs.clone();
    (Api::new(supabase, local, "products"), blobs)
}

// =============================================================================
// Fake backend
// =============================================================================

/// What the fake backend holds and has received.
#[derive(Debug, Default)]
pub struct BackendData {
    pub products: Vec<Value>,
    pub site_content: Option<Value>,
    /// Object paths uploaded to storage, as `bucket/name`.
    pub objects: Vec<String>,
}

/// In-process stand-in for the hosted backend.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    pub url: String,
    data: Arc<Mutex<BackendData>>,
}

impl FakeBackend {
    /// Start a backend serving `products`.
    pub async fn start(products: Vec<Value>) -> Self {
        let data = Arc::new(Mutex::new(BackendData {
            products,
            ..BackendData::default()
        }));

        let router = Router::new()
            .route("/rest/v1/products", get(select_products).post(insert_product))
            .route(
                "/rest/v1/site_content",
                get(select_content).post(upsert_content),
            )
            .route("/storage/v1/object/{bucket}/{*name}", post(upload_object))
            .with_state(Arc::clone(&data));

        let addr = spawn(router).await;
        Self {
            url: format!("http://{addr}"),
            data,
        }
    }

    /// Inspect the backend's current data.
    pub fn with_data<R>(&self, f: impl FnOnce(&mut BackendData) -> R) -> R {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut data)
    }
}

type Shared = Arc<Mutex<BackendData>>;

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    apikey == Some(ANON_KEY) && bearer == Some(ANON_KEY)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid API key" }))).into_response()
}

fn not_acceptable() -> Response {
    (
        StatusCode::NOT_ACCEPTABLE,
        Json(json!({ "code": "PGRST116", "message": "JSON object requested, multiple (or no) rows returned" })),
    )
        .into_response()
}

/// `eq.<value>` filter from a PostgREST query.
fn eq_filter<'a>(query: &'a HashMap<String, String>, column: &str) -> Option<&'a str> {
    query.get(column)?.strip_prefix("eq.")
}

async fn select_products(
    State(data): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let data = data.lock().unwrap_or_else(PoisonError::into_inner);
    match eq_filter(&query, "slug") {
        Some(slug) => data
            .products
            .iter()
            .find(|p| p["slug"] == slug)
            .map_or_else(not_acceptable, |p| Json(p.clone()).into_response()),
        None => Json(data.products.clone()).into_response(),
    }
}

async fn insert_product(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(rows): Json<Vec<Value>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let Some(mut row) = rows.into_iter().next() else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let mut data = data.lock().unwrap_or_else(PoisonError::into_inner);
    row["id"] = json!(format!("srv-{}", data.products.len() + 1));
    data.products.push(row.clone());
    (StatusCode::CREATED, Json(row)).into_response()
}

async fn select_content(
    State(data): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let data = data.lock().unwrap_or_else(PoisonError::into_inner);
    match (&data.site_content, eq_filter(&query, "id")) {
        (Some(row), Some(id)) if row["id"] == id => Json(row.clone()).into_response(),
        _ => not_acceptable(),
    }
}

async fn upsert_content(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(rows): Json<Vec<Value>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut data = data.lock().unwrap_or_else(PoisonError::into_inner);
    data.site_content = rows.into_iter().next();
    StatusCode::CREATED.into_response()
}

async fn upload_object(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path((bucket, name)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if body.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let key = format!("{bucket}/{name}");
    let mut data = data.lock().unwrap_or_else(PoisonError::into_inner);
    data.objects.push(key.clone());
    Json(json!({ "Key": key })).into_response()
}

/// A product row as the backend stores it.
#[must_use]
pub fn product_row(id: &str, name: &str, slug: &str, price: f64, featured: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": slug,
        "description": format!("{name} from the backend"),
        "price": price,
        "category": "T-Shirts",
        "images": [format!("https://cdn.zoco.shop/{slug}.jpg")],
        "sizes": ["M", "L"],
        "featured": featured,
        "stockBySize": { "M": 3, "L": 4 },
    })
}
