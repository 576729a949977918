//! Mock API used by the dispatch-core integration tests.
//!
//! Responses follow the `{"data": ..., "error": false}` envelope with
//! snake_case keys. Besides a tiny user store there are fixture routes for
//! echoing requests, forcing status codes, and slow or malformed replies.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Default)]
pub struct Store {
    users: HashMap<u64, User>,
    next_id: u64,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct StatusQuery {
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct SlowQuery {
    #[serde(default)]
    pub ms: u64,
}

pub fn app() -> Router {
    let mut store = Store {
        users: HashMap::new(),
        next_id: 2,
    };
    store.users.insert(
        1,
        User {
            id: 1,
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
        },
    );
    let db: Db = Arc::new(RwLock::new(store));

    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/empty", get(empty))
        .route("/malformed", get(malformed))
        .route("/slow", get(slow))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({ "data": data, "error": false, "code": 200 }))
}

async fn list_users(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let mut users: Vec<&User> = store.users.values().collect();
    users.sort_by_key(|u| u.id);
    let total = users.len();
    envelope(json!({
        "items": users,
        "pagination": {
            "total_items": total,
            "current_page": 1,
            "has_more_pages": false,
            "has_pages": total > 0,
            "last_page": 1,
            "per_page": 20
        }
    }))
}

async fn create_user(State(db): State<Db>, Json(input): Json<CreateUser>) -> (StatusCode, Json<Value>) {
    let mut store = db.write().await;
    let user = User {
        id: store.next_id,
        first_name: input.first_name,
        last_name: input.last_name,
    };
    store.next_id += 1;
    store.users.insert(user.id, user.clone());
    (StatusCode::CREATED, envelope(json!(user)))
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let store = db.read().await;
    match store.users.get(&id) {
        Some(user) => envelope(json!(user)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": true, "message": format!("user {id} does not exist") })),
        )
            .into_response(),
    }
}

/// Reflects the request back inside the envelope.
async fn echo(
    method: Method,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    debug!(%method, "echo");
    envelope(json!({
        "method": method.as_str(),
        "query": query,
        "headers": headers,
        "body": body,
    }))
}

/// Replies with the requested status; `?message=` adds a JSON error body.
async fn status(Path(code): Path<u16>, Query(q): Query<StatusQuery>) -> Response {
    let Ok(code) = StatusCode::from_u16(code) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    match q.message {
        Some(message) => (code, Json(json!({ "error": true, "message": message }))).into_response(),
        None => code.into_response(),
    }
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn malformed() -> &'static str {
    "this is not json"
}

async fn slow(Query(q): Query<SlowQuery>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(q.ms)).await;
    envelope(json!({ "id": 0 }))
}
