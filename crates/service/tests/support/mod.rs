#![allow(dead_code)]
//! In-process stub of the backend API and the user directory.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use configs::{ApiConfig, AppConfig, DirectoryConfig};
use serde_json::{json, Value};
use service::controllers::App;
use service::storage::{LocalStorage, MemoryStorage};
use tokio::net::TcpListener;

#[derive(Clone)]
struct Reply {
    status: u16,
    body: Value,
    delay: Duration,
}

#[derive(Clone, Debug)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct StubState {
    replies: Mutex<HashMap<String, Reply>>,
    hits: Mutex<Vec<Hit>>,
}

pub struct StubBackend {
    pub base_url: String,
    state: Arc<StubState>,
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path_and_query().map(|pq| pq.as_str().to_string()).unwrap_or_else(|| uri.path().to_string());
    let hit = Hit {
        method: method.to_string(),
        path: path.clone(),
        authorization: headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    state.hits.lock().unwrap().push(hit);

    let reply = state.replies.lock().unwrap().get(&format!("{method} {path}")).cloned();
    match reply {
        Some(r) => {
            if !r.delay.is_zero() {
                tokio::time::sleep(r.delay).await;
            }
            let status = StatusCode::from_u16(r.status).unwrap();
            (status, Json(r.body)).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": format!("no stub for {method} {path}") }))).into_response(),
    }
}

impl StubBackend {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(StubState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr: SocketAddr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("stub server error: {}", e);
            }
        });
        Ok(Self { base_url: format!("http://{}:{}", addr.ip(), addr.port()), state })
    }

    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.on_delayed(method, path, status, body, Duration::ZERO)
    }

    pub fn on_delayed(&self, method: &str, path: &str, status: u16, body: Value, delay: Duration) -> &Self {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(format!("{method} {path}"), Reply { status, body, delay });
        self
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }

    pub fn hits_for(&self, method: &str, path: &str) -> usize {
        self.hits().iter().filter(|h| h.method == method && h.path == path).count()
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            api: ApiConfig { base_url: self.base_url.clone(), timeout_secs: Some(5) },
            directory: DirectoryConfig { base_url: format!("{}/directory", self.base_url), ..DirectoryConfig::default() },
            ..AppConfig::default()
        }
    }

    /// App over fresh in-memory storage.
    pub async fn app(&self) -> anyhow::Result<(App, Arc<MemoryStorage>)> {
        let storage = Arc::new(MemoryStorage::new());
        let app = service::runtime::assemble(&self.config(), storage.clone() as Arc<dyn LocalStorage>).await?;
        Ok((app, storage))
    }

    /// App already signed in as user `1` (token `T`).
    pub async fn signed_in_app(&self) -> anyhow::Result<(App, Arc<MemoryStorage>)> {
        self.on("POST", "/auth/login", 200, login_body("1", "user"));
        let (app, storage) = self.app().await?;
        app.login("john@x.com", "secret").await?;
        Ok((app, storage))
    }
}

pub fn user_json(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "firstName": "John",
        "lastName": "Tan",
        "email": "john@x.com",
        "role": role,
        "createdAt": "2024-01-05T08:00:00.000Z"
    })
}

pub fn login_body(id: &str, role: &str) -> Value {
    json!({ "access_token": "T", "user": user_json(id, role) })
}

pub fn product_json(id: &str, kind: &str) -> Value {
    json!({
        "id": id,
        "name": format!("{kind} Shield"),
        "type": kind,
        "description": "Standard cover",
        "basePrice": 800,
        "coverageDetails": "Fire, theft",
        "isActive": true
    })
}

pub fn policy_json(id: &str, status: &str, start: &str, end: &str) -> Value {
    json!({
        "id": id,
        "type": "HOME",
        "premium": 1200,
        "coverageLimit": 250000,
        "startDate": start,
        "endDate": end,
        "status": status,
        "insuranceProduct": product_json("prod-home", "HOME")
    })
}

pub fn claim_json(id: &str, policy_id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "policyId": policy_id,
        "userId": "1",
        "date": "2025-03-10",
        "description": "Burst pipe in kitchen",
        "amount": 1500,
        "status": status
    })
}

pub fn directory_page(page: u32, total_pages: u32, users: &[(i64, &str, &str)]) -> Value {
    let data: Vec<Value> = users
        .iter()
        .map(|(id, first, last)| {
            json!({
                "id": id,
                "email": format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
                "first_name": first,
                "last_name": last,
                "avatar": format!("https://reqres.in/img/faces/{id}-image.jpg")
            })
        })
        .collect();
    json!({ "page": page, "per_page": users.len(), "total": users.len(), "total_pages": total_pages, "data": data })
}
