//! In-process mock of the VORP backend.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use vorp_client::{ApiClient, ClientConfig, InMemoryCredentials};

pub const CSRF_TOKEN: &str = "csrf-token-1";
pub const SESSION_ID: &str = "session-1";
pub const EMAIL: &str = "mina@example.com";
pub const PASSWORD: &str = "correct horse";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub csrf_header: Option<String>,
    pub cookies: Option<String>,
    pub body: Value,
}

impl Recorded {
    pub fn cookie(&self, name: &str) -> Option<String> {
        cookie_value(self.cookies.as_deref(), name)
    }
}

#[derive(Clone, Default)]
pub struct MockBackend {
    requests: Arc<Mutex<Vec<Recorded>>>,
    failures: Arc<Mutex<HashMap<String, StatusCode>>>,
}

impl MockBackend {
    pub async fn spawn() -> (Self, SocketAddr) {
        let backend = Self::default();
        let app = Router::new().fallback(handle).with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (backend, addr)
    }

    /// Every later request to `path` answers `status` with an `error` body.
    pub fn fail(&self, path: &str, status: StatusCode) {
        self.failures.lock().unwrap().insert(path.to_string(), status);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

pub fn client_for(addr: SocketAddr) -> Arc<ApiClient> {
    let config = ClientConfig::default()
        .with_api_url(format!("http://{addr}"))
        .unwrap();
    Arc::new(ApiClient::new(config, InMemoryCredentials::shared()).unwrap())
}

/// A client pointed at a port nothing listens on.
pub fn unreachable_client() -> Arc<ApiClient> {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    client_for(addr)
}

fn cookie_value(cookies: Option<&str>, name: &str) -> Option<String> {
    cookies?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

fn set_cookie(value: String, body: Value) -> Response {
    ([(header::SET_COOKIE, value)], Json(body)).into_response()
}

async fn handle(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let csrf_header = headers
        .get("x-csrftoken")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let cookies = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    backend.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        csrf_header: csrf_header.clone(),
        cookies: cookies.clone(),
        body: body.clone(),
    });

    if let Some(status) = backend.failures.lock().unwrap().get(&path).copied() {
        return (status, Json(json!({ "error": format!("{path} failed") }))).into_response();
    }

    let csrf_cookie = cookie_value(cookies.as_deref(), "csrftoken");
    if method == Method::POST && (csrf_header.is_none() || csrf_header != csrf_cookie) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "detail": "CSRF Failed: CSRF token missing or incorrect." })),
        )
            .into_response();
    }

    match (method, path.as_str()) {
        (Method::GET, "/api/get-csrf-token/") => set_cookie(
            format!("csrftoken={CSRF_TOKEN}; Path=/; SameSite=Lax"),
            json!({ "detail": "CSRF cookie set" }),
        ),
        (Method::POST, "/api/login/") => {
            if body["email"] == EMAIL && body["password"] == PASSWORD {
                set_cookie(
                    format!("sessionid={SESSION_ID}; HttpOnly; Path=/; SameSite=Lax"),
                    json!({ "success": true }),
                )
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid email or password" })),
                )
                    .into_response()
            }
        }
        (Method::GET, "/api/user_profile_view/") => {
            if cookie_value(cookies.as_deref(), "sessionid").as_deref() == Some(SESSION_ID) {
                Json(json!({
                    "username": "mina",
                    "email": EMAIL,
                    "kownwords": ["风"],
                    "motherLanguage": "en",
                    "targetLanguage": "zh",
                    "fluncyLevel": "Elementary (A2)",
                }))
                .into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "detail": "Authentication credentials were not provided." })),
                )
                    .into_response()
            }
        }
        (Method::POST, "/api/logout/") => set_cookie(
            "sessionid=\"\"; expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/".to_string(),
            json!({ "success": true }),
        ),
        (Method::POST, "/api/analyze/") => Json(json!({
            "analysis": {
                "风": { "meaning": "wind", "base": "风", "partOfSpeech": "noun" },
                "world!": { "meaning": "Welt", "base": "world", "partOfSpeech": "noun" },
            }
        }))
        .into_response(),
        (Method::POST, "/api/update_vocabulary/") => Json(json!({ "status": "ok" })).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
