//! In-process fake backend for gateway and service tests.
//!
//! One fallback handler records every request and answers from a fixed
//! route table. Unknown routes echo the JSON body back with an `id`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};

use crate::gateway::Gateway;
use crate::navigation::Navigator;
use crate::session::SessionStore;
use crate::storage::{KeyValueStore, MemoryStore, TOKEN_KEY, USER_KEY};

pub(crate) const SLOW_ROUTE_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

pub(crate) struct FakeBackend {
    pub base_url: String,
    log: Log,
}

impl FakeBackend {
    pub(crate) async fn spawn() -> Self {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(handle).with_state(log.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { base_url: format!("http://{addr}/api"), log }
    }

    pub(crate) fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

/// Gateway wired to `backend` over a fresh in-memory store.
pub(crate) struct Harness {
    pub storage: Arc<MemoryStore>,
    pub session: Arc<SessionStore>,
    pub navigator: Navigator,
    pub gateway: Gateway,
}

impl Harness {
    pub(crate) fn new(base_url: &str) -> Self {
        let storage = Arc::new(MemoryStore::new());
        let session = Arc::new(SessionStore::new(storage.clone()));
        session.hydrate();
        let navigator = Navigator::new();
        let gateway = Gateway::new(base_url, "/login", session.clone(), navigator.clone()).unwrap();
        Self { storage, session, navigator, gateway }
    }

    /// Harness whose storage already holds a reviewer session with `token`.
    pub(crate) fn logged_in(base_url: &str, token: &str) -> Self {
        let harness = Self::new(base_url);
        harness.storage.set(TOKEN_KEY, token).unwrap();
        harness
            .storage
            .set(USER_KEY, r#"{"id":1,"email":"a@b.com","role":"REVIEWER"}"#)
            .unwrap();
        harness.session.hydrate();
        harness
    }
}

pub(crate) fn movie_fixture(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Movie {id}"),
        "genre": "Drama",
        "description": "A film.",
        "posterUrl": "https://img.example.test/poster.jpg",
        "releaseDate": "2020-01-01",
        "averageRating": 4.5,
        "likeCount": 12
    })
}

fn review_fixture(id: i64) -> Value {
    json!({
        "id": id,
        "movieId": 7,
        "movieTitle": "Movie 7",
        "userId": 1,
        "userEmail": "a@b.com",
        "rating": 4,
        "content": "Great.",
        "timestamp": "2024-05-01T10:00:00",
        "likeCount": 2,
        "hasLiked": false,
        "comments": [comment_fixture(100)]
    })
}

fn comment_fixture(id: i64) -> Value {
    json!({
        "id": id,
        "userId": 2,
        "userEmail": "c@d.com",
        "content": "Agreed",
        "timestamp": "2024-05-01T11:00:00"
    })
}

async fn handle(State(log): State<Log>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let header = |name: axum::http::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned)
    };
    let recorded = Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_owned(),
        query: parts.uri.query().map(ToOwned::to_owned),
        authorization: header(axum::http::header::AUTHORIZATION),
        content_type: header(axum::http::header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    };
    log.lock().unwrap().push(recorded.clone());
    respond(&recorded).await
}

async fn respond(req: &Recorded) -> Response {
    let path = req.path.trim_start_matches("/api");
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let body_json = serde_json::from_str::<Value>(&req.body).unwrap_or(Value::Null);

    match (req.method.as_str(), segments.as_slice()) {
        ("POST", ["auth", "login"]) => {
            if body_json["password"] == "x" {
                Json(json!({
                    "token": "t1",
                    "user": { "id": 1, "email": body_json["email"], "role": "REVIEWER" }
                }))
                .into_response()
            } else {
                (StatusCode::UNAUTHORIZED, "Invalid email or password").into_response()
            }
        }
        ("POST", ["auth", "register"]) => (StatusCode::CREATED, "User registered successfully").into_response(),
        ("POST", ["auth", "forgot-password"]) => "If that email exists, a reset link was sent.".into_response(),
        ("POST", ["auth", "reset-password"]) => "Password has been reset.".into_response(),
        ("GET", ["auth", "users", "me"]) => {
            if req.authorization.is_some() {
                Json(json!({"id": 1, "email": "a@b.com", "role": "REVIEWER"})).into_response()
            } else {
                StatusCode::UNAUTHORIZED.into_response()
            }
        }
        ("GET", ["slow"]) => {
            tokio::time::sleep(SLOW_ROUTE_DELAY).await;
            Json(json!({"ok": true})).into_response()
        }
        ("GET", ["unauthorized"]) => (StatusCode::UNAUTHORIZED, Json(json!({"message": "Token expired"}))).into_response(),
        ("GET", ["forbidden"]) => (StatusCode::FORBIDDEN, Json(json!({"error": "Forbidden"}))).into_response(),
        ("GET", ["boom"]) => (StatusCode::INTERNAL_SERVER_ERROR, "database down").into_response(),
        ("GET", ["movies", "404"]) => (StatusCode::NOT_FOUND, Json(json!({"message": "Movie not found"}))).into_response(),
        ("DELETE", ["movies", _]) if req.authorization.is_none() => StatusCode::FORBIDDEN.into_response(),
        ("GET", ["movies", id]) if id.parse::<i64>().is_ok() => Json(movie_fixture(id.parse().unwrap_or(0))).into_response(),
        ("GET", ["movies", ..]) => Json(json!([movie_fixture(1), movie_fixture(2)])).into_response(),
        ("GET", ["reviews", "user", _, "count"]) | ("GET", ["likes", "review", _, "count"]) => Json(json!(3)).into_response(),
        ("GET", ["likes", "review", _, "user", _, "hasLiked"]) => Json(json!(true)).into_response(),
        ("GET", ["reviews", ..]) => Json(json!([review_fixture(10)])).into_response(),
        ("GET", ["comments", ..]) => Json(json!([comment_fixture(100)])).into_response(),
        ("DELETE", _) => StatusCode::NO_CONTENT.into_response(),
        ("POST", ["likes", ..]) => StatusCode::OK.into_response(),
        _ => {
            let mut echoed = body_json;
            if let Value::Object(map) = &mut echoed {
                map.entry("id").or_insert(json!(42));
            }
            Json(echoed).into_response()
        }
    }
}
