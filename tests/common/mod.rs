// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get as route_get, post},
    Json, Router,
};
use oshiri_ase::config::Config;
use oshiri_ase::routes::create_router;
use oshiri_ase::AppState;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Authorization code the fake instance accepts.
#[allow(dead_code)]
pub const GOOD_CODE: &str = "good-code";

/// Access token the fake instance issues for [`GOOD_CODE`].
#[allow(dead_code)]
pub const ALICE_TOKEN: &str = "token-alice";

/// Counters and switches shared between a test and its fake instance.
#[derive(Default)]
pub struct FakeState {
    registrations: AtomicUsize,
    token_revoked: AtomicBool,
}

/// A Mastodon instance stand-in served on an ephemeral local port.
#[allow(dead_code)]
pub struct FakeInstance {
    pub url: String,
    state: Arc<FakeState>,
}

#[allow(dead_code)]
impl FakeInstance {
    pub fn registration_count(&self) -> usize {
        self.state.registrations.load(Ordering::SeqCst)
    }

    /// Make `verify_credentials` reject the issued token from now on.
    pub fn revoke_token(&self) {
        self.state.token_revoked.store(true, Ordering::SeqCst);
    }
}

async fn fake_register_app(State(fake): State<Arc<FakeState>>) -> Json<Value> {
    let n = fake.registrations.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "id": n.to_string(),
        "client_id": format!("client-{n}"),
        "client_secret": format!("secret-{n}"),
        "name": "Oshiri-Ase Counter",
    }))
}

async fn fake_token(Json(body): Json<Value>) -> Response {
    if body["code"] == GOOD_CODE && body["grant_type"] == "authorization_code" {
        Json(json!({
            "access_token": ALICE_TOKEN,
            "token_type": "Bearer",
            "scope": "read:accounts",
            "created_at": 1_700_000_000,
        }))
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
            .into_response()
    }
}

async fn fake_verify_credentials(
    State(fake): State<Arc<FakeState>>,
    headers: HeaderMap,
) -> Response {
    let expected = format!("Bearer {ALICE_TOKEN}");
    let revoked = fake.token_revoked.load(Ordering::SeqCst);
    match headers.get(header::AUTHORIZATION) {
        Some(value) if !revoked && value == expected.as_str() => Json(json!({
            "id": "42",
            "username": "alice",
            "acct": "alice",
            "display_name": "",
            "avatar": "https://famichiki.jp/avatars/alice.png",
        }))
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "The access token is invalid" })),
        )
            .into_response(),
    }
}

/// Start a fake Mastodon instance for the current test runtime.
#[allow(dead_code)]
pub async fn spawn_fake_instance() -> FakeInstance {
    let state = Arc::new(FakeState::default());
    let app = Router::new()
        .route("/api/v1/apps", post(fake_register_app))
        .route("/oauth/token", post(fake_token))
        .route(
            "/api/v1/accounts/verify_credentials",
            route_get(fake_verify_credentials),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake instance");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeInstance {
        url: format!("http://{addr}"),
        state,
    }
}

/// Create a test app pointing at `instance_url`.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::in_memory(config).expect("Failed to build app state"));
    (create_router(state.clone()), state)
}

/// Create a test app wired to a fresh fake instance.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>, FakeInstance) {
    let instance = spawn_fake_instance().await;
    let config = Config {
        instance_url: instance.url.clone(),
        ..Config::test_default()
    };
    let (app, state) = create_test_app_with(config);
    (app, state, instance)
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
}

/// Value part of a `Set-Cookie` header (`name=value; ...`).
#[allow(dead_code)]
pub fn cookie_value(set_cookie: &str) -> String {
    let pair = set_cookie.split(';').next().unwrap_or_default();
    pair.split_once('=')
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// `state` query parameter of an authorization URL.
#[allow(dead_code)]
pub fn state_param(url: &str) -> String {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or_default();
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("state="))
        .map(|s| urlencoding::decode(s).unwrap().into_owned())
        .expect("missing state parameter")
}

#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn post_json(app: &Router, uri: &str, body: Value, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn post_empty(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Run the full login flow and return a `Cookie` header value for the session.
#[allow(dead_code)]
pub async fn login(app: &Router) -> String {
    let response = get(app, "/api/auth/login", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let state = state_param(&location(&response));

    let response = get(
        app,
        &format!("/api/auth/callback?code={GOOD_CODE}&state={state}"),
        Some(&format!("oshiri_state={state}")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let session = find_cookie(&set_cookie_headers(&response), "oshiri_session")
        .expect("callback should set a session cookie");
    format!("oshiri_session={}", cookie_value(&session))
}
