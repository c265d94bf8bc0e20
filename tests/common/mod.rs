use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use problem_tracker::config::{AppConfig, StorageConfig};
use problem_tracker::routes;
use problem_tracker::service::ProblemService;
use problem_tracker::state::AppState;
use problem_tracker::store::FileStore;

pub const TEST_PASSWORD: &str = "correct-horse";

/// Build the full router on a fresh file store in a unique temp location.
/// Returns the data file path so tests can assert on (non-)mutation.
pub fn test_app() -> (Router, PathBuf) {
    let path = std::env::temp_dir().join(format!("problems-it-{}.json", uuid::Uuid::new_v4()));
    let config = AppConfig {
        password: TEST_PASSWORD.into(),
        session_secret: "integration-test-secret".into(),
        session_ttl_hours: 1,
        storage: StorageConfig::File { path: path.clone() },
    };
    let store = Arc::new(FileStore::new(path.clone()));
    let state = AppState {
        config: Arc::new(config),
        service: ProblemService::new(store),
    };
    (routes::app(state), path)
}

/// Log in with the test password and return the `session=...` cookie pair.
#[allow(dead_code)]
pub async fn login(app: &Router) -> Result<String> {
    let res = json_request(app, Request::post("/login"), serde_json::json!({ "password": TEST_PASSWORD })).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let set_cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()?
        .to_string();
    Ok(set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string())
}

/// Send a request with a JSON body.
pub async fn json_request(
    app: &Router,
    builder: axum::http::request::Builder,
    body: serde_json::Value,
) -> Result<Response> {
    let request = builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?;
    Ok(app.clone().oneshot(request).await?)
}

/// Send a bodyless request, optionally with a session cookie.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    builder: axum::http::request::Builder,
    cookie: Option<&str>,
) -> Result<Response> {
    let builder = match cookie {
        Some(cookie) => builder.header(header::COOKIE, cookie),
        None => builder,
    };
    Ok(app.clone().oneshot(builder.body(Body::empty())?).await?)
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(res: Response) -> Result<serde_json::Value> {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
