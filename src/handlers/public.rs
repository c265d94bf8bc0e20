//! Public tier: login page, login, logout. No session required.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::session;
use crate::state::AppState;

const LOGIN_PAGE: &str = include_str!("../../templates/login.html");

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// GET / - login page, or straight to the app for a live session.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if session::is_authenticated(&headers, &state.config) {
        return Redirect::to("/app").into_response();
    }
    Html(LOGIN_PAGE).into_response()
}

/// POST /login - compare against the configured secret; on match issue a
/// session cookie. A mismatch changes nothing (no lockout, no rate limit).
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> impl IntoResponse {
    if body.password != state.config.password {
        tracing::warn!("failed login attempt");
        return Json(json!({ "success": false, "message": "Incorrect password." }))
            .into_response();
    }

    match session::issue_token(&state.config) {
        Ok(token) => {
            tracing::info!("successful login");
            let cookie = session::session_cookie(&token, state.config.session_ttl_hours);
            (
                AppendHeaders([(header::SET_COOKIE, cookie)]),
                Json(json!({ "success": true, "redirect": "/app" })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("failed to issue session token: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Internal error." })),
            )
                .into_response()
        }
    }
}

/// GET /logout - clears the session cookie unconditionally.
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, session::clear_session_cookie())]),
        Redirect::to("/"),
    )
}
