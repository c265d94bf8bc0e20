//! Protected tier: the list view and the problems JSON API. The API routes
//! sit behind the session middleware; the HTML view checks the session
//! itself so it can redirect browsers to the login page instead of a 401.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::session;
use crate::state::AppState;
use crate::store::Problem;

const MAIN_PAGE: &str = include_str!("../../templates/main.html");

#[derive(Debug, Deserialize)]
pub struct ProblemInput {
    // Missing fields behave like empty ones and fail validation with 400.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// GET /app
pub async fn app_view(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if !session::is_authenticated(&headers, &state.config) {
        return Redirect::to("/").into_response();
    }
    Html(MAIN_PAGE).into_response()
}

/// GET /api/problems - all problems, newest first.
pub async fn list_problems(State(state): State<AppState>) -> Json<Vec<Problem>> {
    Json(state.service.list().await)
}

/// POST /api/problems
pub async fn create_problem(
    State(state): State<AppState>,
    Json(input): Json<ProblemInput>,
) -> Result<impl IntoResponse, ApiError> {
    let problem = state.service.create(&input.title, &input.description).await?;
    Ok(Json(json!({ "success": true, "problem": problem })))
}

// Ids are extracted as i64; a non-integer id fails path extraction with 400
// before the handler runs.

/// GET /api/problems/:id
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Problem>, ApiError> {
    Ok(Json(state.service.get(id).await?))
}

/// PUT /api/problems/:id
pub async fn update_problem(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProblemInput>,
) -> Result<impl IntoResponse, ApiError> {
    let problem = state
        .service
        .update(id, &input.title, &input.description)
        .await?;
    Ok(Json(json!({ "success": true, "problem": problem })))
}

/// DELETE /api/problems/:id
pub async fn delete_problem(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
