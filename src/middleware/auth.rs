use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::session;
use crate::state::AppState;

/// Session gate for the JSON API: requests without a valid session token are
/// rejected with 401 before any store access occurs.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !session::is_authenticated(request.headers(), &state.config) {
        return Err(ApiError::unauthorized("Unauthorized"));
    }
    Ok(next.run(request).await)
}
