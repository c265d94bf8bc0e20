use axum::routing::{get, post};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public};
use crate::middleware::auth::session_auth_middleware;
use crate::state::AppState;

/// Build the full router. Exposed so integration tests can drive the app
/// in-process.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/problems",
            get(protected::list_problems).post(protected::create_problem),
        )
        .route(
            "/api/problems/:id",
            get(protected::get_problem)
                .put(protected::update_problem)
                .delete(protected::delete_problem),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    Router::new()
        .route("/", get(public::index))
        .route("/login", post(public::login))
        .route("/logout", get(public::logout))
        .route("/app", get(protected::app_view))
        .merge(api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
