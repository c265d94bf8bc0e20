use std::sync::Arc;

use crate::config::AppConfig;
use crate::service::ProblemService;

/// Shared application state, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: ProblemService,
}
