use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use problem_tracker::config::AppConfig;
use problem_tracker::routes;
use problem_tracker::service::ProblemService;
use problem_tracker::state::AppState;
use problem_tracker::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up PASSWORD, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "problem_tracker=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let store = store::connect(&config).await?;

    let state = AppState {
        config: Arc::new(config),
        service: ProblemService::new(store),
    };
    let app = routes::app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("problem tracker listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
