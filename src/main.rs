use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use draft_assistant_backend::api;
use draft_assistant_backend::config::Config;
use draft_assistant_backend::data::StaticData;
use draft_assistant_backend::metrics;
use draft_assistant_backend::oracle::{Oracle, OpenRouterOracle};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load();
    metrics::register_metrics();

    if config.oracle_api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set; oracle calls will fail");
    }

    let data = Arc::new(StaticData::load(&config));
    let oracle: Arc<dyn Oracle> =
        Arc::new(OpenRouterOracle::from_config(&config).expect("Failed to build oracle client"));

    let mut app = api::router(data, oracle);
    if let Some(static_dir) = &config.static_dir {
        tracing::info!("Serving frontend from {}", static_dir.display());
        app = app.fallback_service(ServeDir::new(static_dir));
    }
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {addr}: {e}"));

    tracing::info!("Draft assistant backend listening on {addr}");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
