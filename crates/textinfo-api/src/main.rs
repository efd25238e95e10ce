//! Text information extraction server

use std::sync::Arc;

use textinfo_api::{create_router, state::AppState};
use textinfo_core::AppConfig;
use textinfo_extract::InfoExtractor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textinfo_api=debug,tower_http=debug".into()),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Load the dictionary once and build the shared extractor
    let extractor = InfoExtractor::with_userdict(&config.dictionary.path)?;
    tracing::info!(dict = %config.dictionary.path.display(), "extraction pipeline ready");

    // Create application state and router
    let state = Arc::new(AppState::new(config, extractor));
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Text info server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
