//! Text information extraction HTTP service
//!
//! Two endpoints: `GET /` for service status and `POST /extract` for the
//! extraction pipeline, plus generated OpenAPI documentation.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home::home,
        handlers::extract::extract_handler,
    ),
    info(
        title = "文本信息抽取API",
        version = "1.0.0",
        description = "从文本中提取实体、关键词和关系",
    ),
    tags(
        (name = "status", description = "Service status"),
        (name = "extract", description = "Text information extraction"),
    ),
    components(
        schemas(
            handlers::extract::ExtractRequest,
            handlers::extract::ExtractResponse,
            handlers::extract::EntityResponse,
            handlers::extract::RelationResponse,
            error::ErrorDetail,
        )
    ),
)]
pub struct ApiDoc;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create a router over a default-configured state for integration tests
///
/// Uses the stock dictionary so tests never touch the filesystem.
#[cfg(feature = "test-utils")]
pub fn create_router_for_testing() -> Router {
    let config = textinfo_core::AppConfig::default();
    let extractor =
        textinfo_extract::InfoExtractor::new().expect("stock extractor construction cannot fail");
    create_router(Arc::new(AppState::new(config, extractor)))
}
