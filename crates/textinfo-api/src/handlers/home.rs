//! Service status handler

use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Service status page: running flag, documentation locations, and a sample
/// request for the extraction endpoint
#[utoipa::path(
    get,
    path = "/",
    tag = "status",
    responses(
        (status = 200, description = "Service is running")
    )
)]
pub async fn home() -> impl IntoResponse {
    Json(json!({
        "status": "running",
        "docs": {
            "Swagger UI": "/swagger-ui",
            "OpenAPI": "/api-docs/openapi.json"
        },
        "endpoints": {
            "文本抽取": {
                "path": "/extract",
                "method": "POST",
                "sample_request": {
                    "text": "示例文本",
                    "domain": "general"
                }
            }
        }
    }))
}
