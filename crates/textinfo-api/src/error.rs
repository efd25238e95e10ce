//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use textinfo_core::TextInfoError;

/// Error body returned by failing requests
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Human-readable failure description
    #[schema(example = "处理失败: dictionary error")]
    pub detail: String,
}

/// Application error type
///
/// Schema validation failures never reach this type; they are answered by
/// the JSON extractor with a 422. Everything that goes wrong past that
/// point collapses into a 500 with the fixed prefix.
#[derive(Debug)]
pub enum AppError {
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request processing failed");
                let body = ErrorDetail {
                    detail: format!("处理失败: {msg}"),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl From<TextInfoError> for AppError {
    fn from(err: TextInfoError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_internal_error_maps_to_processing_failure() {
        let response = AppError::Internal("dictionary vanished".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "处理失败: dictionary vanished");
    }

    #[test]
    fn test_core_error_conversion_keeps_message() {
        let err = AppError::from(TextInfoError::Extraction("bad pattern".to_string()));
        let AppError::Internal(msg) = err;
        assert!(msg.contains("bad pattern"));
    }
}
