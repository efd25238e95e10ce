//! API route definitions

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{extract, home};
use crate::state::AppState;

/// Create application routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home::home))
        .route("/extract", post(extract::extract_handler))
}
