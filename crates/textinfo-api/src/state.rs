//! Application state management

use std::sync::Arc;

use textinfo_core::AppConfig;
use textinfo_extract::InfoExtractor;

/// Application state shared across handlers
///
/// Everything here is read-only after startup; the extractor carries the
/// dictionary loaded at construction and is never mutated again.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Extraction pipeline, shared with blocking tasks
    pub extractor: Arc<InfoExtractor>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, extractor: InfoExtractor) -> Self {
        Self {
            config,
            extractor: Arc::new(extractor),
        }
    }
}
