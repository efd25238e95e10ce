//! Extraction handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tokio::task;
use utoipa::ToSchema;

use textinfo_extract::{Entity, Extraction, Relation};

use crate::error::AppError;
use crate::state::AppState;

/// Extraction request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExtractRequest {
    /// Text to analyze
    #[schema(example = "马云在1999年9月10日于杭州创立了阿里巴巴。")]
    pub text: String,

    /// Free-form domain tag; only "general" enables the relation rule
    #[serde(default = "default_domain")]
    #[schema(example = "general", default = "general")]
    pub domain: String,
}

fn default_domain() -> String {
    textinfo_extract::DEFAULT_DOMAIN.to_string()
}

/// A recognized entity
#[derive(Debug, Serialize, ToSchema)]
pub struct EntityResponse {
    /// Entity category (person, location, organization, date)
    #[serde(rename = "type")]
    #[schema(example = "location")]
    pub entity_type: String,

    /// Surface form as it appears in the text
    #[schema(example = "杭州")]
    pub value: String,

    /// Character offset of the entity start
    #[schema(example = 12)]
    pub start_pos: usize,

    /// Character offset one past the entity end
    #[schema(example = 14)]
    pub end_pos: usize,
}

impl From<Entity> for EntityResponse {
    fn from(entity: Entity) -> Self {
        Self {
            entity_type: entity.entity_type.as_str().to_string(),
            value: entity.value,
            start_pos: entity.start_pos,
            end_pos: entity.end_pos,
        }
    }
}

/// A relation triple over extracted entity values
#[derive(Debug, Serialize, ToSchema)]
pub struct RelationResponse {
    #[schema(example = "马云")]
    pub subject: String,

    #[schema(example = "关联")]
    pub predicate: String,

    #[schema(example = "杭州")]
    pub object: String,
}

impl From<Relation> for RelationResponse {
    fn from(relation: Relation) -> Self {
        Self {
            subject: relation.subject,
            predicate: relation.predicate,
            object: relation.object,
        }
    }
}

/// Extraction response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ExtractResponse {
    /// Original text
    pub text: String,

    /// Domain tag as received
    pub domain: String,

    /// Recognized entities, tag-derived first, then dates
    pub entities: Vec<EntityResponse>,

    /// Top-ranked keywords (at most five)
    pub keywords: Vec<String>,

    /// Heuristic relations (at most one)
    pub relations: Vec<RelationResponse>,
}

impl ExtractResponse {
    fn new(text: String, domain: String, extraction: Extraction) -> Self {
        Self {
            text,
            domain,
            entities: extraction.entities.into_iter().map(Into::into).collect(),
            keywords: extraction.keywords,
            relations: extraction.relations.into_iter().map(Into::into).collect(),
        }
    }
}

/// Handle extraction requests
#[utoipa::path(
    post,
    path = "/extract",
    tag = "extract",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Extraction successful", body = ExtractResponse),
        (status = 422, description = "Request body failed validation"),
        (status = 500, description = "Extraction failed", body = crate::error::ErrorDetail)
    )
)]
pub async fn extract_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ExtractRequest { text, domain } = req;

    // Segmentation is CPU-bound; keep it off the async workers. A panic in
    // the task surfaces as a join error and lands on the same 500 boundary.
    let extractor = state.extractor.clone();
    let task_text = text.clone();
    let task_domain = domain.clone();
    let extraction = task::spawn_blocking(move || extractor.extract(&task_text, &task_domain))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok((
        StatusCode::OK,
        Json(ExtractResponse::new(text, domain, extraction)),
    ))
}
