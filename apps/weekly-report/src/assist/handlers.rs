use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::assist::{improve, suggest, AiSuggestion, SuggestStyle};
use crate::errors::AppError;
use crate::llm_client::DEFAULT_MODEL;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub notes: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub style: SuggestStyle,
}

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    #[serde(default)]
    pub text: String,
    pub field: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImproveResponse {
    pub improved: String,
}

fn model_or_default(model: Option<&str>) -> &str {
    model
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MODEL)
}

/// POST /api/suggest
pub async fn handle_suggest(
    State(state): State<AppState>,
    Json(req): Json<SuggestRequest>,
) -> Result<Json<AiSuggestion>, AppError> {
    let notes = req.notes.trim();
    if notes.is_empty() {
        return Err(AppError::Validation("notes is required".to_string()));
    }
    let llm = state.llm.with_api_key(req.api_key.as_deref());
    let suggestion = suggest(&llm, notes, req.style, model_or_default(req.model.as_deref())).await?;
    Ok(Json(suggestion))
}

/// POST /api/improve
pub async fn handle_improve(
    State(state): State<AppState>,
    Json(req): Json<ImproveRequest>,
) -> Result<Json<ImproveResponse>, AppError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("text is required".to_string()));
    }
    let field = req
        .field
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or("report");
    let llm = state.llm.with_api_key(req.api_key.as_deref());
    let improved = improve(&llm, text, field, model_or_default(req.model.as_deref())).await?;
    Ok(Json(ImproveResponse { improved }))
}
