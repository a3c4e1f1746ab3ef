use axum::{extract::State, Json};

use super::{extract::AppJson, AppState};
use crate::{
    error::Result,
    models::{DetectToolRequest, ToolDecision},
    services::ToolDetector,
};

/// POST /api/iftool
///
/// Answers `{ "detectTool": bool }` for a user query and its upstream intent label.
pub async fn detect_tool(
    State(state): State<AppState>,
    AppJson(req): AppJson<DetectToolRequest>,
) -> Result<Json<ToolDecision>> {
    let detector = ToolDetector::new(state.model.clone());
    let decision = detector.detect(&req.value, &req.intent).await?;
    Ok(Json(decision))
}
