use axum::{extract::State, Json};
use serde::Serialize;
use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub model: String,
    pub balance_lookup: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let balance_lookup = if state.config.ethereum_rpc_url.is_some() {
        "configured".to_string()
    } else {
        "disabled".to_string()
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        model: state.config.gemini_model.clone(),
        balance_lookup,
    })
}
