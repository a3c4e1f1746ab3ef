use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    constants::GENERAL_QUERY_INTENT,
    error::{AppError, Result},
};

/// Body of the tool-detection endpoint. `intent` is itself a JSON document
/// produced by the upstream intent classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectToolRequest {
    pub value: String,
    pub intent: String,
}

/// Upstream classification. The field is kept as raw JSON: only the exact
/// string "General Query" is significant, any other value is "not general".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntentLabel {
    #[serde(default)]
    pub intent: Option<Value>,
}

impl IntentLabel {
    /// Decodes the JSON-encoded label. Anything other than a JSON object is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| AppError::BadRequest(format!("Intent is not valid JSON: {}", e)))?;
        if !value.is_object() {
            return Err(AppError::BadRequest(
                "Intent must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| AppError::BadRequest(format!("Invalid intent label: {}", e)))
    }

    pub fn is_general_query(&self) -> bool {
        matches!(&self.intent, Some(Value::String(label)) if label == GENERAL_QUERY_INTENT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDecision {
    #[serde(rename = "detectTool")]
    pub detect_tool: bool,
}

impl ToolDecision {
    /// Strict decode of a model answer: the field is required and must be a boolean.
    pub fn from_model_text(text: &str) -> Result<Self> {
        serde_json::from_str(text.trim()).map_err(|e| {
            AppError::ExternalAPI(format!("Model response violates schema: {}", e))
        })
    }
}
