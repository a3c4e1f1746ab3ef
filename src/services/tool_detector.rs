use regex::Regex;
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock};

use crate::{
    error::Result,
    integrations::gemini::GenerativeModel,
    models::{IntentLabel, ToolDecision},
};

// A `<key>` tag followed by a word, e.g. "<key> abc123".
const SECRET_MARKER_PATTERN: &str = r"(?i)<key>\s*[A-Za-z0-9_]+";

static SECRET_MARKER: OnceLock<Regex> = OnceLock::new();
static TOOL_DECISION_SCHEMA: OnceLock<Value> = OnceLock::new();

fn secret_marker() -> &'static Regex {
    SECRET_MARKER.get_or_init(|| Regex::new(SECRET_MARKER_PATTERN).expect("secret marker pattern"))
}

/// True when the query appears to embed a credential such as a private key.
pub fn contains_secret_marker(query: &str) -> bool {
    secret_marker().is_match(query)
}

/// Response schema handed to the model: a single required, non-nullable boolean.
pub fn tool_decision_schema() -> &'static Value {
    TOOL_DECISION_SCHEMA.get_or_init(|| {
        json!({
            "description": "Determine if a tool is needed based on the presence of key variables (like private keys) in the user's query.",
            "type": "OBJECT",
            "properties": {
                "detectTool": {
                    "type": "BOOLEAN",
                    "description": "Return true if the user's query lacks key variables (like private keys), indicating a tool call is needed. Return false if the query includes key variables, indicating a tool call is not needed.",
                    "nullable": false
                }
            },
            "required": ["detectTool"]
        })
    })
}

pub fn build_prompt(query: &str) -> String {
    format!(
        "Determine if a tool is needed based on the presence of key variables (like private keys) in the following query: \"{}\" Do not do a tool calling if its a general query.",
        query
    )
}

/// Local checks win over the model: either flag forces `detectTool = false`.
pub fn apply_overrides(decision: ToolDecision, has_secret: bool, is_general: bool) -> ToolDecision {
    if has_secret || is_general {
        ToolDecision { detect_tool: false }
    } else {
        decision
    }
}

/// Decides whether a user query should be routed to a tool call.
pub struct ToolDetector {
    model: Arc<dyn GenerativeModel>,
}

impl ToolDetector {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn detect(&self, query: &str, intent_raw: &str) -> Result<ToolDecision> {
        let has_secret = contains_secret_marker(query);
        let label = IntentLabel::parse(intent_raw)?;
        let is_general = label.is_general_query();

        let logged_query = if has_secret { "<redacted>" } else { query };
        tracing::debug!(query = logged_query, intent = intent_raw, "Tool detection request");

        let raw = self
            .model
            .generate_json(&build_prompt(query), tool_decision_schema())
            .await?;
        tracing::debug!(response = %raw.trim(), "Model tool decision");

        let model_decision = ToolDecision::from_model_text(&raw)?;
        let decision = apply_overrides(model_decision, has_secret, is_general);

        tracing::info!(
            has_secret,
            is_general,
            model_detect_tool = model_decision.detect_tool,
            detect_tool = decision.detect_tool,
            "Tool detection resolved"
        );
        Ok(decision)
    }
}
