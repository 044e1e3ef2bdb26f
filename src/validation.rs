//! Per-field validation for workspace settings.
//!
//! Every writable field maps through an independent pure function from raw
//! JSON input to a safe stored value. The fallback policy is deliberate:
//! invalid or missing input lands on a documented default, out-of-range
//! numbers clamp to the nearest bound, and nothing here ever rejects.
//! Fields outside [`WRITABLE_FIELDS`] are dropped without error, which
//! keeps `slug` and the timestamps immutable through the update path.

use serde_json::{Map, Value};

use crate::models::workspaces::{ChatMode, VectorSearchMode, WorkspaceUpdate};

/// The update whitelist, in wire (camelCase) spelling.
pub const WRITABLE_FIELDS: &[&str] = &[
    "name",
    "chatTemperature",
    "chatHistory",
    "systemPrompt",
    "similarityThreshold",
    "chatProvider",
    "chatModel",
    "topN",
    "chatMode",
    "agentProvider",
    "agentModel",
    "queryRefusalResponse",
    "vectorSearchMode",
];

/// Numeric coercion: accepts JSON numbers and numeric strings.
fn as_f64_lenient(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn as_i64_lenient(value: &Value) -> Option<i64> {
    // integer fields accept floats and truncate, like a parse-int would
    as_f64_lenient(value).map(|n| n as i64)
}

/// Display name: non-string or empty falls back to "My Workspace",
/// anything longer than 255 characters is truncated.
pub fn validate_name(value: &Value) -> String {
    match value.as_str() {
        Some(s) if !s.is_empty() => s.chars().take(255).collect(),
        _ => "My Workspace".to_string(),
    }
}

/// Model temperature: unset, non-numeric or negative all mean "no override".
pub fn validate_chat_temperature(value: &Value) -> Option<f64> {
    match as_f64_lenient(value) {
        Some(temp) if temp >= 0.0 => Some(temp),
        _ => None,
    }
}

/// Conversation history length: defaults to 20, floors at 0.
pub fn validate_chat_history(value: &Value) -> i64 {
    match as_i64_lenient(value) {
        Some(history) if history < 0 => 0,
        Some(history) => history,
        None => 20,
    }
}

/// Similarity threshold: defaults to 0.25, clamped into [0, 1].
pub fn validate_similarity_threshold(value: &Value) -> f64 {
    match as_f64_lenient(value) {
        Some(threshold) => threshold.clamp(0.0, 1.0),
        None => 0.25,
    }
}

/// Retrieval count: defaults to 4, floors at 1.
pub fn validate_top_n(value: &Value) -> i64 {
    match as_i64_lenient(value) {
        Some(n) if n < 1 => 1,
        Some(n) => n,
        None => 4,
    }
}

/// Chat mode: anything outside {chat, query} falls back to chat.
pub fn validate_chat_mode(value: &Value) -> ChatMode {
    value
        .as_str()
        .map(ChatMode::parse_or_default)
        .unwrap_or_default()
}

/// Vector search mode: anything outside {default, rerank} falls back to default.
pub fn validate_vector_search_mode(value: &Value) -> VectorSearchMode {
    value
        .as_str()
        .map(VectorSearchMode::parse_or_default)
        .unwrap_or_default()
}

/// Provider names: empty, non-string, or the "none" sentinel all normalize
/// to "no provider configured". The literal "default" passes through; the
/// update path turns it into a provider+model reset.
pub fn validate_provider(value: &Value) -> Option<String> {
    match value.as_str() {
        Some("") | Some("none") | None => None,
        Some(provider) => Some(provider.to_string()),
    }
}

/// Free-text settings (model names, prompts, refusal text): empty or
/// non-string clears the column.
pub fn validate_optional_text(value: &Value) -> Option<String> {
    match value.as_str() {
        Some("") | None => None,
        Some(text) => Some(text.to_string()),
    }
}

/// Applies the whitelist and the per-field validators to a raw update
/// payload, producing a typed change-set. Unknown keys are ignored.
pub fn validate_fields(raw: &Map<String, Value>) -> WorkspaceUpdate {
    let mut update = WorkspaceUpdate::default();

    for (key, value) in raw {
        match key.as_str() {
            "name" => update.name = Some(validate_name(value)),
            "chatTemperature" => {
                update.chat_temperature = Some(validate_chat_temperature(value));
            }
            "chatHistory" => update.chat_history = Some(validate_chat_history(value)),
            "systemPrompt" => update.system_prompt = Some(validate_optional_text(value)),
            "similarityThreshold" => {
                update.similarity_threshold = Some(validate_similarity_threshold(value));
            }
            "chatProvider" => update.chat_provider = Some(validate_provider(value)),
            "chatModel" => update.chat_model = Some(validate_optional_text(value)),
            "topN" => update.top_n = Some(validate_top_n(value)),
            "chatMode" => update.chat_mode = Some(validate_chat_mode(value)),
            "agentProvider" => update.agent_provider = Some(validate_provider(value)),
            "agentModel" => update.agent_model = Some(validate_optional_text(value)),
            "queryRefusalResponse" => {
                update.query_refusal_response = Some(validate_optional_text(value));
            }
            "vectorSearchMode" => {
                update.vector_search_mode = Some(validate_vector_search_mode(value));
            }
            _ => {}
        }
    }

    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: Value) -> Map<String, Value> {
        pairs.as_object().unwrap().clone()
    }

    #[test]
    fn test_validate_name_fallbacks() {
        assert_eq!(validate_name(&json!("Research Team")), "Research Team");
        assert_eq!(validate_name(&json!("")), "My Workspace");
        assert_eq!(validate_name(&json!(42)), "My Workspace");
        assert_eq!(validate_name(&Value::Null), "My Workspace");
    }

    #[test]
    fn test_validate_name_truncates_to_255() {
        let long = "x".repeat(300);
        assert_eq!(validate_name(&json!(long)).chars().count(), 255);
    }

    #[test]
    fn test_validate_chat_temperature() {
        assert_eq!(validate_chat_temperature(&json!(0.7)), Some(0.7));
        assert_eq!(validate_chat_temperature(&json!("0.7")), Some(0.7));
        assert_eq!(validate_chat_temperature(&json!(-0.1)), None);
        assert_eq!(validate_chat_temperature(&json!("hot")), None);
        assert_eq!(validate_chat_temperature(&Value::Null), None);
    }

    #[test]
    fn test_validate_chat_history() {
        assert_eq!(validate_chat_history(&json!(35)), 35);
        assert_eq!(validate_chat_history(&json!(-3)), 0);
        assert_eq!(validate_chat_history(&json!("not a number")), 20);
        assert_eq!(validate_chat_history(&Value::Null), 20);
    }

    #[test]
    fn test_validate_similarity_threshold_clamps() {
        assert_eq!(validate_similarity_threshold(&json!(-0.5)), 0.0);
        assert_eq!(validate_similarity_threshold(&json!(1.5)), 1.0);
        assert_eq!(validate_similarity_threshold(&json!(0.6)), 0.6);
        assert_eq!(validate_similarity_threshold(&json!("nope")), 0.25);
        assert_eq!(validate_similarity_threshold(&Value::Null), 0.25);
    }

    #[test]
    fn test_validate_top_n() {
        assert_eq!(validate_top_n(&json!(10)), 10);
        assert_eq!(validate_top_n(&json!(0)), 1);
        assert_eq!(validate_top_n(&json!(-7)), 1);
        assert_eq!(validate_top_n(&Value::Null), 4);
    }

    #[test]
    fn test_validate_chat_mode_fallback() {
        assert_eq!(validate_chat_mode(&json!("query")), ChatMode::Query);
        assert_eq!(validate_chat_mode(&json!("invalid")), ChatMode::Chat);
        assert_eq!(validate_chat_mode(&json!(3)), ChatMode::Chat);
    }

    #[test]
    fn test_validate_vector_search_mode_fallback() {
        assert_eq!(
            validate_vector_search_mode(&json!("rerank")),
            VectorSearchMode::Rerank
        );
        assert_eq!(
            validate_vector_search_mode(&json!("invalid")),
            VectorSearchMode::Default
        );
    }

    #[test]
    fn test_validate_provider_none_sentinel() {
        assert_eq!(validate_provider(&json!("openai")), Some("openai".into()));
        assert_eq!(validate_provider(&json!("none")), None);
        assert_eq!(validate_provider(&json!("")), None);
        assert_eq!(validate_provider(&Value::Null), None);
        // "default" survives validation; the update path resets it
        assert_eq!(validate_provider(&json!("default")), Some("default".into()));
    }

    #[test]
    fn test_validate_fields_applies_whitelist() {
        let raw = map(json!({
            "name": "Docs",
            "slug": "hijacked",
            "topN": 7,
            "internalTag": true
        }));
        let update = validate_fields(&raw);
        assert_eq!(update.name.as_deref(), Some("Docs"));
        assert_eq!(update.top_n, Some(7));
        // non-whitelisted keys leave the change-set untouched
        assert_eq!(
            update,
            WorkspaceUpdate {
                name: Some("Docs".into()),
                top_n: Some(7),
                ..WorkspaceUpdate::default()
            }
        );
    }

    #[test]
    fn test_validate_fields_empty_payload() {
        let update = validate_fields(&map(json!({ "slug": "nope" })));
        assert!(update.is_empty());
    }
}
