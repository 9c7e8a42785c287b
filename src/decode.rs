use serde_json::Value;
use tracing::{debug, error, warn};

/// A violation as decoded from raw evaluator output, before line validation
///
/// `line` stays optional here: evaluators sometimes omit or mangle it, and a
/// missing line must drop only that record, later, once the source line count
/// is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawViolation {
    pub line: Option<u32>,
    pub issue: String,
    pub suggestion: String,
}

/// Placeholder for absent issue/suggestion fields
const MISSING_FIELD: &str = "N/A";

/// Decode raw evaluator output into violation records
///
/// Evaluator output is untrusted text: it may be wrapped in markdown fences,
/// be empty, fail to parse, or parse into something other than a list. Every
/// failure mode degrades to an empty vec with a log entry carrying the rule
/// id and the raw snippet; this function never errors. One malformed list
/// element never discards its siblings.
pub fn decode(raw_output: &str, rule_id: &str) -> Vec<RawViolation> {
    let cleaned = strip_fences(raw_output.trim());

    if cleaned.is_empty() || cleaned == "[]" {
        debug!("No violations reported for rule {}", rule_id);
        return vec![];
    }

    let parsed: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(e) => {
            error!(
                "Could not decode evaluator output for rule {}: {}. Raw output: {}",
                rule_id, e, raw_output
            );
            return vec![];
        }
    };

    let Some(items) = parsed.as_array() else {
        warn!(
            "Unexpected evaluator output format for rule {}: expected list. Raw output: {}",
            rule_id, raw_output
        );
        return vec![];
    };

    items
        .iter()
        .filter_map(|item| decode_entry(item, rule_id))
        .collect()
}

/// Decode a single list element, coercing absent fields to safe defaults
fn decode_entry(item: &Value, rule_id: &str) -> Option<RawViolation> {
    if !item.is_object() {
        warn!(
            "Skipping non-object violation entry for rule {}: {}",
            rule_id, item
        );
        return None;
    }

    let line = item
        .get("line")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok());

    let field = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .unwrap_or(MISSING_FIELD)
            .to_string()
    };

    Some(RawViolation {
        line,
        issue: field("issue"),
        suggestion: field("suggestion"),
    })
}

/// Strip a leading/trailing markdown code fence if present
///
/// Evaluators backed by generative models often wrap the JSON list in
/// ```json ... ``` for human readability.
fn strip_fences(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}
