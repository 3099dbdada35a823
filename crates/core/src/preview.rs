//! Shortened payload renderings for log lines.

use serde_json::Value;

/// Maximum characters kept from any single string inside a logged payload.
pub const PREVIEW_STRING_LIMIT: usize = 100;

/// Maximum characters of a rendered preview.
pub const PREVIEW_TOTAL_LIMIT: usize = 500;

/// Recursively shorten every string in `val` to `max_len` characters.
pub fn truncate_strings(val: &Value, max_len: usize) -> Value {
    match val {
        Value::String(s) if s.chars().count() > max_len => {
            let truncated: String = s.chars().take(max_len).collect();
            Value::String(format!("{truncated}..."))
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| truncate_strings(v, max_len)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), truncate_strings(v, max_len)))
                .collect(),
        ),
        _ => val.clone(),
    }
}

/// Compact one-line preview of a JSON payload for logging.
pub fn json_preview(val: &Value) -> String {
    text_preview(&truncate_strings(val, PREVIEW_STRING_LIMIT).to_string())
}

/// Preview of an arbitrary response body for logging.
pub fn text_preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_TOTAL_LIMIT {
        let head: String = text.chars().take(PREVIEW_TOTAL_LIMIT).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
