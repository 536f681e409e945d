use serde_json::Value;

/// JSON when `raw` parses as JSON, otherwise the raw text as a JSON string.
pub fn parse_store_value(raw: &str) -> Value {
  serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
