use serde_json::Value;

/// Builds a readable message from a backend error body.
///
/// Structured fields come first (`message`, `hint`, `details`, `code`), one per line. A body
/// with none of them is shown as pretty JSON, and an empty one as "Unknown error".
pub fn format_error(body: &Value) -> String {
    match body {
        Value::Null => "Unknown error".to_string(),
        Value::String(text) if text.trim().is_empty() => "Unknown error".to_string(),
        Value::String(text) => text.clone(),
        Value::Object(fields) => {
            let mut parts = Vec::new();
            if let Some(message) = non_empty(fields.get("message")) {
                parts.push(message);
            }
            if let Some(hint) = non_empty(fields.get("hint")) {
                parts.push(format!("Hint: {}", hint));
            }
            if let Some(details) = non_empty(fields.get("details")) {
                parts.push(format!("Details: {}", details));
            }
            if let Some(code) = non_empty(fields.get("code")) {
                parts.push(format!("Code: {}", code));
            }

            if !parts.is_empty() {
                return parts.join("\n");
            }
            if fields.is_empty() {
                return "Unknown error".to_string();
            }
            serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
        }
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
