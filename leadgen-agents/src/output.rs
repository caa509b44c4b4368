use crate::error::AiError;
use serde::de::DeserializeOwned;

/// Parses a JSON object out of model text, tolerating code fences and surrounding prose.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    let trimmed = strip_fences(text.trim());

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&trimmed[start..=end])
            .map_err(|e| AiError::Decode(e.to_string())),
        _ => Err(AiError::Decode(format!(
            "no JSON object in model output: {}",
            truncate(trimmed, 120)
        ))),
    }
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_plain_json() {
        let value: Value = parse_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_fenced_json() {
        let value: Value = parse_json("```json\n{\"a\": 2}\n```").unwrap();
        assert_eq!(value["a"], 2);
    }

    #[test]
    fn test_json_inside_prose() {
        let value: Value = parse_json("Here you go: {\"a\": 3} Hope it helps.").unwrap();
        assert_eq!(value["a"], 3);
    }

    #[test]
    fn test_no_json() {
        assert!(matches!(
            parse_json::<Value>("Sorry, I could not find anything."),
            Err(AiError::Decode(_))
        ));
    }
}
