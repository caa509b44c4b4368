//! Converts `schemars` output into the OpenAPI subset accepted as `responseSchema`.

use schemars::JsonSchema;
use serde_json::{Map, Value};

const KEPT_KEYS: [&str; 5] = ["properties", "required", "items", "description", "enum"];

pub fn response_schema<T: JsonSchema>() -> Value {
    let root = schemars::schema_for!(T);
    let value = serde_json::to_value(root).unwrap_or(Value::Null);
    convert(&value)
}

fn convert(value: &Value) -> Value {
    let Some(object) = value.as_object() else {
        return value.clone();
    };

    let mut out = Map::new();

    match object.get("type") {
        Some(Value::String(t)) => {
            out.insert("type".to_string(), Value::from(t.to_uppercase()));
        }
        Some(Value::Array(types)) => {
            let mut nullable = false;
            for t in types.iter().filter_map(Value::as_str) {
                if t == "null" {
                    nullable = true;
                } else if !out.contains_key("type") {
                    out.insert("type".to_string(), Value::from(t.to_uppercase()));
                }
            }
            if nullable {
                out.insert("nullable".to_string(), Value::Bool(true));
            }
        }
        _ => {}
    }

    for key in KEPT_KEYS {
        let Some(inner) = object.get(key) else { continue };
        let converted = match key {
            "properties" => Value::Object(
                inner
                    .as_object()
                    .map(|props| {
                        props
                            .iter()
                            .map(|(name, schema)| (name.clone(), convert(schema)))
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            "items" => convert(inner),
            _ => inner.clone(),
        };
        out.insert(key.to_string(), converted);
    }

    if out.get("required").and_then(Value::as_array).map_or(false, |r| r.is_empty()) {
        out.remove("required");
    }

    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{CardFields, EnrichedContact};

    #[test]
    fn test_enrichment_schema() {
        let schema = response_schema::<EnrichedContact>();

        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["email"]["type"], "STRING");
        assert!(schema.get("$schema").is_none());
        assert!(schema.get("title").is_none());
        assert!(schema["properties"]["email"].get("default").is_none());

        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"first_name"));
        assert!(required.contains(&"last_name"));
        assert!(required.contains(&"company"));
        assert!(!required.contains(&"email"));
    }

    #[test]
    fn test_card_schema_has_no_required_fields() {
        let schema = response_schema::<CardFields>();
        assert_eq!(schema["properties"]["linkedin_url"]["type"], "STRING");
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_nullable_types() {
        let converted = convert(&serde_json::json!({
            "type": ["string", "null"],
            "format": "uri"
        }));
        assert_eq!(converted, serde_json::json!({ "type": "STRING", "nullable": true }));
    }
}
