//! Declared contacts table layout, checked against the backend's OpenAPI description.

use super::BackendClient;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Bump when `CONTACT_COLUMNS` changes.
pub const CONTACTS_SCHEMA_VERSION: u32 = 1;

pub const CONTACT_COLUMNS: &[&str] = &[
    "id",
    "first_name",
    "last_name",
    "company",
    "title",
    "sector",
    "website",
    "address",
    "email",
    "phone",
    "linkedin_url",
    "category",
    "status",
    "tags",
    "notes",
    "created_at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Integer,
    Uuid,
    Text,
}

/// Columns a table actually has, as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSchema {
    pub columns: BTreeSet<String>,
    pub id_kind: Option<IdKind>,
}

impl TableSchema {
    /// Reads `definitions.<table>` (Swagger 2, what PostgREST serves) or
    /// `components.schemas.<table>` (OpenAPI 3).
    pub fn from_openapi(document: &Value, table: &str) -> Option<Self> {
        let definition = document
            .pointer(&format!("/definitions/{}", table))
            .or_else(|| document.pointer(&format!("/components/schemas/{}", table)))?;
        let properties = definition.get("properties")?.as_object()?;

        let id_kind = properties.get("id").map(|id| {
            let format = id.get("format").and_then(Value::as_str).unwrap_or_default();
            let kind = id.get("type").and_then(Value::as_str).unwrap_or_default();
            if format == "uuid" {
                IdKind::Uuid
            } else if kind == "integer" || matches!(format, "bigint" | "integer" | "smallint") {
                IdKind::Integer
            } else {
                IdKind::Text
            }
        });

        Some(Self {
            columns: properties.keys().cloned().collect(),
            id_kind,
        })
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Declared columns the live table lacks.
    pub fn missing(&self, declared: &[&str]) -> Vec<String> {
        declared
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect()
    }

    /// Drops fields the table has no column for, returning their names.
    pub fn prune(&self, row: &mut Map<String, Value>) -> Vec<String> {
        let unknown: Vec<String> = row
            .keys()
            .filter(|k| !self.has_column(k))
            .cloned()
            .collect();
        for column in &unknown {
            row.remove(column);
        }
        unknown
    }
}

/// Fetches the contacts layout and logs any drift from `CONTACT_COLUMNS`.
///
/// Returns `None` when the backend does not publish its schema; writes then rely on the
/// adaptive retry alone.
pub async fn discover_contacts_schema(client: &BackendClient) -> Option<TableSchema> {
    let document = match client.openapi().await {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("Schema discovery unavailable: {}", e);
            return None;
        }
    };

    let Some(schema) = TableSchema::from_openapi(&document, super::contacts::CONTACTS_TABLE)
    else {
        tracing::warn!("Backend schema has no contacts table definition");
        return None;
    };

    let missing = schema.missing(CONTACT_COLUMNS);
    if missing.is_empty() {
        tracing::info!(
            version = CONTACTS_SCHEMA_VERSION,
            id_kind = ?schema.id_kind,
            "Contacts table matches the declared schema"
        );
    } else {
        tracing::warn!(
            version = CONTACTS_SCHEMA_VERSION,
            "Contacts table is missing declared columns: {}",
            missing.join(", ")
        );
    }

    Some(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "swagger": "2.0",
            "definitions": {
                "contacts": {
                    "properties": {
                        "id": {"format": "uuid", "type": "string"},
                        "first_name": {"format": "text", "type": "string"},
                        "email": {"format": "text", "type": "string"},
                        "category": {"format": "text", "type": "string"},
                    }
                },
                "events": {
                    "properties": {
                        "id": {"format": "bigint", "type": "integer"}
                    }
                }
            }
        })
    }

    #[test]
    fn test_reads_columns_and_id_kind() {
        let contacts = TableSchema::from_openapi(&document(), "contacts").unwrap();
        assert_eq!(contacts.id_kind, Some(IdKind::Uuid));
        assert!(contacts.has_column("email"));

        let events = TableSchema::from_openapi(&document(), "events").unwrap();
        assert_eq!(events.id_kind, Some(IdKind::Integer));

        assert!(TableSchema::from_openapi(&document(), "missing").is_none());
    }

    #[test]
    fn test_missing_and_prune() {
        let schema = TableSchema::from_openapi(&document(), "contacts").unwrap();
        let missing = schema.missing(CONTACT_COLUMNS);
        assert!(missing.contains(&"sector".to_string()));
        assert!(!missing.contains(&"email".to_string()));

        let mut row = json!({"email": "a@b.c", "sector": "Tech", "tags": []})
            .as_object()
            .cloned()
            .unwrap();
        let mut pruned = schema.prune(&mut row);
        pruned.sort();
        assert_eq!(pruned, vec!["sector".to_string(), "tags".to_string()]);
        assert_eq!(row.len(), 1);
    }
}
