use super::adaptive_write::{adaptive_write, TableWriter, WriteMode, WriteOutcome};
use super::schema::{IdKind, TableSchema};
use super::{BackendClient, BackendError, Order, Query};
use serde_json::{Map, Value};
use shared_types::ContactId;

pub const CONTACTS_TABLE: &str = "contacts";

/// Every stored contact row, newest first, as the backend returned it.
pub async fn list_contact_rows(client: &BackendClient) -> Result<Vec<Value>, BackendError> {
    client
        .select(
            CONTACTS_TABLE,
            &Query::new().order("created_at", Order::Descending),
        )
        .await
}

pub async fn get_contact_row(client: &BackendClient, id: &ContactId) -> Result<Value, BackendError> {
    client
        .maybe_single(CONTACTS_TABLE, &Query::new().eq("id", &id.to_json()))
        .await?
        .ok_or(BackendError::NotFound)
}

pub async fn create_contact(
    writer: &dyn TableWriter,
    schema: Option<&TableSchema>,
    payload: Map<String, Value>,
) -> Result<WriteOutcome, BackendError> {
    import_contacts(writer, schema, vec![payload]).await
}

/// Bulk insert. Rows go through the same column shedding as single saves.
pub async fn import_contacts(
    writer: &dyn TableWriter,
    schema: Option<&TableSchema>,
    mut rows: Vec<Map<String, Value>>,
) -> Result<WriteOutcome, BackendError> {
    let pruned = prepare_rows(schema, &mut rows);
    let generated_id = assign_uuid_ids(schema, &mut rows);

    let mut outcome = adaptive_write(writer, CONTACTS_TABLE, WriteMode::Insert, rows).await?;
    prepend_pruned(&mut outcome, pruned);
    if outcome.generated_id.is_none() {
        outcome.generated_id = generated_id;
    }
    Ok(outcome)
}

pub async fn update_contact(
    writer: &dyn TableWriter,
    schema: Option<&TableSchema>,
    id: &ContactId,
    payload: Map<String, Value>,
) -> Result<WriteOutcome, BackendError> {
    let mut rows = vec![payload];
    let pruned = prepare_rows(schema, &mut rows);

    let filter = Query::new().eq("id", &id.to_json());
    let mut outcome =
        adaptive_write(writer, CONTACTS_TABLE, WriteMode::Update(filter), rows).await?;
    prepend_pruned(&mut outcome, pruned);
    Ok(outcome)
}

pub async fn delete_contact(client: &BackendClient, id: &ContactId) -> Result<(), BackendError> {
    client
        .delete(CONTACTS_TABLE, &Query::new().eq("id", &id.to_json()))
        .await
}

/// Drops fields the discovered table cannot hold. Without a schema nothing changes.
fn prepare_rows(schema: Option<&TableSchema>, rows: &mut [Map<String, Value>]) -> Vec<String> {
    let Some(schema) = schema else {
        return Vec::new();
    };

    let mut pruned: Vec<String> = Vec::new();
    for row in rows.iter_mut() {
        for column in schema.prune(row) {
            if !pruned.contains(&column) {
                pruned.push(column);
            }
        }
    }
    if !pruned.is_empty() {
        tracing::debug!("Pruned columns unknown to the contacts table: {:?}", pruned);
    }
    pruned
}

fn prepend_pruned(outcome: &mut WriteOutcome, mut pruned: Vec<String>) {
    pruned.append(&mut outcome.stripped_columns);
    outcome.stripped_columns = pruned;
}

/// Tables keyed by UUID get client-side ids up front.
fn assign_uuid_ids(schema: Option<&TableSchema>, rows: &mut [Map<String, Value>]) -> Option<String> {
    if schema.and_then(|s| s.id_kind) != Some(IdKind::Uuid) {
        return None;
    }

    let mut first = None;
    for row in rows.iter_mut().filter(|r| !r.contains_key("id")) {
        let id = uuid::Uuid::new_v4().to_string();
        first.get_or_insert_with(|| id.clone());
        row.insert("id".to_string(), Value::String(id));
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingWriter {
        inserted: Mutex<Vec<Map<String, Value>>>,
        updated: Mutex<Vec<(Vec<(String, String)>, Map<String, Value>)>>,
    }

    #[async_trait]
    impl TableWriter for RecordingWriter {
        async fn insert_rows(
            &self,
            _table: &str,
            rows: &[Map<String, Value>],
        ) -> Result<(), BackendError> {
            self.inserted.lock().unwrap().extend(rows.iter().cloned());
            Ok(())
        }

        async fn update_rows(
            &self,
            _table: &str,
            filter: &Query,
            payload: &Map<String, Value>,
        ) -> Result<(), BackendError> {
            self.updated
                .lock()
                .unwrap()
                .push((filter.params().to_vec(), payload.clone()));
            Ok(())
        }
    }

    fn schema(id_kind: IdKind) -> TableSchema {
        TableSchema {
            columns: ["id", "first_name", "email", "category"]
                .iter()
                .map(|c| c.to_string())
                .collect::<BTreeSet<_>>(),
            id_kind: Some(id_kind),
        }
    }

    fn payload() -> Map<String, Value> {
        json!({"first_name": "Jean", "email": "jean@acme.com", "sector": "Tech", "category": "prospect"})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_prunes_with_known_schema() {
        let writer = RecordingWriter::default();
        let schema = schema(IdKind::Integer);

        let outcome = create_contact(&writer, Some(&schema), payload()).await.unwrap();
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.stripped_columns, vec!["sector".to_string()]);
        assert_eq!(outcome.generated_id, None);
        assert!(!writer.inserted.lock().unwrap()[0].contains_key("sector"));
    }

    #[tokio::test]
    async fn test_uuid_table_gets_ids_up_front() {
        let writer = RecordingWriter::default();
        let schema = schema(IdKind::Uuid);

        let outcome = create_contact(&writer, Some(&schema), payload()).await.unwrap();
        let id = outcome.generated_id.unwrap();
        assert_eq!(writer.inserted.lock().unwrap()[0]["id"], json!(id));
    }

    #[tokio::test]
    async fn test_without_schema_payload_is_untouched() {
        let writer = RecordingWriter::default();
        let outcome = create_contact(&writer, None, payload()).await.unwrap();
        assert!(outcome.stripped_columns.is_empty());
        assert_eq!(writer.inserted.lock().unwrap()[0].len(), 4);
    }

    #[tokio::test]
    async fn test_update_filters_by_inferred_id() {
        let writer = RecordingWriter::default();
        update_contact(&writer, None, &ContactId::infer("42"), payload())
            .await
            .unwrap();
        update_contact(
            &writer,
            None,
            &ContactId::infer("0b7c3a2e-4f1d-4c6e-9a55-1f2d3c4b5a69"),
            payload(),
        )
        .await
        .unwrap();

        let updated = writer.updated.lock().unwrap();
        assert_eq!(updated[0].0, vec![("id".to_string(), "eq.42".to_string())]);
        assert_eq!(
            updated[1].0,
            vec![(
                "id".to_string(),
                "eq.0b7c3a2e-4f1d-4c6e-9a55-1f2d3c4b5a69".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_update_without_category_leaves_it_alone() {
        let writer = RecordingWriter::default();
        let input = shared_types::ContactInput {
            first_name: Some("Jean".to_string()),
            ..Default::default()
        };

        update_contact(
            &writer,
            None,
            &ContactId::infer("7"),
            input.into_update_payload(None),
        )
        .await
        .unwrap();

        let updated = writer.updated.lock().unwrap();
        assert_eq!(updated[0].1["first_name"], "Jean");
        assert!(!updated[0].1.contains_key("category"));
        assert!(!updated[0].1.contains_key("status"));
    }
}
