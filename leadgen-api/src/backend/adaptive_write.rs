//! Writes that survive a backend whose columns differ from the payload.
//!
//! When the backend rejects a column, that column (and its other spelling) is dropped
//! from every row and the write is retried. An insert refused for a malformed UUID is
//! retried once with a generated identifier.

use super::{BackendClient, BackendError, Query};
use async_trait::async_trait;
use extractors::record_normalizer::write_alias_of;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

const UUID_SYNTAX_ERROR: &str = "invalid input syntax for type uuid";

#[async_trait]
pub trait TableWriter: Send + Sync {
    async fn insert_rows(&self, table: &str, rows: &[Map<String, Value>])
        -> Result<(), BackendError>;

    async fn update_rows(
        &self,
        table: &str,
        filter: &Query,
        payload: &Map<String, Value>,
    ) -> Result<(), BackendError>;
}

#[async_trait]
impl TableWriter for BackendClient {
    async fn insert_rows(
        &self,
        table: &str,
        rows: &[Map<String, Value>],
    ) -> Result<(), BackendError> {
        self.insert(table, rows).await.map(|_| ())
    }

    async fn update_rows(
        &self,
        table: &str,
        filter: &Query,
        payload: &Map<String, Value>,
    ) -> Result<(), BackendError> {
        self.update(table, filter, payload).await.map(|_| ())
    }
}

#[derive(Debug, Clone)]
pub enum WriteMode {
    Insert,
    Update(Query),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteOutcome {
    pub attempts: usize,
    pub stripped_columns: Vec<String>,
    pub generated_id: Option<String>,
}

/// Column named by a "column does not exist" style message, if any.
pub fn rejected_column(message: &str) -> Option<String> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [r#"(?i)column "([^"]+)""#, r"(?i)'([^']+)' column"]
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    });

    patterns
        .iter()
        .find_map(|re| re.captures(message))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Runs the write, shedding rejected columns until it succeeds.
///
/// Gives up with the first column error once a retry would not change the payload, the
/// payload is empty, or the attempt count exceeds the widest row's field count. Any other
/// error is returned as is.
pub async fn adaptive_write(
    writer: &dyn TableWriter,
    table: &str,
    mode: WriteMode,
    mut rows: Vec<Map<String, Value>>,
) -> Result<WriteOutcome, BackendError> {
    if rows.is_empty() {
        return Ok(WriteOutcome::default());
    }

    let max_attempts = rows.iter().map(Map::len).max().unwrap_or(0) + 2;
    let mut outcome = WriteOutcome::default();
    let mut first_column_error: Option<BackendError> = None;

    loop {
        outcome.attempts += 1;

        let result = match &mode {
            WriteMode::Insert => writer.insert_rows(table, &rows).await,
            WriteMode::Update(filter) => writer.update_rows(table, filter, &rows[0]).await,
        };

        let error = match result {
            Ok(()) => {
                if !outcome.stripped_columns.is_empty() {
                    tracing::info!(
                        table,
                        attempts = outcome.attempts,
                        "Write succeeded without columns {:?}",
                        outcome.stripped_columns
                    );
                }
                return Ok(outcome);
            }
            Err(error) => error,
        };

        let message = error.message().unwrap_or_default().to_string();

        if matches!(mode, WriteMode::Insert)
            && outcome.generated_id.is_none()
            && message.contains(UUID_SYNTAX_ERROR)
        {
            let mut first_id = None;
            for row in rows.iter_mut() {
                let id = uuid::Uuid::new_v4().to_string();
                first_id.get_or_insert_with(|| id.clone());
                row.insert("id".to_string(), Value::String(id));
            }
            tracing::warn!(table, "Backend expects UUID identifiers, retrying with generated ids");
            outcome.generated_id = first_id;
            continue;
        }

        let Some(column) = rejected_column(&message) else {
            return Err(error);
        };

        let removed = strip_column(&mut rows, &column);
        let exhausted = removed == 0
            || rows.iter().all(Map::is_empty)
            || outcome.attempts >= max_attempts;

        tracing::warn!(table, column = %column, "Backend rejected column, removing it from the payload");

        if exhausted {
            tracing::warn!(table, attempts = outcome.attempts, "Giving up on adaptive write");
            return Err(first_column_error.unwrap_or(error));
        }
        first_column_error.get_or_insert(error);
        outcome.stripped_columns.push(column);
    }
}

/// Removes `column` and its alternate spelling from every row, returning how many fields went.
fn strip_column(rows: &mut [Map<String, Value>], column: &str) -> usize {
    let alias = write_alias_of(column);
    let mut removed = 0;
    for row in rows.iter_mut() {
        if row.remove(column).is_some() {
            removed += 1;
        }
        if let Some(alias) = alias {
            if row.remove(alias).is_some() {
                removed += 1;
            }
        }
    }
    removed
}
