//! Client for the hosted PostgREST backend that stores contacts, events, templates and
//! shared settings.

pub mod adaptive_write;
pub mod app_settings;
pub mod contacts;
pub mod events;
pub mod schema;
pub mod templates;

use crate::helpers::error_format::format_error;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::{Map, Value};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

const APPLICATION_NAME: &str = "leadgen-ai-pro";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend is not configured")]
    NotConfigured,

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Backend key is missing")]
    MissingKey,

    #[error("Request to backend failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", format_error(.body))]
    Api { status: u16, body: Value },

    #[error("Record not found")]
    NotFound,
}

impl BackendError {
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::Api { body, .. } => body.get("code").and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            BackendError::Api { body, .. } => body
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| body.as_str()),
            _ => None,
        }
    }

    /// PostgREST reports an unknown table as `PGRST205`, older versions as a bare 404.
    pub fn is_missing_table(&self) -> bool {
        match self {
            BackendError::Api { status, .. } => {
                self.code() == Some("PGRST205") || self.code() == Some("42P01") || *status == 404
            }
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Row filter and ordering, rendered as PostgREST query parameters.
#[derive(Debug, Clone, Default)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: &Value) -> Self {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.params.push((column.to_string(), format!("eq.{}", rendered)));
        self
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        let direction = match order {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        };
        self.params
            .push(("order".to_string(), format!("{}.{}", column, direction)));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BackendClient {
    /// Accepts only `http`/`https` URLs and a non-empty key.
    pub fn new(url: &str, api_key: &str) -> Result<Self, BackendError> {
        let base_url = crate::config::sanitize_backend_url(url);
        let parsed =
            url::Url::parse(&base_url).map_err(|e| BackendError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BackendError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(BackendError::MissingKey);
        }

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("x-application-name", APPLICATION_NAME)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if raw.trim().is_empty() || status == StatusCode::NO_CONTENT {
            return Ok(Value::Array(Vec::new()));
        }
        Ok(serde_json::from_str(&raw).unwrap_or(Value::Array(Vec::new())))
    }

    pub async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, BackendError> {
        let builder = self
            .request(Method::GET, self.table_url(table))
            .query(&[("select", "*")])
            .query(query.params());
        Ok(rows_of(self.send(builder).await?))
    }

    /// `.maybeSingle()`: zero rows is `None`.
    pub async fn maybe_single(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Option<Value>, BackendError> {
        let rows = self.select(table, &query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert(
        &self,
        table: &str,
        rows: &[Map<String, Value>],
    ) -> Result<Vec<Value>, BackendError> {
        let builder = self
            .request(Method::POST, self.table_url(table))
            .header("Prefer", "return=representation")
            .json(rows);
        Ok(rows_of(self.send(builder).await?))
    }

    pub async fn update(
        &self,
        table: &str,
        query: &Query,
        payload: &Map<String, Value>,
    ) -> Result<Vec<Value>, BackendError> {
        let builder = self
            .request(Method::PATCH, self.table_url(table))
            .header("Prefer", "return=representation")
            .query(query.params())
            .json(payload);
        Ok(rows_of(self.send(builder).await?))
    }

    pub async fn upsert(
        &self,
        table: &str,
        payload: &Map<String, Value>,
        on_conflict: &str,
    ) -> Result<(), BackendError> {
        let builder = self
            .request(Method::POST, self.table_url(table))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .query(&[("on_conflict", on_conflict)])
            .json(&[payload]);
        self.send(builder).await?;
        Ok(())
    }

    pub async fn delete(&self, table: &str, query: &Query) -> Result<(), BackendError> {
        let builder = self
            .request(Method::DELETE, self.table_url(table))
            .query(query.params());
        self.send(builder).await?;
        Ok(())
    }

    /// The OpenAPI document PostgREST serves at the API root.
    pub async fn openapi(&self) -> Result<Value, BackendError> {
        let builder = self.request(Method::GET, format!("{}/rest/v1/", self.base_url));
        self.send(builder).await
    }
}

/// Runs `op` against each table name in turn while the backend says the table is missing.
pub async fn on_first_table<T, F, Fut>(
    tables: &[&'static str],
    mut op: F,
) -> Result<(&'static str, T), BackendError>
where
    F: FnMut(&'static str) -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let mut last_error = BackendError::NotFound;
    for &table in tables {
        match op(table).await {
            Ok(value) => return Ok((table, value)),
            Err(e) if e.is_missing_table() => {
                tracing::debug!("Table '{}' not found, trying next alias", table);
                last_error = e;
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_error)
}

fn rows_of(value: Value) -> Vec<Value> {
    match value {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_requires_http_url_and_key() {
        assert!(matches!(
            BackendClient::new("ftp://example.com", "key"),
            Err(BackendError::InvalidUrl(_))
        ));
        assert!(matches!(
            BackendClient::new("not a url", "key"),
            Err(BackendError::InvalidUrl(_))
        ));
        assert!(matches!(
            BackendClient::new("https://abc.supabase.co", "  "),
            Err(BackendError::MissingKey)
        ));

        let client = BackendClient::new(" https://abc.supabase.co/ ", "key").unwrap();
        assert_eq!(client.base_url(), "https://abc.supabase.co");
        assert_eq!(client.table_url("contacts"), "https://abc.supabase.co/rest/v1/contacts");
    }

    #[test]
    fn test_query_params() {
        let query = Query::new()
            .eq("contact_id", &json!(42))
            .eq("id", &json!("0b7c3a2e-4f1d"))
            .order("start_time", Order::Ascending);
        assert_eq!(
            query.params(),
            &[
                ("contact_id".to_string(), "eq.42".to_string()),
                ("id".to_string(), "eq.0b7c3a2e-4f1d".to_string()),
                ("order".to_string(), "start_time.asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_error_accessors() {
        let err = BackendError::Api {
            status: 400,
            body: json!({"code": "PGRST204", "message": "Could not find the 'x' column"}),
        };
        assert_eq!(err.code(), Some("PGRST204"));
        assert!(!err.is_missing_table());
        assert!(err.to_string().starts_with("Could not find the 'x' column"));

        let missing = BackendError::Api {
            status: 404,
            body: json!({"code": "PGRST205", "message": "Could not find the table"}),
        };
        assert!(missing.is_missing_table());
    }

    #[tokio::test]
    async fn test_on_first_table_skips_missing_tables() {
        let (table, rows) = on_first_table(&["email_templates", "templates"], |table| async move {
            if table == "email_templates" {
                Err(BackendError::Api {
                    status: 404,
                    body: json!({"code": "PGRST205", "message": "Could not find the table"}),
                })
            } else {
                Ok(vec![json!({"id": 1})])
            }
        })
        .await
        .unwrap();

        assert_eq!(table, "templates");
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_on_first_table_stops_on_other_errors() {
        let mut calls = 0;
        let result: Result<(&str, ()), _> = on_first_table(&["a", "b"], |_| {
            calls += 1;
            async {
                Err(BackendError::Api {
                    status: 401,
                    body: json!({"message": "JWT expired"}),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
