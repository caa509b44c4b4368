//! The shared `app_settings` row (id 1) mirroring email credentials and the brand logo.
//!
//! Deployments differ in which columns the row has. Every save first writes the wide
//! payload and, when a column is refused, retries with only `{id, data, updated_at}`.

use super::{BackendClient, BackendError, Query};
use serde_json::{json, Map, Value};
use shared_types::EmailDeliveryConfig;

pub const SETTINGS_TABLE: &str = "app_settings";
pub const SETTINGS_ROW_ID: i64 = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteSettings {
    pub email: Option<EmailDeliveryConfig>,
    pub logo: Option<String>,
}

pub async fn load_settings(client: &BackendClient) -> Result<Option<RemoteSettings>, BackendError> {
    let row = client
        .maybe_single(
            SETTINGS_TABLE,
            &Query::new().eq("id", &Value::from(SETTINGS_ROW_ID)),
        )
        .await?;
    Ok(row.as_ref().map(parse_settings_row))
}

/// Logo from `logo`, `logo_url`, `data.logo` or `data.logo_url`. Email settings from the
/// `data` document when present, otherwise from the flat `emailjs_*` columns.
pub fn parse_settings_row(row: &Value) -> RemoteSettings {
    let data = row.get("data").filter(|d| d.is_object());

    let logo = [
        row.get("logo"),
        row.get("logo_url"),
        data.and_then(|d| d.get("logo")),
        data.and_then(|d| d.get("logo_url")),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_str)
    .map(str::trim)
    .find(|s| !s.is_empty())
    .map(str::to_string);

    let email = match data {
        Some(data) => serde_json::from_value::<EmailDeliveryConfig>(data.clone()).ok(),
        None => {
            let column = |name: &str| {
                row.get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            let config = EmailDeliveryConfig {
                public_key: column("emailjs_public_key"),
                service_id: column("emailjs_service_id"),
                template_id: column("emailjs_template_id"),
                access_token: column("emailjs_access_token"),
                sender_name: column("sender_name"),
            };
            Some(config).filter(|c| *c != EmailDeliveryConfig::default())
        }
    };

    RemoteSettings { email, logo }
}

/// The `data` document, in the camelCase shape older clients read.
fn data_document(email: &EmailDeliveryConfig, logo: Option<&str>) -> Value {
    json!({
        "emailjsPublicKey": email.public_key,
        "emailjsServiceId": email.service_id,
        "emailjsTemplateId": email.template_id,
        "emailjsAccessToken": email.access_token,
        "senderName": email.sender_name,
        "logo": logo.unwrap_or_default(),
    })
}

pub fn email_payload(email: &EmailDeliveryConfig, logo: Option<&str>, now: &str) -> Map<String, Value> {
    let mut payload = fallback_payload(email, logo, now);
    payload.insert("emailjs_public_key".to_string(), Value::from(email.public_key.as_str()));
    payload.insert("emailjs_service_id".to_string(), Value::from(email.service_id.as_str()));
    payload.insert("emailjs_template_id".to_string(), Value::from(email.template_id.as_str()));
    payload.insert(
        "emailjs_access_token".to_string(),
        Value::from(email.access_token.as_str()),
    );
    payload.insert("sender_name".to_string(), Value::from(email.sender_name.as_str()));
    payload
}

pub fn logo_payload(email: &EmailDeliveryConfig, logo: &str, now: &str) -> Map<String, Value> {
    let mut payload = fallback_payload(email, Some(logo), now);
    payload.insert("logo".to_string(), Value::from(logo));
    payload.insert("logo_url".to_string(), Value::from(logo));
    payload
}

pub fn fallback_payload(email: &EmailDeliveryConfig, logo: Option<&str>, now: &str) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("id".to_string(), Value::from(SETTINGS_ROW_ID));
    payload.insert("data".to_string(), data_document(email, logo));
    payload.insert("updated_at".to_string(), Value::from(now));
    payload
}

/// A refused column, reported either by code or in the message.
fn is_column_error(error: &BackendError) -> bool {
    error.code() == Some("PGRST204")
        || error
            .message()
            .map(|m| m.contains("column"))
            .unwrap_or(false)
}

/// Upserts `payload`, retrying once with `fallback` on a column error.
///
/// Returns whether the fallback payload was used.
pub async fn save_settings(
    client: &BackendClient,
    payload: &Map<String, Value>,
    fallback: &Map<String, Value>,
) -> Result<bool, BackendError> {
    match client.upsert(SETTINGS_TABLE, payload, "id").await {
        Ok(()) => Ok(false),
        Err(e) if is_column_error(&e) => {
            tracing::warn!("Settings row lacks flat columns, saving data document only: {}", e);
            client.upsert(SETTINGS_TABLE, fallback, "id").await?;
            Ok(true)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> EmailDeliveryConfig {
        EmailDeliveryConfig {
            public_key: "pk".to_string(),
            service_id: "svc".to_string(),
            template_id: "tpl".to_string(),
            access_token: String::new(),
            sender_name: "Team".to_string(),
        }
    }

    #[test]
    fn test_logo_resolution_order() {
        let row = json!({"logo_url": "https://a/logo.png", "data": {"logo": "https://b/logo.png"}});
        assert_eq!(parse_settings_row(&row).logo.as_deref(), Some("https://a/logo.png"));

        let row = json!({"logo": "", "data": {"logo_url": "https://c/logo.png"}});
        assert_eq!(parse_settings_row(&row).logo.as_deref(), Some("https://c/logo.png"));

        assert_eq!(parse_settings_row(&json!({"id": 1})).logo, None);
    }

    #[test]
    fn test_email_from_data_document() {
        let row = json!({
            "id": 1,
            "data": {"emailjsPublicKey": "pk", "emailjsServiceId": "svc", "emailjsTemplateId": "tpl", "senderName": "Team", "logo": ""},
            "emailjs_public_key": "ignored",
        });
        assert_eq!(parse_settings_row(&row).email, Some(email()));
    }

    #[test]
    fn test_email_from_flat_columns() {
        let row = json!({
            "id": 1,
            "emailjs_public_key": "pk",
            "emailjs_service_id": "svc",
            "emailjs_template_id": "tpl",
            "sender_name": "Team",
        });
        assert_eq!(parse_settings_row(&row).email, Some(email()));
        assert_eq!(parse_settings_row(&json!({"id": 1})).email, None);
    }

    #[test]
    fn test_payload_shapes() {
        let now = "2026-01-01T00:00:00Z";
        let full = email_payload(&email(), Some("https://a/logo.png"), now);
        assert_eq!(full["id"], 1);
        assert_eq!(full["emailjs_service_id"], "svc");
        assert_eq!(full["data"]["logo"], "https://a/logo.png");

        let logo = logo_payload(&email(), "https://a/logo.png", now);
        assert_eq!(logo["logo_url"], "https://a/logo.png");
        assert!(!logo.contains_key("emailjs_public_key"));

        let fallback = fallback_payload(&email(), None, now);
        let mut keys: Vec<&str> = fallback.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["data", "id", "updated_at"]);
    }

    #[test]
    fn test_column_error_detection() {
        let by_code = BackendError::Api {
            status: 400,
            body: json!({"code": "PGRST204", "message": "x"}),
        };
        let by_message = BackendError::Api {
            status: 400,
            body: json!({"message": "column \"logo\" of relation \"app_settings\" does not exist"}),
        };
        let other = BackendError::Api {
            status: 401,
            body: json!({"message": "JWT expired"}),
        };
        assert!(is_column_error(&by_code));
        assert!(is_column_error(&by_message));
        assert!(!is_column_error(&other));
    }
}
