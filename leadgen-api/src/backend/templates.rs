use super::{on_first_table, BackendClient, BackendError, Order, Query};
use extractors::record_normalizer::normalize_template;
use serde_json::{Map, Value};
use shared_types::{CreateTemplateRequest, EmailTemplate};

/// The library table has gone by both names.
pub const TEMPLATE_TABLES: &[&str] = &["email_templates", "templates"];

pub async fn list_templates(client: &BackendClient) -> Result<Vec<EmailTemplate>, BackendError> {
    let query = Query::new().order("created_at", Order::Descending);
    let (_, rows) = on_first_table(TEMPLATE_TABLES, |table| client.select(table, &query)).await?;
    Ok(rows.iter().map(normalize_template).collect())
}

pub async fn get_template(client: &BackendClient, id: &str) -> Result<EmailTemplate, BackendError> {
    let query = Query::new().eq("id", &Value::from(id));
    let (_, row) =
        on_first_table(TEMPLATE_TABLES, |table| client.maybe_single(table, &query)).await?;
    row.as_ref()
        .map(normalize_template)
        .ok_or(BackendError::NotFound)
}

pub async fn create_template(
    client: &BackendClient,
    request: CreateTemplateRequest,
) -> Result<EmailTemplate, BackendError> {
    let payload = template_payload(request);
    let rows = [payload];
    let (table, inserted) =
        on_first_table(TEMPLATE_TABLES, |table| client.insert(table, &rows)).await?;
    tracing::info!("Saved email template to '{}'", table);

    // `return=representation` echoes the row; fall back to what was sent.
    let row = inserted
        .into_iter()
        .next()
        .unwrap_or_else(|| Value::Object(rows[0].clone()));
    Ok(normalize_template(&row))
}

pub async fn delete_template(client: &BackendClient, id: &str) -> Result<(), BackendError> {
    let query = Query::new().eq("id", &Value::from(id));
    on_first_table(TEMPLATE_TABLES, |table| client.delete(table, &query)).await?;
    Ok(())
}

fn template_payload(request: CreateTemplateRequest) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("name".to_string(), Value::from(request.name.trim()));
    payload.insert(
        "subject".to_string(),
        Value::from(request.subject.unwrap_or_default().trim()),
    );
    payload.insert("body".to_string(), Value::from(request.body));
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_payload() {
        let payload = template_payload(CreateTemplateRequest {
            name: " Relance ".to_string(),
            subject: None,
            body: "Bonjour {{first_name}},".to_string(),
        });
        assert_eq!(payload["name"], "Relance");
        assert_eq!(payload["subject"], "");
        assert_eq!(payload["body"], "Bonjour {{first_name}},");
    }
}
