use serde::Serialize;
use serde_json::{Map, Value};
use shared_types::{Contact, EmailDeliveryConfig};
use std::time::Duration;
use thiserror::Error;

pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Error)]
pub enum EmailDeliveryError {
    #[error("Email delivery is not configured (public key, service id and template id are required)")]
    NotConfigured,

    #[error("Email delivery request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Email service returned {status}: {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "is_blank")]
    access_token: &'a str,
    template_params: &'a Map<String, Value>,
}

fn is_blank(value: &&str) -> bool {
    value.is_empty()
}

pub struct EmailJsClient {
    http: reqwest::Client,
    config: EmailDeliveryConfig,
    endpoint: String,
}

impl EmailJsClient {
    pub fn new(config: EmailDeliveryConfig) -> Result<Self, EmailDeliveryError> {
        Self::with_endpoint(config, EMAILJS_SEND_URL)
    }

    pub fn with_endpoint(
        config: EmailDeliveryConfig,
        endpoint: impl Into<String>,
    ) -> Result<Self, EmailDeliveryError> {
        if !config.is_configured() {
            return Err(EmailDeliveryError::NotConfigured);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            config,
            endpoint: endpoint.into(),
        })
    }

    pub fn sender_name(&self) -> &str {
        &self.config.sender_name
    }

    pub async fn send(&self, template_params: &Map<String, Value>) -> Result<(), EmailDeliveryError> {
        let body = SendRequest {
            service_id: self.config.service_id.trim(),
            template_id: self.config.template_id.trim(),
            user_id: self.config.public_key.trim(),
            access_token: self.config.access_token.trim(),
            template_params,
        };

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmailDeliveryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

/// Replaces `{{field}}` placeholders with the contact's values. Unknown placeholders stay.
pub fn render(template: &str, contact: &Contact) -> String {
    let replacements = [
        ("first_name", contact.first_name.as_str()),
        ("last_name", contact.last_name.as_str()),
        ("company", contact.company.as_str()),
        ("title", contact.title.as_str()),
        ("email", contact.email.as_str()),
        ("sector", contact.sector.as_str()),
    ];

    let mut rendered = template.replace("{{full_name}}", &contact.full_name());
    for (field, value) in replacements {
        rendered = rendered.replace(&format!("{{{{{}}}}}", field), value);
    }
    rendered
}

/// Parameters handed to the EmailJS template for one recipient.
pub fn template_params(contact: &Contact, subject: &str, body: &str, sender_name: &str) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("to_email".to_string(), Value::from(contact.email.as_str()));
    params.insert("to_name".to_string(), Value::from(contact.full_name()));
    params.insert("first_name".to_string(), Value::from(contact.first_name.as_str()));
    params.insert("company".to_string(), Value::from(contact.company.as_str()));
    params.insert("from_name".to_string(), Value::from(sender_name));
    params.insert("subject".to_string(), Value::from(render(subject, contact)));
    params.insert("message".to_string(), Value::from(render(body, contact)));
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> Contact {
        Contact {
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            company: "Acme Corp".to_string(),
            email: "jean@acme.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_placeholders() {
        assert_eq!(
            render("Bonjour {{first_name}} de {{company}} ({{full_name}}) {{unknown}}", &contact()),
            "Bonjour Jean de Acme Corp (Jean Dupont) {{unknown}}"
        );
    }

    #[test]
    fn test_template_params() {
        let params = template_params(&contact(), "Hello {{first_name}}", "Body", "Team");
        assert_eq!(params["to_email"], "jean@acme.com");
        assert_eq!(params["to_name"], "Jean Dupont");
        assert_eq!(params["subject"], "Hello Jean");
        assert_eq!(params["from_name"], "Team");
    }

    #[test]
    fn test_unconfigured_client_is_rejected() {
        assert!(matches!(
            EmailJsClient::new(EmailDeliveryConfig::default()),
            Err(EmailDeliveryError::NotConfigured)
        ));
    }

    #[test]
    fn test_access_token_omitted_when_empty() {
        let params = Map::new();
        let body = SendRequest {
            service_id: "svc",
            template_id: "tpl",
            user_id: "pk",
            access_token: "",
            template_params: &params,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("accessToken").is_none());
        assert_eq!(json["user_id"], "pk");
    }
}
