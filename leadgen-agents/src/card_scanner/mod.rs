mod system_prompt;

use crate::client::{CompletionRequest, LlmClient, OutputFormat};
use crate::error::AiError;
use crate::gemini::response_schema;
use crate::image::InlineImage;
use crate::output::parse_json;
use shared_types::CardFields;
use std::sync::Arc;

/// Reads contact fields off a photographed business card.
pub struct CardScanner {
    llm_client: Arc<dyn LlmClient>,
    model: String,
}

impl CardScanner {
    pub fn new(llm_client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm_client,
            model: model.into(),
        }
    }

    pub async fn scan(&self, image: InlineImage) -> Result<CardFields, AiError> {
        let request = CompletionRequest::new(&self.model)
            .image(image)
            .text(system_prompt::CARD_INSTRUCTION)
            .output(OutputFormat::Json {
                schema: response_schema::<CardFields>(),
            });

        let response = self.llm_client.complete(request).await?;

        // An empty answer means nothing was legible, not a failure.
        let Some(text) = response.text.as_deref().filter(|t| !t.trim().is_empty()) else {
            tracing::info!("Card scan returned no text");
            return Ok(CardFields::default());
        };

        let mut fields: CardFields = parse_json(text)?;
        tidy(&mut fields);
        Ok(fields)
    }
}

fn tidy(fields: &mut CardFields) {
    for value in [
        &mut fields.first_name,
        &mut fields.last_name,
        &mut fields.company,
        &mut fields.title,
        &mut fields.phone,
        &mut fields.website,
        &mut fields.linkedin_url,
    ] {
        *value = value.trim().to_string();
    }
    fields.email = fields.email.trim().to_lowercase();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ContentPart;
    use crate::testing::ScriptedClient;

    fn card_image() -> InlineImage {
        InlineImage {
            mime_type: "image/jpeg".to_string(),
            data: "aGVsbG8=".to_string(),
        }
    }

    #[tokio::test]
    async fn test_scan_parses_fields() {
        let client = Arc::new(ScriptedClient::with_text(
            r#"{"first_name":" Jean ","last_name":"Dupont","company":"Acme Corp","email":"Jean@Acme.COM"}"#,
        ));
        let scanner = CardScanner::new(client.clone(), "gemini-2.5-flash");

        let fields = scanner.scan(card_image()).await.unwrap();
        assert_eq!(fields.first_name, "Jean");
        assert_eq!(fields.email, "jean@acme.com");
        assert_eq!(fields.phone, "");

        let request = client.last();
        assert_eq!(request.model, "gemini-2.5-flash");
        assert!(matches!(request.parts[0], ContentPart::Image(_)));
        assert!(matches!(request.output, OutputFormat::Json { .. }));
    }

    #[tokio::test]
    async fn test_empty_answer_yields_empty_card() {
        let client = Arc::new(ScriptedClient::with_text("  "));
        let scanner = CardScanner::new(client, "gemini-2.5-flash");
        assert_eq!(scanner.scan(card_image()).await.unwrap(), CardFields::default());
    }

    #[tokio::test]
    async fn test_non_json_answer_is_an_error() {
        let client = Arc::new(ScriptedClient::with_text("I cannot read this card."));
        let scanner = CardScanner::new(client, "gemini-2.5-flash");
        assert!(matches!(
            scanner.scan(card_image()).await,
            Err(AiError::Decode(_))
        ));
    }
}
