mod system_prompt;

use crate::client::{CompletionRequest, LlmClient, OutputFormat};
use crate::error::AiError;
use crate::gemini::response_schema;
use crate::output::parse_json;
use shared_types::{EnrichedContact, GroundingSource};
use std::sync::Arc;

pub use system_prompt::user_prompt;

/// Turns a free-text hint ("Jane Doe, CFO at Acme") into a structured contact.
pub struct Enricher {
    llm_client: Arc<dyn LlmClient>,
    model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub data: EnrichedContact,
    /// Pages the model cited. Always empty for ungrounded calls.
    pub sources: Vec<GroundingSource>,
}

impl Enricher {
    pub fn new(llm_client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm_client,
            model: model.into(),
        }
    }

    pub async fn enrich(&self, text: &str, grounded: bool) -> Result<Enrichment, AiError> {
        if text.trim().is_empty() {
            return Err(AiError::Decode("nothing to enrich".to_string()));
        }

        let request = if grounded {
            CompletionRequest::new(&self.model)
                .system(format!(
                    "{}\n\n{}",
                    system_prompt::ENRICHER_SYSTEM_PROMPT,
                    system_prompt::GROUNDED_OUTPUT_INSTRUCTIONS
                ))
                .text(user_prompt(text))
                .grounded(true)
        } else {
            CompletionRequest::new(&self.model)
                .system(system_prompt::ENRICHER_SYSTEM_PROMPT)
                .text(user_prompt(text))
                .output(OutputFormat::Json {
                    schema: response_schema::<EnrichedContact>(),
                })
        };

        let response = self.llm_client.complete(request).await?;
        let data: EnrichedContact = parse_json(response.require_text()?)?;

        tracing::info!(
            company = %data.company,
            confidence = %data.match_confidence,
            sources = response.sources.len(),
            "Enriched contact"
        );

        Ok(Enrichment {
            data,
            sources: response.sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CompletionResponse;
    use crate::testing::ScriptedClient;

    const ANSWER: &str = r#"{"first_name":"Jane","last_name":"Doe","company":"Acme","email":"jane.doe@acme.com","match_confidence":"medium"}"#;

    #[tokio::test]
    async fn test_schema_constrained_enrichment() {
        let client = Arc::new(ScriptedClient::with_text(ANSWER));
        let enricher = Enricher::new(client.clone(), "gemini-2.5-flash");

        let result = enricher.enrich("Jane Doe, CFO at Acme", false).await.unwrap();
        assert_eq!(result.data.email, "jane.doe@acme.com");
        assert_eq!(result.data.phone, "");
        assert!(result.sources.is_empty());

        let request = client.last();
        assert!(!request.grounded);
        assert!(matches!(request.output, OutputFormat::Json { .. }));
    }

    #[tokio::test]
    async fn test_grounded_enrichment_keeps_sources() {
        let client = Arc::new(ScriptedClient::new(CompletionResponse {
            text: Some(format!("```json\n{}\n```", ANSWER)),
            images: Vec::new(),
            sources: vec![GroundingSource {
                title: "acme.com".to_string(),
                uri: "https://acme.com/team".to_string(),
            }],
        }));
        let enricher = Enricher::new(client.clone(), "gemini-2.5-flash");

        let result = enricher.enrich("Jane Doe at Acme", true).await.unwrap();
        assert_eq!(result.data.last_name, "Doe");
        assert_eq!(result.sources.len(), 1);

        let request = client.last();
        assert!(request.grounded);
        assert_eq!(request.output, OutputFormat::Text);
    }

    #[tokio::test]
    async fn test_grounded_answer_with_null_fields() {
        let answer = r#"```json
{"first_name":"Jane","last_name":"Doe","company":"Acme","title":null,"email":null,"phone":null,"website":"https://acme.com","match_confidence":"low"}
```"#;
        let client = Arc::new(ScriptedClient::with_text(answer));
        let enricher = Enricher::new(client, "gemini-2.5-flash");

        let result = enricher.enrich("Jane Doe at Acme", true).await.unwrap();
        assert_eq!(result.data.company, "Acme");
        assert_eq!(result.data.email, "");
        assert_eq!(result.data.title, "");
        assert_eq!(result.data.website, "https://acme.com");
    }

    #[tokio::test]
    async fn test_missing_required_field_is_an_error() {
        let client = Arc::new(ScriptedClient::with_text(r#"{"first_name":"Jane"}"#));
        let enricher = Enricher::new(client, "gemini-2.5-flash");
        assert!(enricher.enrich("Jane", false).await.is_err());
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let client = Arc::new(ScriptedClient::with_text(ANSWER));
        let enricher = Enricher::new(client, "gemini-2.5-flash");
        assert!(matches!(
            enricher.enrich("   ", false).await,
            Err(AiError::Decode(_))
        ));
    }
}
