use crate::client::{CompletionRequest, LlmClient};
use crate::error::AiError;
use std::sync::Arc;

/// Drafts short personalized outreach emails.
pub struct CampaignWriter {
    llm_client: Arc<dyn LlmClient>,
    model: String,
}

impl CampaignWriter {
    pub fn new(llm_client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm_client,
            model: model.into(),
        }
    }

    pub async fn write(
        &self,
        prospect_name: &str,
        company: &str,
        topic: &str,
    ) -> Result<String, AiError> {
        let prompt = format!(
            "Write a professional personalized outreach email to {} at {} about {}. \
             Keep it concise and persuasive.",
            prospect_name.trim(),
            company.trim(),
            topic.trim()
        );

        let response = self
            .llm_client
            .complete(CompletionRequest::new(&self.model).text(prompt))
            .await?;

        Ok(response.require_text()?.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CompletionResponse, ContentPart};
    use crate::testing::ScriptedClient;

    #[tokio::test]
    async fn test_prompt_names_prospect_company_and_topic() {
        let client = Arc::new(ScriptedClient::with_text("\nDear Jane,\n...\n"));
        let writer = CampaignWriter::new(client.clone(), "gemini-2.5-flash");

        let email = writer.write("Jane Doe", "Acme", "our Q3 offer").await.unwrap();
        assert_eq!(email, "Dear Jane,\n...");

        let request = client.last();
        let ContentPart::Text(prompt) = &request.parts[0] else {
            panic!("expected a text prompt");
        };
        assert!(prompt.contains("Jane Doe at Acme about our Q3 offer"));
    }

    #[tokio::test]
    async fn test_empty_answer_is_an_error() {
        let client = Arc::new(ScriptedClient::new(CompletionResponse::default()));
        let writer = CampaignWriter::new(client, "gemini-2.5-flash");
        assert!(matches!(
            writer.write("Jane", "Acme", "x").await,
            Err(AiError::EmptyResponse)
        ));
    }
}
