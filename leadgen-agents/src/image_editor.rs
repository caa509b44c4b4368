use crate::client::{CompletionRequest, LlmClient, OutputFormat};
use crate::error::AiError;
use crate::image::InlineImage;
use std::sync::Arc;

/// Applies a text instruction to a profile picture.
pub struct ImageEditor {
    llm_client: Arc<dyn LlmClient>,
    model: String,
}

impl ImageEditor {
    pub fn new(llm_client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm_client,
            model: model.into(),
        }
    }

    /// Returns the first image the model produced, or `None` when it only answered in text.
    pub async fn edit(&self, image: InlineImage, prompt: &str) -> Result<Option<InlineImage>, AiError> {
        let request = CompletionRequest::new(&self.model)
            .image(image)
            .text(prompt.trim())
            .output(OutputFormat::TextAndImage);

        let response = self.llm_client.complete(request).await?;
        if response.images.is_empty() {
            if let Some(text) = response.text.as_deref() {
                tracing::info!("Image edit returned text only: {}", text);
            }
        }

        Ok(response.images.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CompletionResponse;
    use crate::testing::ScriptedClient;

    fn photo() -> InlineImage {
        InlineImage {
            mime_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
        }
    }

    #[tokio::test]
    async fn test_returns_first_image() {
        let edited = InlineImage {
            mime_type: "image/png".to_string(),
            data: "d29ybGQ=".to_string(),
        };
        let client = Arc::new(ScriptedClient::new(CompletionResponse {
            text: None,
            images: vec![edited.clone()],
            sources: Vec::new(),
        }));
        let editor = ImageEditor::new(client.clone(), "gemini-2.5-flash-image");

        let result = editor.edit(photo(), "add a blue background").await.unwrap();
        assert_eq!(result, Some(edited));
        assert_eq!(client.last().output, OutputFormat::TextAndImage);
    }

    #[tokio::test]
    async fn test_text_only_answer_yields_none() {
        let client = Arc::new(ScriptedClient::with_text("I can't edit that."));
        let editor = ImageEditor::new(client, "gemini-2.5-flash-image");
        assert_eq!(editor.edit(photo(), "make it pop").await.unwrap(), None);
    }
}
