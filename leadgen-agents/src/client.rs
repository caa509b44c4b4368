use crate::error::AiError;
use crate::image::InlineImage;
use async_trait::async_trait;
use serde_json::Value;
use shared_types::GroundingSource;

/// One piece of user content sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    Image(InlineImage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputFormat {
    Text,
    /// JSON constrained by a schema already in the provider's dialect.
    Json { schema: Value },
    TextAndImage,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: Option<String>,
    pub parts: Vec<ContentPart>,
    pub output: OutputFormat,
    /// Let the model search the web and report the pages it relied on.
    pub grounded: bool,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            parts: Vec::new(),
            output: OutputFormat::Text,
            grounded: false,
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(ContentPart::Text(text.into()));
        self
    }

    pub fn image(mut self, image: InlineImage) -> Self {
        self.parts.push(ContentPart::Image(image));
        self
    }

    pub fn output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn grounded(mut self, grounded: bool) -> Self {
        self.grounded = grounded;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    pub text: Option<String>,
    pub images: Vec<InlineImage>,
    pub sources: Vec<GroundingSource>,
}

impl CompletionResponse {
    pub fn require_text(&self) -> Result<&str, AiError> {
        self.text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError>;
}
