use crate::client::{CompletionRequest, CompletionResponse, LlmClient};
use crate::error::AiError;
use async_trait::async_trait;
use std::sync::Mutex;

/// Returns a fixed response and remembers the last request it saw.
pub struct ScriptedClient {
    response: CompletionResponse,
    pub last_request: Mutex<Option<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new(response: CompletionResponse) -> Self {
        Self {
            response,
            last_request: Mutex::new(None),
        }
    }

    pub fn with_text(text: &str) -> Self {
        Self::new(CompletionResponse {
            text: Some(text.to_string()),
            ..Default::default()
        })
    }

    pub fn last(&self) -> CompletionRequest {
        self.last_request
            .lock()
            .unwrap()
            .clone()
            .expect("no request was sent")
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        *self.last_request.lock().unwrap() = Some(request);
        Ok(self.response.clone())
    }
}
