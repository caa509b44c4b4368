use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Gemini API key is missing")]
    MissingApiKey,

    #[error("Request to the AI service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("The model returned no content")]
    EmptyResponse,

    #[error("Could not decode model output: {0}")]
    Decode(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

impl AiError {
    /// Errors the caller can fix by changing settings or input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AiError::MissingApiKey | AiError::InvalidImage(_) | AiError::Api { status: 400..=403, .. }
        )
    }
}
