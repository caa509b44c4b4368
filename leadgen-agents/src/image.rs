use crate::error::AiError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Base64 image payload as exchanged with the model.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    /// Accepts raw base64 or a `data:<mime>;base64,<payload>` URL.
    pub fn from_input(input: &str, fallback_mime: &str) -> Result<Self, AiError> {
        let input = input.trim();

        let (mime_type, payload) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| AiError::InvalidImage("data URL has no payload".to_string()))?;
                let mime = header
                    .strip_suffix(";base64")
                    .ok_or_else(|| AiError::InvalidImage("data URL is not base64".to_string()))?;
                (mime.to_string(), payload)
            }
            None => (fallback_mime.to_string(), input),
        };

        let data: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        if data.is_empty() {
            return Err(AiError::InvalidImage("image is empty".to_string()));
        }
        STANDARD
            .decode(&data)
            .map_err(|e| AiError::InvalidImage(e.to_string()))?;

        Ok(Self { mime_type, data })
    }

    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes, mime_for_path(path)))
    }

    pub fn decode(&self) -> Result<Vec<u8>, AiError> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| AiError::InvalidImage(e.to_string()))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}
