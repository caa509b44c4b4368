//! JSON bodies of the `generateContent` endpoint.

use crate::client::{CompletionRequest, CompletionResponse, ContentPart, OutputFormat};
use crate::image::InlineImage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::GroundingSource;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
    #[serde(default, skip_serializing)]
    pub thought: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
pub struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: Option<String>,
}

impl GenerateContentRequest {
    pub fn from_completion(request: &CompletionRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => Part {
                    text: Some(text.clone()),
                    ..Default::default()
                },
                ContentPart::Image(image) => Part {
                    inline_data: Some(Blob {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    }),
                    ..Default::default()
                },
            })
            .collect();

        let system_instruction = request.system.as_ref().map(|system| Content {
            role: None,
            parts: vec![Part {
                text: Some(system.clone()),
                ..Default::default()
            }],
        });

        let generation_config = match &request.output {
            OutputFormat::Text => None,
            OutputFormat::Json { schema } => Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema.clone()),
                ..Default::default()
            }),
            OutputFormat::TextAndImage => Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                ..Default::default()
            }),
        };

        let tools = if request.grounded {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            system_instruction,
            generation_config,
            tools,
        }
    }
}

impl GenerateContentResponse {
    /// Flattens the first candidate: joined text, inline images and cited pages.
    pub fn into_completion(self) -> CompletionResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return CompletionResponse::default();
        };

        let mut text = String::new();
        let mut images = Vec::new();

        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if part.thought == Some(true) {
                continue;
            }
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(blob) = part.inline_data {
                images.push(InlineImage {
                    mime_type: blob.mime_type,
                    data: blob.data,
                });
            }
        }

        let mut sources: Vec<GroundingSource> = Vec::new();
        let chunks = candidate
            .grounding_metadata
            .map(|m| m.grounding_chunks)
            .unwrap_or_default();
        for web in chunks.into_iter().filter_map(|c| c.web) {
            let Some(uri) = web.uri else { continue };
            if sources.iter().any(|s| s.uri == uri) {
                continue;
            }
            sources.push(GroundingSource {
                title: web.title.unwrap_or_else(|| uri.clone()),
                uri,
            });
        }

        CompletionResponse {
            text: if text.is_empty() { None } else { Some(text) },
            images,
            sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest::new("gemini-2.5-flash")
            .system("Be brief")
            .image(InlineImage {
                mime_type: "image/jpeg".to_string(),
                data: "aGVsbG8=".to_string(),
            })
            .text("Read this card")
            .output(OutputFormat::Json {
                schema: json!({ "type": "OBJECT" }),
            })
            .grounded(true);

        let body = serde_json::to_value(GenerateContentRequest::from_completion(&request)).unwrap();

        assert_eq!(
            body["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(body["contents"][0]["parts"][1]["text"], "Read this card");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert_eq!(body["tools"][0], json!({ "googleSearch": {} }));
    }

    #[test]
    fn test_plain_text_request_has_no_config_or_tools() {
        let request = CompletionRequest::new("gemini-2.5-flash").text("Hello");
        let body = serde_json::to_value(GenerateContentRequest::from_completion(&request)).unwrap();
        assert!(body.get("generationConfig").is_none());
        assert!(body.get("tools").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_response_flattening() {
        let raw = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "{\"first_name\":" },
                    { "text": "\"Ana\"}" },
                    { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } }
                ]},
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://a.example", "title": "A" } },
                    { "web": { "uri": "https://a.example", "title": "A again" } },
                    { "web": { "uri": "https://b.example" } },
                    { "retrievedContext": {} }
                ]}
            }]
        });

        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let completion = response.into_completion();

        assert_eq!(completion.text.as_deref(), Some("{\"first_name\":\"Ana\"}"));
        assert_eq!(completion.images.len(), 1);
        assert_eq!(completion.sources.len(), 2);
        assert_eq!(completion.sources[1].title, "https://b.example");
    }

    #[test]
    fn test_empty_response() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        let completion = response.into_completion();
        assert!(completion.text.is_none());
        assert!(completion.require_text().is_err());
    }
}
