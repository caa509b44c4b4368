pub mod campaign_writer;
pub mod card_scanner;
pub mod client;
pub mod enricher;
pub mod error;
pub mod gemini;
pub mod image;
pub mod image_editor;
pub mod output;

#[cfg(test)]
mod testing;

pub use campaign_writer::CampaignWriter;
pub use card_scanner::CardScanner;
pub use client::{CompletionRequest, CompletionResponse, ContentPart, LlmClient, OutputFormat};
pub use enricher::{Enricher, Enrichment};
pub use error::AiError;
pub use gemini::{GeminiClient, GEMINI_IMAGE_MODEL_ID, GEMINI_TEXT_MODEL_ID};
pub use image::InlineImage;
pub use image_editor::ImageEditor;
