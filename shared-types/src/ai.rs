use crate::contact::{ContactCategory, ContactInput, SaveContactResponse, TagsInput};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Model answers use `null` for unknown fields as often as they leave them out.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields read off a business card. The model may leave any of them out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
#[serde(default)]
pub struct CardFields {
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub website: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub linkedin_url: String,
}

impl From<CardFields> for ContactInput {
    fn from(card: CardFields) -> Self {
        ContactInput {
            first_name: Some(card.first_name),
            last_name: Some(card.last_name),
            company: Some(card.company),
            title: Some(card.title),
            website: Some(card.website),
            email: Some(card.email),
            phone: Some(card.phone),
            linkedin_url: Some(card.linkedin_url),
            ..Default::default()
        }
    }
}

/// Direct contact details found for a person at a company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct EnrichedContact {
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sector: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub match_confidence: String,
}

impl From<EnrichedContact> for ContactInput {
    fn from(found: EnrichedContact) -> Self {
        ContactInput {
            first_name: Some(found.first_name),
            last_name: Some(found.last_name),
            company: Some(found.company),
            title: Some(found.title),
            sector: Some(found.sector),
            website: Some(found.website),
            email: Some(found.email),
            phone: Some(found.phone),
            notes: Some(found.notes),
            tags: Some(TagsInput::List(vec!["enriched".to_string()])),
            ..Default::default()
        }
    }
}

/// Web page cited by a grounded answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct ScanCardRequest {
    /// Raw base64 or a `data:` URL.
    pub image_base64: String,
    pub mime_type: Option<String>,
    /// When set, the extracted card is saved straight into this category.
    pub save_as: Option<ContactCategory>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ScanCardResponse {
    pub fields: CardFields,
    pub saved: Option<SaveContactResponse>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct EnrichRequest {
    pub text: String,
    #[serde(default)]
    pub grounded: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct EnrichmentResponse {
    pub data: EnrichedContact,
    pub sources: Vec<GroundingSource>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct EditImageRequest {
    pub image_base64: String,
    pub mime_type: Option<String>,
    pub prompt: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct EditImageResponse {
    /// `data:` URL of the edited image, or null when the model returned none.
    pub image: Option<String>,
}
