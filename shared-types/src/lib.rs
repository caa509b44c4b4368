use serde::{Deserialize, Serialize};

pub mod ai;
pub mod campaign;
pub mod contact;
pub mod event;
pub mod settings;
pub mod template;

pub use ai::{
    CardFields, EditImageRequest, EditImageResponse, EnrichRequest, EnrichedContact,
    EnrichmentResponse, GroundingSource, ScanCardRequest, ScanCardResponse,
};
pub use campaign::{
    CampaignContentResponse, CampaignFailure, GenerateCampaignRequest, ReportSummary,
    SendCampaignRequest, SendCampaignResponse,
};
pub use contact::{
    split_tags, Contact, ContactCategory, ContactId, ContactInput, ContactStatus,
    ContactsResponse, ImportContactsResponse, SaveContactResponse, TagsInput,
};
pub use event::{Event, EventsResponse};
pub use settings::{
    ApiKeyConfig, BackendStatus, EmailDeliveryConfig, SaveSettingsResponse, SettingsResponse,
    UpdateApiKeysRequest, UpdateBackendRequest, UpdateLogoRequest,
};
pub use template::{CreateTemplateRequest, EmailTemplate, TemplatesResponse};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
