use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Configuration for an API key
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ApiKeyConfig {
    pub name: String,
    pub key: Option<String>,
    pub is_configured: bool,
}

/// Email-delivery (EmailJS) credentials.
///
/// Older settings rows store these under camelCase keys, hence the aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmailDeliveryConfig {
    #[serde(default, alias = "emailjsPublicKey")]
    pub public_key: String,
    #[serde(default, alias = "emailjsServiceId")]
    pub service_id: String,
    #[serde(default, alias = "emailjsTemplateId")]
    pub template_id: String,
    #[serde(default, alias = "emailjsAccessToken")]
    pub access_token: String,
    #[serde(default, alias = "senderName")]
    pub sender_name: String,
}

impl EmailDeliveryConfig {
    pub fn is_configured(&self) -> bool {
        !self.public_key.trim().is_empty()
            && !self.service_id.trim().is_empty()
            && !self.template_id.trim().is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BackendStatus {
    pub url: Option<String>,
    pub key: Option<String>,
    pub is_configured: bool,
}

/// Response for settings endpoint
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingsResponse {
    pub config_file_path: String,
    pub backend: BackendStatus,
    pub email: EmailDeliveryConfig,
    pub logo: Option<String>,
    pub api_keys: Vec<ApiKeyConfig>,
}

/// Request to update API keys
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateApiKeysRequest {
    pub gemini_api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateBackendRequest {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateLogoRequest {
    /// Public URL or data URL; empty resets to the default mark.
    pub logo: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaveSettingsResponse {
    pub saved_locally: bool,
    pub synced_remotely: bool,
    pub used_fallback_payload: bool,
    pub remote_error: Option<String>,
}
