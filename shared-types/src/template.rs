use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Reusable email body from the template library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmailTemplate {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct TemplatesResponse {
    pub templates: Vec<EmailTemplate>,
}
