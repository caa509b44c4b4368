use crate::contact::{ContactCategory, ContactStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct GenerateCampaignRequest {
    pub prospect_name: String,
    pub company: String,
    pub topic: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CampaignContentResponse {
    pub content: String,
}

/// Mass send to one category. `subject` and `body` accept `{{first_name}}`-style
/// placeholders; a library template can stand in for both.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct SendCampaignRequest {
    pub category: ContactCategory,
    pub status: Option<ContactStatus>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub template_id: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CampaignFailure {
    pub email: String,
    pub error: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SendCampaignResponse {
    pub sent: usize,
    pub skipped_without_email: usize,
    pub failures: Vec<CampaignFailure>,
}

/// Dashboard counters
#[derive(Debug, Default, Serialize, TS)]
#[ts(export)]
pub struct ReportSummary {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub with_email: usize,
}
