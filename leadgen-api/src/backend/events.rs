use super::{BackendClient, BackendError, Order, Query};
use extractors::record_normalizer::normalize_event;
use shared_types::{ContactId, Event};

pub const EVENTS_TABLE: &str = "events";

/// A contact's agenda, earliest first.
pub async fn list_events_for_contact(
    client: &BackendClient,
    contact_id: &ContactId,
) -> Result<Vec<Event>, BackendError> {
    let query = Query::new()
        .eq("contact_id", &contact_id.to_json())
        .order("start_time", Order::Ascending);

    let rows = client.select(EVENTS_TABLE, &query).await?;
    Ok(rows.iter().map(normalize_event).collect())
}
