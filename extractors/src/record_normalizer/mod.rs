//! Reconciles stored rows written under different naming schemes into canonical shapes.
//!
//! All functions here are pure and total: any JSON value is accepted, missing or
//! unusable fields come back as empty strings or empty lists.

pub mod aliases;

use serde_json::{Map, Value};
use shared_types::{split_tags, Contact, ContactCategory, EmailTemplate, Event};

pub use aliases::write_alias_of;

pub fn normalize_contact(raw: &Value) -> Contact {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);

    let category = first_text(record, aliases::CATEGORY).to_lowercase();

    Contact {
        id: first_text(record, aliases::ID),
        first_name: first_text(record, aliases::FIRST_NAME),
        last_name: first_text(record, aliases::LAST_NAME),
        company: first_text(record, aliases::COMPANY),
        title: first_text(record, aliases::TITLE),
        sector: first_text(record, aliases::SECTOR),
        website: first_text(record, aliases::WEBSITE),
        address: first_text(record, aliases::ADDRESS),
        email: first_text(record, aliases::EMAIL).to_lowercase(),
        phone: first_text(record, aliases::PHONE),
        linkedin_url: first_text(record, aliases::LINKEDIN_URL),
        category: if category.is_empty() {
            ContactCategory::Prospect.as_str().to_string()
        } else {
            category
        },
        status: first_text(record, aliases::STATUS),
        tags: tags_of(record),
        notes: first_text(record, aliases::NOTES),
        created_at: first_text(record, aliases::CREATED_AT),
    }
}

/// Normalizes every row and keeps those of one category, preserving input order.
pub fn contacts_in_category(rows: &[Value], category: ContactCategory) -> Vec<Contact> {
    rows.iter()
        .map(normalize_contact)
        .filter(|c| c.is_in(category))
        .collect()
}

pub fn normalize_event(raw: &Value) -> Event {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);

    Event {
        id: first_text(record, aliases::ID),
        contact_id: first_text(record, aliases::event::CONTACT_ID),
        title: first_text(record, aliases::event::TITLE),
        description: first_text(record, aliases::event::DESCRIPTION),
        location: first_text(record, aliases::event::LOCATION),
        start_time: first_text(record, aliases::event::START_TIME),
        end_time: first_text(record, aliases::event::END_TIME),
    }
}

pub fn normalize_template(raw: &Value) -> EmailTemplate {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);

    EmailTemplate {
        id: first_text(record, aliases::ID),
        name: first_text(record, aliases::template::NAME),
        subject: first_text(record, aliases::template::SUBJECT),
        body: first_text(record, aliases::template::BODY),
        created_at: first_text(record, aliases::CREATED_AT),
    }
}

/// Trimmed text of the first alias holding a usable value, or an empty string.
pub fn first_text(record: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(text_of)
        .unwrap_or_default()
}

/// `null`, `false`, `0` and blank strings carry no value.
fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Bool(false) => return None,
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                return None;
            }
            n.to_string()
        }
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(text_of)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn tags_of(record: &Map<String, Value>) -> Vec<String> {
    match aliases::TAGS.iter().find_map(|key| record.get(*key)) {
        Some(Value::Array(items)) => items.iter().filter_map(text_of).collect(),
        Some(other) => text_of(other).map(|t| split_tags(&t)).unwrap_or_default(),
        None => Vec::new(),
    }
}
