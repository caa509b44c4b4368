use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Canonical in-memory contact, whatever naming scheme the stored row used.
///
/// Every text field is present; an absent stored value becomes an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub title: String,
    pub sector: String,
    pub website: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub linkedin_url: String,
    pub category: String,
    pub status: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub created_at: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_in(&self, category: ContactCategory) -> bool {
        self.category == category.as_str()
    }

    /// Case-insensitive match on "first last" or company, like the list search box.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        format!("{} {}", self.first_name, self.last_name)
            .to_lowercase()
            .contains(&term)
            || self.company.to_lowercase().contains(&term)
    }
}

/// Partition between prospects and members
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ContactCategory {
    #[default]
    Prospect,
    Member,
}

impl ContactCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactCategory::Prospect => "prospect",
            ContactCategory::Member => "member",
        }
    }

    pub fn default_status(&self) -> ContactStatus {
        match self {
            ContactCategory::Prospect => ContactStatus::New,
            ContactCategory::Member => ContactStatus::Active,
        }
    }
}

impl fmt::Display for ContactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prospect" | "prospects" => Ok(ContactCategory::Prospect),
            "member" | "members" | "membre" | "membres" => Ok(ContactCategory::Member),
            other => Err(format!("Unknown contact category: {}", other)),
        }
    }
}

/// Fixed status vocabulary. Deserialization goes through `FromStr`, so request bodies
/// accept the same spellings as CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
pub enum ContactStatus {
    New,
    Contacted,
    Interested,
    Closed,
    Active,
    Lost,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 6] = [
        ContactStatus::New,
        ContactStatus::Contacted,
        ContactStatus::Interested,
        ContactStatus::Closed,
        ContactStatus::Active,
        ContactStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "New",
            ContactStatus::Contacted => "Contacted",
            ContactStatus::Interested => "Interested",
            ContactStatus::Closed => "Closed",
            ContactStatus::Active => "Active",
            ContactStatus::Lost => "Lost",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContactStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" | "nouveau" => Ok(ContactStatus::New),
            "contacted" | "contacté" | "contacte" => Ok(ContactStatus::Contacted),
            "interested" | "intéressé" | "interesse" => Ok(ContactStatus::Interested),
            "closed" | "clôturé" | "cloture" | "fermé" | "ferme" => Ok(ContactStatus::Closed),
            "active" | "actif" => Ok(ContactStatus::Active),
            "lost" | "perdu" => Ok(ContactStatus::Lost),
            other => Err(format!("Unknown contact status: {}", other)),
        }
    }
}

/// Stored identifier whose column type is not known ahead of time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactId {
    Numeric(i64),
    Text(String),
}

impl ContactId {
    /// Only plain integers are numeric. Anything with a dash (UUIDs), decimals and blank
    /// input stay text.
    pub fn infer(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.contains('-') {
            return ContactId::Text(raw.to_string());
        }
        match raw.parse::<i64>() {
            Ok(n) => ContactId::Numeric(n),
            Err(_) => ContactId::Text(raw.to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ContactId::Numeric(n) => Value::from(*n),
            ContactId::Text(s) => Value::from(s.clone()),
        }
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactId::Numeric(n) => write!(f, "{}", n),
            ContactId::Text(s) => f.write_str(s),
        }
    }
}

/// Tags arrive either as a list or as one comma-joined string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Joined(String),
}

impl TagsInput {
    pub fn into_list(self) -> Vec<String> {
        match self {
            TagsInput::List(items) => clean_tags(items.iter().map(String::as_str)),
            TagsInput::Joined(joined) => split_tags(&joined),
        }
    }
}

/// Splits a comma-joined tag string into trimmed, non-empty tags.
pub fn split_tags(joined: &str) -> Vec<String> {
    clean_tags(joined.split(','))
}

fn clean_tags<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body of a create or update request. Absent and blank fields are stored as null.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub sector: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub address: Option<String>,
    pub status: Option<ContactStatus>,
    pub tags: Option<TagsInput>,
    pub notes: Option<String>,
}

impl ContactInput {
    /// Builds the snake_case column payload for a new contact. A missing status takes the
    /// category's default.
    pub fn into_payload(self, category: ContactCategory) -> Map<String, Value> {
        let (mut payload, status) = self.into_columns();
        let status = status.unwrap_or_else(|| category.default_status());
        payload.insert("status".to_string(), Value::from(status.as_str()));
        payload.insert("category".to_string(), Value::from(category.as_str()));
        payload
    }

    /// Payload for an update. Category and status are only written when given, so the
    /// stored ones survive an edit that does not name them.
    pub fn into_update_payload(self, category: Option<ContactCategory>) -> Map<String, Value> {
        let (mut payload, status) = self.into_columns();
        if let Some(status) = status {
            payload.insert("status".to_string(), Value::from(status.as_str()));
        }
        if let Some(category) = category {
            payload.insert("category".to_string(), Value::from(category.as_str()));
        }
        payload
    }

    fn into_columns(self) -> (Map<String, Value>, Option<ContactStatus>) {
        let mut payload = Map::new();

        let text_fields = [
            ("first_name", self.first_name),
            ("last_name", self.last_name),
            ("company", self.company),
            ("title", self.title),
            ("sector", self.sector),
            ("website", self.website),
            ("email", self.email.map(|e| e.to_lowercase())),
            ("phone", self.phone),
            ("linkedin_url", self.linkedin_url),
            ("address", self.address),
        ];
        for (column, value) in text_fields {
            payload.insert(column.to_string(), blank_to_null(value));
        }

        let tags = self.tags.map(TagsInput::into_list).unwrap_or_default();
        payload.insert("tags".to_string(), Value::from(tags));

        payload.insert("notes".to_string(), blank_to_null(self.notes));

        (payload, self.status)
    }
}

fn blank_to_null(value: Option<String>) -> Value {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Value::String(v),
        _ => Value::Null,
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

/// Result of a create or update, including the columns the backend refused.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SaveContactResponse {
    pub success: bool,
    pub attempts: usize,
    pub stripped_columns: Vec<String>,
    pub generated_id: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ImportContactsResponse {
    pub imported: usize,
    pub skipped_rows: usize,
    pub stripped_columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_id_inference() {
        assert_eq!(ContactId::infer("42"), ContactId::Numeric(42));
        assert_eq!(
            ContactId::infer("0b7c3a2e-4f1d-4c6e-9a55-1f2d3c4b5a69"),
            ContactId::Text("0b7c3a2e-4f1d-4c6e-9a55-1f2d3c4b5a69".to_string())
        );
        assert_eq!(ContactId::infer("abc"), ContactId::Text("abc".to_string()));
        assert_eq!(ContactId::infer("-5"), ContactId::Text("-5".to_string()));
        assert_eq!(ContactId::infer("1.5"), ContactId::Text("1.5".to_string()));
        assert_eq!(ContactId::infer(" 7 "), ContactId::Numeric(7));
        assert_eq!(ContactId::infer(""), ContactId::Text(String::new()));
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags("a, b,,c"), vec!["a", "b", "c"]);
        assert!(split_tags("").is_empty());
        assert!(split_tags(" , ,").is_empty());
    }

    #[test]
    fn test_tags_input_equivalence() {
        let joined: TagsInput = serde_json::from_str(r#""vip, tech""#).unwrap();
        let list: TagsInput = serde_json::from_str(r#"["vip ", "", " tech"]"#).unwrap();
        assert_eq!(joined.into_list(), list.into_list());
    }

    #[test]
    fn test_payload_defaults_by_category() {
        let input = ContactInput {
            first_name: Some("  Jean ".to_string()),
            email: Some(" Jean.Dupont@Exemple.COM ".to_string()),
            company: Some("   ".to_string()),
            ..Default::default()
        };

        let payload = input.clone().into_payload(ContactCategory::Member);
        assert_eq!(payload["first_name"], "Jean");
        assert_eq!(payload["email"], "jean.dupont@exemple.com");
        assert_eq!(payload["company"], Value::Null);
        assert_eq!(payload["status"], "Active");
        assert_eq!(payload["category"], "member");
        assert_eq!(payload["tags"], serde_json::json!([]));

        let payload = input.into_payload(ContactCategory::Prospect);
        assert_eq!(payload["status"], "New");
        assert_eq!(payload["category"], "prospect");
    }

    #[test]
    fn test_update_payload_keeps_stored_category_and_status() {
        let input = ContactInput {
            first_name: Some("Jean".to_string()),
            ..Default::default()
        };

        let payload = input.clone().into_update_payload(None);
        assert_eq!(payload["first_name"], "Jean");
        assert!(!payload.contains_key("category"));
        assert!(!payload.contains_key("status"));

        let payload = ContactInput {
            status: Some(ContactStatus::Lost),
            ..input
        }
        .into_update_payload(Some(ContactCategory::Member));
        assert_eq!(payload["category"], "member");
        assert_eq!(payload["status"], "Lost");
    }

    #[test]
    fn test_status_parsing_accepts_french_labels() {
        assert_eq!("Nouveau".parse::<ContactStatus>(), Ok(ContactStatus::New));
        assert_eq!("contacté".parse::<ContactStatus>(), Ok(ContactStatus::Contacted));
        assert_eq!("Active".parse::<ContactStatus>(), Ok(ContactStatus::Active));
        assert!("Whatever".parse::<ContactStatus>().is_err());

        let status: ContactStatus = serde_json::from_str(r#""Perdu""#).unwrap();
        assert_eq!(status, ContactStatus::Lost);
    }

    #[test]
    fn test_status_json_accepts_csv_spellings() {
        let input: ContactInput = serde_json::from_str(r#"{"status":"contacted"}"#).unwrap();
        assert_eq!(input.status, Some(ContactStatus::Contacted));

        for raw in ["Contacte", "CONTACTÉ", " Contacted "] {
            let status: ContactStatus = serde_json::from_value(Value::from(raw)).unwrap();
            assert_eq!(status, ContactStatus::Contacted);
        }
        let status: ContactStatus = serde_json::from_str(r#""ferme""#).unwrap();
        assert_eq!(status, ContactStatus::Closed);

        assert!(serde_json::from_str::<ContactStatus>(r#""Whatever""#).is_err());
        assert_eq!(
            serde_json::to_value(ContactStatus::Interested).unwrap(),
            Value::from("Interested")
        );
    }

    #[test]
    fn test_search_matches_name_or_company() {
        let contact = Contact {
            first_name: "Marie".to_string(),
            last_name: "Martin".to_string(),
            company: "Tech Solutions".to_string(),
            ..Default::default()
        };
        assert!(contact.matches_search("marie mar"));
        assert!(contact.matches_search("SOLUTIONS"));
        assert!(!contact.matches_search("acme"));
    }
}
