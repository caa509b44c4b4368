//! Column names each canonical field has been stored under over time.
//!
//! Order matters: the first alias holding a usable value wins.

pub const ID: &[&str] = &["id"];
pub const FIRST_NAME: &[&str] = &["first_name", "firstName", "prenom"];
pub const LAST_NAME: &[&str] = &["last_name", "lastName", "nom"];
pub const COMPANY: &[&str] = &["company", "societe"];
pub const TITLE: &[&str] = &["title", "poste"];
pub const EMAIL: &[&str] = &["email"];
pub const PHONE: &[&str] = &["phone", "telephone", "tel"];
pub const LINKEDIN_URL: &[&str] = &["linkedin_url", "linkedinUrl"];
pub const WEBSITE: &[&str] = &["website", "site_web"];
pub const SECTOR: &[&str] = &["sector", "secteur"];
pub const ADDRESS: &[&str] = &["address", "adresse"];
pub const NOTES: &[&str] = &["notes"];
pub const STATUS: &[&str] = &["status", "statut"];
pub const CATEGORY: &[&str] = &["category"];
pub const TAGS: &[&str] = &["tags"];
pub const CREATED_AT: &[&str] = &["created_at", "createdAt"];

pub mod event {
    pub const CONTACT_ID: &[&str] = &["contact_id", "contactId"];
    pub const TITLE: &[&str] = &["title", "name", "titre"];
    pub const DESCRIPTION: &[&str] = &["description", "notes"];
    pub const LOCATION: &[&str] = &["location", "lieu"];
    pub const START_TIME: &[&str] = &["start_time", "startTime", "date"];
    pub const END_TIME: &[&str] = &["end_time", "endTime"];
}

pub mod template {
    pub const NAME: &[&str] = &["name", "title", "nom"];
    pub const SUBJECT: &[&str] = &["subject", "objet"];
    pub const BODY: &[&str] = &["body", "content", "contenu"];
}

/// Write-side column pairs: when the backend refuses one spelling, the other goes too.
pub const WRITE_ALIASES: &[(&str, &str)] = &[
    ("first_name", "firstName"),
    ("last_name", "lastName"),
    ("linkedin_url", "linkedinUrl"),
    ("site_web", "website"),
];

/// Returns the other spelling of a write-side column, if it has one.
pub fn write_alias_of(column: &str) -> Option<&'static str> {
    WRITE_ALIASES.iter().find_map(|(snake, camel)| {
        if *snake == column {
            Some(*camel)
        } else if *camel == column {
            Some(*snake)
        } else {
            None
        }
    })
}
