//! Bulk contact import and export using the French-labelled column contract.
//!
//! Files written here start with a UTF-8 BOM and use CRLF line endings so that
//! spreadsheet tools on Windows open them with the right encoding.

mod csv_parser;

use csv::{Terminator, WriterBuilder};
use serde_json::{Map, Value};
use shared_types::{split_tags, Contact, ContactCategory, ContactStatus};

/// Header label and the stored column it maps to, in file order.
pub const HEADER_MAP: [(&str, &str); 12] = [
    ("Prénom", "first_name"),
    ("Nom", "last_name"),
    ("Email", "email"),
    ("Société", "company"),
    ("Titre", "title"),
    ("Téléphone", "phone"),
    ("LinkedIn", "linkedin_url"),
    ("Site_Web", "website"),
    ("Secteur", "sector"),
    ("Adresse", "address"),
    ("Notes", "notes"),
    ("Statut", "status"),
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const TEMPLATE_ROWS: [[&str; 12]; 2] = [
    [
        "Jean",
        "Dupont",
        "jean.dupont@exemple.com",
        "Acme Corp",
        "Directeur",
        "+33612345678",
        "https://linkedin.com/in/jeandupont",
        "https://acme.com",
        "Technologie",
        "Paris",
        "Excellent contact",
        "Nouveau",
    ],
    [
        "Marie",
        "Martin",
        "marie.martin@exemple.com",
        "Tech Solutions",
        "CTO",
        "+33698765432",
        "",
        "",
        "SaaS",
        "Lyon",
        "Prospect intéressant",
        "Contacté",
    ],
];

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("CSV file is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("The CSV file is empty or invalid")]
    Empty,

    #[error("Write error: {0}")]
    Write(String),
}

/// Rows ready to be inserted, one column map per contact.
#[derive(Debug)]
pub struct ContactImport {
    pub rows: Vec<Map<String, Value>>,
    pub skipped_rows: usize,
}

/// Header label for a stored column, or the label unchanged when it is not part of the contract.
pub fn column_for_header(header: &str) -> &str {
    HEADER_MAP
        .iter()
        .find(|(label, _)| *label == header)
        .map(|(_, column)| *column)
        .unwrap_or(header)
}

pub fn parse_contacts(content: &[u8], category: ContactCategory) -> Result<ContactImport, CsvError> {
    let parsed = csv_parser::parse_rows(content)?;
    if parsed.headers.is_empty() || parsed.rows.is_empty() {
        return Err(CsvError::Empty);
    }

    let columns: Vec<&str> = parsed
        .headers
        .iter()
        .map(|h| column_for_header(h))
        .collect();

    let mut rows = Vec::with_capacity(parsed.rows.len());
    let mut skipped_rows = parsed.skipped;

    for values in &parsed.rows {
        let mut row = Map::new();
        for (column, value) in columns.iter().zip(values.iter()) {
            if column.is_empty() || value.is_empty() {
                continue;
            }
            row.insert(column.to_string(), cell_value(column, value));
        }

        if row.is_empty() {
            skipped_rows += 1;
            continue;
        }

        row.insert(
            "category".to_string(),
            Value::from(category.as_str()),
        );
        if !row.contains_key("status") {
            row.insert(
                "status".to_string(),
                Value::from(category.default_status().as_str()),
            );
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(CsvError::Empty);
    }

    Ok(ContactImport { rows, skipped_rows })
}

fn cell_value(column: &str, value: &str) -> Value {
    match column {
        "email" => Value::from(value.to_lowercase()),
        "status" => match value.parse::<ContactStatus>() {
            Ok(status) => Value::from(status.as_str()),
            Err(_) => Value::from(value),
        },
        "tags" => Value::from(split_tags(value)),
        _ => Value::from(value),
    }
}

/// Writes contacts under the contract header.
pub fn export_contacts(contacts: &[Contact]) -> Result<Vec<u8>, CsvError> {
    let rows = contacts.iter().map(|c| {
        [
            c.first_name.as_str(),
            c.last_name.as_str(),
            c.email.as_str(),
            c.company.as_str(),
            c.title.as_str(),
            c.phone.as_str(),
            c.linkedin_url.as_str(),
            c.website.as_str(),
            c.sector.as_str(),
            c.address.as_str(),
            c.notes.as_str(),
            c.status.as_str(),
        ]
    });
    write_with_header(rows)
}

/// Header plus two sample rows, offered as a starting point for imports.
pub fn import_template() -> Result<Vec<u8>, CsvError> {
    write_with_header(TEMPLATE_ROWS.iter().copied())
}

pub fn template_file_name(category: ContactCategory) -> &'static str {
    match category {
        ContactCategory::Member => "Modèle_Import_Membres.csv",
        ContactCategory::Prospect => "Modèle_Import_Prospects.csv",
    }
}

fn write_with_header<'a, I>(rows: I) -> Result<Vec<u8>, CsvError>
where
    I: Iterator<Item = [&'a str; 12]>,
{
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(&mut buffer);

        writer
            .write_record(HEADER_MAP.iter().map(|(label, _)| *label))
            .map_err(|e| CsvError::Write(e.to_string()))?;

        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| CsvError::Write(e.to_string()))?;
        }

        writer.flush().map_err(|e| CsvError::Write(e.to_string()))?;
    }
    Ok(buffer)
}
