//! Extractors Crate
//!
//! Turns loosely shaped external data into the canonical types of `shared-types`.
//!
//! # Available Extractors
//!
//! - `record_normalizer`: maps stored rows written under any historical naming scheme
//!   (snake_case, camelCase, French column names) onto `Contact`, `Event` and `EmailTemplate`
//! - `contact_csv`: bulk import and export of contacts using the French header contract
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::record_normalizer::contacts_in_category;
//! use shared_types::ContactCategory;
//!
//! let members = contacts_in_category(&rows, ContactCategory::Member);
//! let csv = extractors::contact_csv::export_contacts(&members)?;
//! ```

pub mod contact_csv;
pub mod record_normalizer;

// Re-export commonly used items
pub use contact_csv::{export_contacts, import_template, parse_contacts, ContactImport, CsvError};
pub use record_normalizer::{contacts_in_category, normalize_contact};
