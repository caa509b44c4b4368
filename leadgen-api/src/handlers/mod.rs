pub mod ai;
pub mod campaigns;
pub mod contacts;
pub mod reports;
pub mod settings;
pub mod templates;
