use actix_web::{web, HttpResponse, Result as ActixResult};
use extractors::contact_csv::export_contacts;
use extractors::record_normalizer::{contacts_in_category, normalize_contact};
use serde::Deserialize;
use shared_types::{Contact, ContactCategory, ReportSummary};

use super::contacts::csv_attachment;
use crate::backend::contacts as contacts_db;
use crate::helpers::http_error::{backend_error, csv_error};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExportQuery {
    category: Option<ContactCategory>,
}

/// CSV of one category, or of every contact when no category is given.
pub async fn export_contacts_csv(
    state: web::Data<AppState>,
    query: web::Query<ExportQuery>,
) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let rows = contacts_db::list_contact_rows(&backend.client)
        .await
        .map_err(backend_error)?;

    let (contacts, file_name) = match query.category {
        Some(category) => (
            contacts_in_category(&rows, category),
            format!("{}s.csv", category),
        ),
        None => (
            rows.iter().map(normalize_contact).collect(),
            "contacts.csv".to_string(),
        ),
    };

    let content = export_contacts(&contacts).map_err(csv_error)?;
    Ok(csv_attachment(&file_name, content))
}

pub async fn get_summary(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let rows = contacts_db::list_contact_rows(&backend.client)
        .await
        .map_err(backend_error)?;

    let contacts: Vec<Contact> = rows.iter().map(normalize_contact).collect();
    Ok(HttpResponse::Ok().json(summarize(&contacts)))
}

pub fn summarize(contacts: &[Contact]) -> ReportSummary {
    let mut summary = ReportSummary {
        total: contacts.len(),
        ..Default::default()
    };

    for contact in contacts {
        *summary
            .by_category
            .entry(contact.category.clone())
            .or_default() += 1;

        let status = if contact.status.is_empty() {
            "Unknown".to_string()
        } else {
            contact.status.clone()
        };
        *summary.by_status.entry(status).or_default() += 1;

        if !contact.email.is_empty() {
            summary.with_email += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(category: &str, status: &str, email: &str) -> Contact {
        Contact {
            category: category.to_string(),
            status: status.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[
            contact("prospect", "New", "a@b.c"),
            contact("prospect", "Contacted", ""),
            contact("member", "Active", "d@e.f"),
            contact("member", "", ""),
        ]);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_category["prospect"], 2);
        assert_eq!(summary.by_category["member"], 2);
        assert_eq!(summary.by_status["Unknown"], 1);
        assert_eq!(summary.with_email, 2);
    }
}
