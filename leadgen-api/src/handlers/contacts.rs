use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpResponse, Result as ActixResult};
use extractors::contact_csv::{self, template_file_name};
use extractors::record_normalizer::{contacts_in_category, normalize_contact};
use serde::Deserialize;
use shared_types::{
    ContactCategory, ContactId, ContactInput, ContactsResponse, EventsResponse,
    ImportContactsResponse, SaveContactResponse,
};
use tracing::info;

use crate::backend::adaptive_write::WriteOutcome;
use crate::backend::{contacts as contacts_db, events as events_db};
use crate::helpers::http_error::{backend_error, csv_error};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    category: ContactCategory,
    search: Option<String>,
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    category: ContactCategory,
}

/// Updates only move a contact between categories when asked to.
#[derive(Deserialize)]
pub struct UpdateQuery {
    category: Option<ContactCategory>,
}

pub async fn list_contacts(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let rows = contacts_db::list_contact_rows(&backend.client)
        .await
        .map_err(backend_error)?;

    let mut contacts = contacts_in_category(&rows, query.category);
    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        contacts.retain(|c| c.matches_search(term));
    }

    Ok(HttpResponse::Ok().json(ContactsResponse { contacts }))
}

pub async fn get_contact(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let id = ContactId::infer(&path.into_inner());

    let row = contacts_db::get_contact_row(&backend.client, &id)
        .await
        .map_err(backend_error)?;

    Ok(HttpResponse::Ok().json(normalize_contact(&row)))
}

pub async fn create_contact(
    state: web::Data<AppState>,
    query: web::Query<CategoryQuery>,
    request: web::Json<ContactInput>,
) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let payload = request.into_inner().into_payload(query.category);

    let outcome = contacts_db::create_contact(
        &backend.client,
        backend.contacts_schema.as_ref(),
        payload,
    )
    .await
    .map_err(backend_error)?;

    info!(
        "Created {} contact in {} attempt(s)",
        query.category, outcome.attempts
    );
    Ok(HttpResponse::Created().json(save_response(outcome)))
}

pub async fn update_contact(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<UpdateQuery>,
    request: web::Json<ContactInput>,
) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let id = ContactId::infer(&path.into_inner());
    let payload = request.into_inner().into_update_payload(query.category);

    let outcome = contacts_db::update_contact(
        &backend.client,
        backend.contacts_schema.as_ref(),
        &id,
        payload,
    )
    .await
    .map_err(backend_error)?;

    info!("Updated contact {} in {} attempt(s)", id, outcome.attempts);
    Ok(HttpResponse::Ok().json(save_response(outcome)))
}

pub async fn delete_contact(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let id = ContactId::infer(&path.into_inner());

    contacts_db::delete_contact(&backend.client, &id)
        .await
        .map_err(backend_error)?;

    info!("Deleted contact {}", id);
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_contact_events(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let id = ContactId::infer(&path.into_inner());

    let events = events_db::list_events_for_contact(&backend.client, &id)
        .await
        .map_err(backend_error)?;

    Ok(HttpResponse::Ok().json(EventsResponse { events }))
}

/// CSV body in, one bulk insert out.
pub async fn import_contacts(
    state: web::Data<AppState>,
    query: web::Query<CategoryQuery>,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let import = contact_csv::parse_contacts(&body, query.category).map_err(csv_error)?;
    let imported = import.rows.len();

    let outcome = contacts_db::import_contacts(
        &backend.client,
        backend.contacts_schema.as_ref(),
        import.rows,
    )
    .await
    .map_err(backend_error)?;

    info!(
        "Imported {} {} contact(s), skipped {} row(s)",
        imported, query.category, import.skipped_rows
    );
    Ok(HttpResponse::Ok().json(ImportContactsResponse {
        imported,
        skipped_rows: import.skipped_rows,
        stripped_columns: outcome.stripped_columns,
    }))
}

pub async fn download_template(query: web::Query<CategoryQuery>) -> ActixResult<HttpResponse> {
    let content = contact_csv::import_template().map_err(csv_error)?;
    Ok(csv_attachment(template_file_name(query.category), content))
}

fn save_response(outcome: WriteOutcome) -> SaveContactResponse {
    SaveContactResponse {
        success: true,
        attempts: outcome.attempts,
        stripped_columns: outcome.stripped_columns,
        generated_id: outcome.generated_id,
    }
}

/// CSV download. File names may be non-ASCII, so they go in `filename*`.
pub fn csv_attachment(file_name: &str, content: Vec<u8>) -> HttpResponse {
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: file_name.as_bytes().to_vec(),
        })],
    };

    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(disposition)
        .body(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_update_query_category_is_optional() {
        let query = web::Query::<UpdateQuery>::from_query("").unwrap();
        assert_eq!(query.category, None);

        let query = web::Query::<UpdateQuery>::from_query("category=member").unwrap();
        assert_eq!(query.category, Some(ContactCategory::Member));
    }

    #[actix_web::test]
    async fn test_template_download() {
        let response = download_template(web::Query(CategoryQuery {
            category: ContactCategory::Member,
        }))
        .await
        .unwrap();

        let disposition = response
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("filename*=UTF-8''"));

        let body = to_bytes(response.into_body()).await.unwrap();
        assert!(body.starts_with(b"\xEF\xBB\xBF"));
    }
}
