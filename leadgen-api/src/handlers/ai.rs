use actix_web::{web, HttpResponse, Result as ActixResult};
use leadgen_agents::{CardScanner, Enricher, ImageEditor, InlineImage};
use shared_types::{
    ContactInput, EditImageRequest, EditImageResponse, EnrichRequest, EnrichmentResponse,
    SaveContactResponse, ScanCardRequest, ScanCardResponse,
};
use tracing::info;

use crate::backend::contacts as contacts_db;
use crate::helpers::http_error::{ai_error, backend_error};
use crate::state::AppState;

pub async fn scan_card(
    state: web::Data<AppState>,
    request: web::Json<ScanCardRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();
    let fallback_mime = req.mime_type.as_deref().unwrap_or("image/jpeg");
    let image = InlineImage::from_input(&req.image_base64, fallback_mime).map_err(ai_error)?;

    let model = state.config()?.text_model();
    let scanner = CardScanner::new(state.llm_client()?, model);
    let fields = scanner.scan(image).await.map_err(ai_error)?;
    info!("Scanned business card for '{} {}'", fields.first_name, fields.last_name);

    let saved = match req.save_as {
        Some(category) => {
            let backend = state.backend()?;
            let payload = ContactInput::from(fields.clone()).into_payload(category);
            let outcome = contacts_db::create_contact(
                &backend.client,
                backend.contacts_schema.as_ref(),
                payload,
            )
            .await
            .map_err(backend_error)?;
            Some(SaveContactResponse {
                success: true,
                attempts: outcome.attempts,
                stripped_columns: outcome.stripped_columns,
                generated_id: outcome.generated_id,
            })
        }
        None => None,
    };

    Ok(HttpResponse::Ok().json(ScanCardResponse { fields, saved }))
}

pub async fn enrich(
    state: web::Data<AppState>,
    request: web::Json<EnrichRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    let model = state.config()?.text_model();
    let enricher = Enricher::new(state.llm_client()?, model);
    let enrichment = enricher
        .enrich(&req.text, req.grounded)
        .await
        .map_err(ai_error)?;

    info!(
        "Enriched contact with {} cited source(s)",
        enrichment.sources.len()
    );
    Ok(HttpResponse::Ok().json(EnrichmentResponse {
        data: enrichment.data,
        sources: enrichment.sources,
    }))
}

pub async fn edit_image(
    state: web::Data<AppState>,
    request: web::Json<EditImageRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();
    let fallback_mime = req.mime_type.as_deref().unwrap_or("image/png");
    let image = InlineImage::from_input(&req.image_base64, fallback_mime).map_err(ai_error)?;

    let model = state.config()?.image_model();
    let editor = ImageEditor::new(state.llm_client()?, model);
    let edited = editor.edit(image, &req.prompt).await.map_err(ai_error)?;

    Ok(HttpResponse::Ok().json(EditImageResponse {
        image: edited.as_ref().map(InlineImage::to_data_url),
    }))
}
