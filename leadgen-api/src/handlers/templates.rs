use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result as ActixResult};
use shared_types::{CreateTemplateRequest, TemplatesResponse};
use tracing::info;

use crate::backend::templates as templates_db;
use crate::helpers::http_error::{backend_error, json_error};
use crate::state::AppState;

pub async fn list_templates(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let templates = templates_db::list_templates(&backend.client)
        .await
        .map_err(backend_error)?;

    Ok(HttpResponse::Ok().json(TemplatesResponse { templates }))
}

pub async fn get_template(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let template = templates_db::get_template(&backend.client, &path.into_inner())
        .await
        .map_err(backend_error)?;

    Ok(HttpResponse::Ok().json(template))
}

pub async fn create_template(
    state: web::Data<AppState>,
    request: web::Json<CreateTemplateRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    if request.name.trim().is_empty() || request.body.trim().is_empty() {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "A template needs a name and a body",
        ));
    }

    let backend = state.backend()?;
    let template = templates_db::create_template(&backend.client, request)
        .await
        .map_err(backend_error)?;

    info!("Created email template '{}'", template.name);
    Ok(HttpResponse::Created().json(template))
}

pub async fn delete_template(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let backend = state.backend()?;
    let id = path.into_inner();
    templates_db::delete_template(&backend.client, &id)
        .await
        .map_err(backend_error)?;

    info!("Deleted email template {}", id);
    Ok(HttpResponse::NoContent().finish())
}
