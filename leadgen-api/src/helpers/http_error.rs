use crate::backend::BackendError;
use crate::integrations::emailjs::EmailDeliveryError;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use extractors::CsvError;
use leadgen_agents::AiError;
use shared_types::ErrorResponse;

/// An actix error whose body is `{"error": message}`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> actix_web::Error {
    let message = message.into();
    let response = HttpResponse::build(status).json(ErrorResponse::new(message.clone()));
    InternalError::from_response(message, response).into()
}

pub fn backend_error(error: BackendError) -> actix_web::Error {
    let status = match &error {
        BackendError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        BackendError::NotFound => StatusCode::NOT_FOUND,
        BackendError::InvalidUrl(_) | BackendError::MissingKey => StatusCode::BAD_REQUEST,
        BackendError::Api { status, .. } if (400..500).contains(status) => StatusCode::BAD_REQUEST,
        BackendError::Api { .. } | BackendError::Http(_) => StatusCode::BAD_GATEWAY,
    };
    if status != StatusCode::NOT_FOUND {
        tracing::error!("Backend error: {}", error);
    }
    json_error(status, error.to_string())
}

pub fn ai_error(error: AiError) -> actix_web::Error {
    tracing::error!("AI error: {}", error);
    let status = if error.is_user_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    };
    json_error(status, error.to_string())
}

pub fn csv_error(error: CsvError) -> actix_web::Error {
    json_error(StatusCode::BAD_REQUEST, error.to_string())
}

pub fn email_error(error: EmailDeliveryError) -> actix_web::Error {
    let status = match error {
        EmailDeliveryError::NotConfigured => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    json_error(status, error.to_string())
}

pub fn lock_error(e: impl std::fmt::Display) -> actix_web::Error {
    actix_web::error::ErrorInternalServerError(format!("Failed to acquire config lock: {}", e))
}
