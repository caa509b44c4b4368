use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result};
use shared_types::{
    ApiKeyConfig, BackendStatus, EmailDeliveryConfig, SaveSettingsResponse, SettingsResponse,
    UpdateApiKeysRequest, UpdateBackendRequest, UpdateLogoRequest,
};
use tracing::{info, warn};

use crate::backend::app_settings;
use crate::backend::BackendClient;
use crate::config::{sanitize_backend_url, ApiKeysConfig, BackendConfig, BrandingConfig};
use crate::helpers::backend::{connect, BackendHandle};
use crate::helpers::http_error::json_error;
use crate::state::AppState;

/// Shows at most the first six characters and never more than half of the secret.
fn mask_secret(secret: &str) -> Option<String> {
    let length = secret.chars().count();
    if length == 0 {
        return None;
    }
    let shown = (length / 2).min(6);
    let visible: String = secret.chars().take(shown).collect();
    let hidden = (length - shown).min(34);
    Some(format!("{}{}", visible, "*".repeat(hidden)))
}

fn backend_status(state: &AppState, config: &crate::config::ApiConfig) -> BackendStatus {
    let backend = config.backend.clone().unwrap_or_default();
    BackendStatus {
        url: Some(backend.url).filter(|u| !u.is_empty()),
        key: mask_secret(&backend.key),
        is_configured: state.try_backend().is_some(),
    }
}

pub async fn get_settings(state: web::Data<AppState>) -> Result<HttpResponse> {
    let config = state.config()?;

    let gemini_key = config.gemini_api_key();
    let api_keys = vec![ApiKeyConfig {
        name: "gemini".to_string(),
        key: gemini_key.as_deref().and_then(mask_secret),
        is_configured: gemini_key.is_some(),
    }];

    let mut email = config.email();
    email.access_token = mask_secret(&email.access_token).unwrap_or_default();

    let response = SettingsResponse {
        config_file_path: state.config_path.to_string_lossy().to_string(),
        backend: backend_status(&state, &config),
        email,
        logo: config.logo(),
        api_keys,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn update_backend(
    state: web::Data<AppState>,
    request: web::Json<UpdateBackendRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();
    let url = sanitize_backend_url(&req.url);
    let key = req.key.trim().to_string();

    BackendClient::new(&url, &key)
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let config = state.update_config(|config| {
        config.backend = Some(BackendConfig {
            url: url.clone(),
            key: key.clone(),
        });
    })?;
    info!("Updated backend settings to {}", url);

    let handle = connect(&config).await;
    state.set_backend(handle.clone())?;
    if let Some(handle) = handle {
        pull_remote_settings(&state, &handle).await;
    }

    Ok(HttpResponse::Ok().json(backend_status(&state, &state.config()?)))
}

pub async fn update_email(
    state: web::Data<AppState>,
    request: web::Json<EmailDeliveryConfig>,
) -> Result<HttpResponse> {
    let email = request.into_inner();

    let config = state.update_config(|config| {
        config.email = Some(email.clone());
    })?;
    info!("Updated email delivery settings");

    let logo = config.logo();
    let now = chrono::Utc::now().to_rfc3339();
    let payload = app_settings::email_payload(&email, logo.as_deref(), &now);
    let fallback = app_settings::fallback_payload(&email, logo.as_deref(), &now);

    Ok(HttpResponse::Ok().json(push_remote(&state, &payload, &fallback).await))
}

pub async fn update_logo(
    state: web::Data<AppState>,
    request: web::Json<UpdateLogoRequest>,
) -> Result<HttpResponse> {
    let logo = request.into_inner().logo.trim().to_string();

    let config = state.update_config(|config| {
        config.branding = Some(BrandingConfig {
            logo: Some(logo.clone()).filter(|l| !l.is_empty()),
        });
    })?;
    info!("Updated brand logo");

    let email = config.email();
    let now = chrono::Utc::now().to_rfc3339();
    let payload = app_settings::logo_payload(&email, &logo, &now);
    let fallback = app_settings::fallback_payload(&email, Some(&logo), &now);

    Ok(HttpResponse::Ok().json(push_remote(&state, &payload, &fallback).await))
}

pub async fn update_api_keys(
    state: web::Data<AppState>,
    request: web::Json<UpdateApiKeysRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();

    state.update_config(|config| match config.api_keys.as_mut() {
        Some(keys) => {
            if let Some(gemini_key) = req.gemini_api_key {
                keys.gemini_api_key = Some(gemini_key);
            }
        }
        None => {
            config.api_keys = Some(ApiKeysConfig {
                gemini_api_key: req.gemini_api_key,
            });
        }
    })?;

    info!("Updated API keys in settings");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "path": state.config_path.to_string_lossy()
    })))
}

/// Mirrors a settings payload to the shared row. The local save already happened, so a
/// remote failure is reported rather than raised.
async fn push_remote(
    state: &AppState,
    payload: &serde_json::Map<String, serde_json::Value>,
    fallback: &serde_json::Map<String, serde_json::Value>,
) -> SaveSettingsResponse {
    let Some(backend) = state.try_backend() else {
        return SaveSettingsResponse {
            saved_locally: true,
            synced_remotely: false,
            used_fallback_payload: false,
            remote_error: None,
        };
    };

    match app_settings::save_settings(&backend.client, payload, fallback).await {
        Ok(used_fallback_payload) => SaveSettingsResponse {
            saved_locally: true,
            synced_remotely: true,
            used_fallback_payload,
            remote_error: None,
        },
        Err(e) => {
            warn!("Failed to sync settings to backend: {}", e);
            SaveSettingsResponse {
                saved_locally: true,
                synced_remotely: false,
                used_fallback_payload: false,
                remote_error: Some(e.to_string()),
            }
        }
    }
}

/// Copies email settings and logo from the shared row into the local config.
pub async fn pull_remote_settings(state: &AppState, backend: &BackendHandle) {
    let remote = match app_settings::load_settings(&backend.client).await {
        Ok(Some(remote)) => remote,
        Ok(None) => return,
        Err(e) => {
            warn!("Could not read shared settings: {}", e);
            return;
        }
    };

    let result = state.update_config(|config| {
        if let Some(email) = remote.email.clone() {
            config.email = Some(email);
        }
        if let Some(logo) = remote.logo.clone() {
            config.branding = Some(BrandingConfig { logo: Some(logo) });
        }
    });
    match result {
        Ok(_) => info!("Loaded shared settings from backend"),
        Err(e) => warn!("Could not store shared settings locally: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), None);
        assert_eq!(mask_secret("a").as_deref(), Some("*"));
        assert_eq!(mask_secret("abc").as_deref(), Some("a**"));
        assert_eq!(mask_secret("tok123").as_deref(), Some("tok***"));
        assert_eq!(mask_secret("AIzaSyD12345").as_deref(), Some("AIzaSy******"));
        assert_eq!(mask_secret(&"k".repeat(100)).unwrap().len(), 40);
    }
}
