use crate::backend::BackendError;
use crate::config::ApiConfig;
use crate::helpers::backend::BackendHandle;
use crate::helpers::http_error::{ai_error, backend_error, json_error, lock_error};
use actix_web::http::StatusCode;
use leadgen_agents::{GeminiClient, LlmClient};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Shared by every handler. Values are cloned out of the locks before any `.await`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<ApiConfig>>,
    pub config_path: PathBuf,
    pub backend: Arc<RwLock<Option<BackendHandle>>>,
}

impl AppState {
    pub fn new(config: ApiConfig, config_path: PathBuf, backend: Option<BackendHandle>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
            backend: Arc::new(RwLock::new(backend)),
        }
    }

    pub fn config(&self) -> Result<ApiConfig, actix_web::Error> {
        Ok(self.config.read().map_err(lock_error)?.clone())
    }

    /// Applies `change` to the config and writes it to disk.
    pub fn update_config<F>(&self, change: F) -> Result<ApiConfig, actix_web::Error>
    where
        F: FnOnce(&mut ApiConfig),
    {
        let mut config = self.config.write().map_err(lock_error)?;
        change(&mut config);
        config.save_to(&self.config_path).map_err(|e| {
            actix_web::error::ErrorInternalServerError(format!(
                "Failed to write config file: {}",
                e
            ))
        })?;
        Ok(config.clone())
    }

    pub fn backend(&self) -> Result<BackendHandle, actix_web::Error> {
        self.backend
            .read()
            .map_err(lock_error)?
            .clone()
            .ok_or_else(|| backend_error(BackendError::NotConfigured))
    }

    pub fn try_backend(&self) -> Option<BackendHandle> {
        self.backend.read().ok().and_then(|b| b.clone())
    }

    pub fn set_backend(&self, handle: Option<BackendHandle>) -> Result<(), actix_web::Error> {
        *self.backend.write().map_err(lock_error)? = handle;
        Ok(())
    }

    pub fn llm_client(&self) -> Result<Arc<dyn LlmClient>, actix_web::Error> {
        let api_key = self.config()?.gemini_api_key().ok_or_else(|| {
            json_error(StatusCode::BAD_REQUEST, "Gemini API key is not configured")
        })?;
        let client = GeminiClient::new(api_key).map_err(ai_error)?;
        Ok(Arc::new(client))
    }
}
