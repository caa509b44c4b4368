use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use shared_types::EmailDeliveryConfig;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiConfig {
    pub backend: Option<BackendConfig>,
    pub email: Option<EmailDeliveryConfig>,
    pub branding: Option<BrandingConfig>,
    pub api_keys: Option<ApiKeysConfig>,
    pub ai: Option<AiModelsConfig>,
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct BackendConfig {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BrandingConfig {
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiKeysConfig {
    pub gemini_api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AiModelsConfig {
    pub text_model: Option<String>,
    pub image_model: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

const DEFAULT_CONFIG: &str = r#"
[backend]
# PostgREST-compatible endpoint, e.g. https://<project>.supabase.co
url = ""
key = ""

[api_keys]
# gemini_api_key = "your-gemini-key"

[ai]
# text_model = "gemini-2.5-flash"
# image_model = "gemini-2.5-flash-image"

[cors]
allowed_origins = ["http://localhost:3030"]

[server]
host = "127.0.0.1"
port = 8080
"#;

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();
        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    /// Reads the file at `config_path`, writing the commented default first if it is missing.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;
        if let Some(backend) = config.backend.as_mut() {
            backend.url = sanitize_backend_url(&backend.url);
            backend.key = backend.key.trim().to_string();
        }

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string(self)?;
        std::fs::write(config_path, toml_string)?;
        Ok(())
    }

    /// Key from the config file, then `GEMINI_API_KEY`, then `API_KEY`. Blank values are
    /// skipped.
    pub fn gemini_api_key(&self) -> Option<String> {
        self.resolve_gemini_key(|name| std::env::var(name).ok())
    }

    fn resolve_gemini_key(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        let configured = self
            .api_keys
            .as_ref()
            .and_then(|keys| keys.gemini_api_key.clone());

        std::iter::once(configured)
            .chain(["GEMINI_API_KEY", "API_KEY"].into_iter().map(|name| env(name)))
            .flatten()
            .find(|key| !key.trim().is_empty())
    }

    pub fn text_model(&self) -> String {
        self.ai
            .as_ref()
            .and_then(|ai| ai.text_model.clone())
            .unwrap_or_else(|| leadgen_agents::GEMINI_TEXT_MODEL_ID.to_string())
    }

    pub fn image_model(&self) -> String {
        self.ai
            .as_ref()
            .and_then(|ai| ai.image_model.clone())
            .unwrap_or_else(|| leadgen_agents::GEMINI_IMAGE_MODEL_ID.to_string())
    }

    pub fn email(&self) -> EmailDeliveryConfig {
        self.email.clone().unwrap_or_default()
    }

    pub fn logo(&self) -> Option<String> {
        self.branding
            .as_ref()
            .and_then(|b| b.logo.clone())
            .filter(|logo| !logo.trim().is_empty())
    }
}

/// Trims the URL and drops one trailing slash.
pub fn sanitize_backend_url(url: &str) -> String {
    let url = url.trim();
    url.strip_suffix('/').unwrap_or(url).to_string()
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("leadgen").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
