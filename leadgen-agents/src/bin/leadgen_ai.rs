use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Config, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use leadgen_agents::{
    CampaignWriter, CardScanner, Enricher, GeminiClient, ImageEditor, InlineImage, LlmClient,
    GEMINI_IMAGE_MODEL_ID, GEMINI_TEXT_MODEL_ID,
};

#[derive(Parser, Debug)]
#[command(name = "leadgen-ai", about = "Run the LeadGen AI helpers from the command line")]
struct Cli {
    /// Override the Gemini model ID
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract contact fields from a business card photo
    Scan {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
    /// Find direct contact details from a free-text description
    Enrich {
        text: String,
        /// Let the model search the web and list its sources
        #[arg(long)]
        grounded: bool,
    },
    /// Draft an outreach email
    WriteEmail {
        #[arg(long)]
        name: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        topic: String,
    },
    /// Edit a profile picture with a text instruction
    EditImage {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        #[arg(long)]
        prompt: String,
        /// Where to write the edited image
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[derive(Debug, Deserialize, Clone, Default)]
struct ApiConfig {
    api_keys: Option<ApiKeysConfig>,
    ai: Option<AiModelsConfig>,
}

#[derive(Debug, Deserialize, Clone)]
struct ApiKeysConfig {
    gemini_api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct AiModelsConfig {
    text_model: Option<String>,
    image_model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_api_config().context("Failed to load leadgen API config")?;
    let api_key = resolve_api_key(&config)?;
    let llm_client: Arc<dyn LlmClient> = Arc::new(GeminiClient::new(api_key)?);

    let models = config.ai.as_ref();
    let text_model = cli
        .model
        .clone()
        .or_else(|| models.and_then(|m| m.text_model.clone()))
        .unwrap_or_else(|| GEMINI_TEXT_MODEL_ID.to_string());
    let image_model = cli
        .model
        .clone()
        .or_else(|| models.and_then(|m| m.image_model.clone()))
        .unwrap_or_else(|| GEMINI_IMAGE_MODEL_ID.to_string());

    match cli.command {
        Command::Scan { image } => {
            let image = InlineImage::from_file(&image)
                .with_context(|| format!("Failed to read image at {:?}", image))?;
            let fields = CardScanner::new(llm_client, text_model).scan(image).await?;
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
        Command::Enrich { text, grounded } => {
            let result = Enricher::new(llm_client, text_model)
                .enrich(&text, grounded)
                .await?;
            println!("{}", serde_json::to_string_pretty(&result.data)?);
            for source in result.sources {
                println!("- {} <{}>", source.title, source.uri);
            }
        }
        Command::WriteEmail {
            name,
            company,
            topic,
        } => {
            let email = CampaignWriter::new(llm_client, text_model)
                .write(&name, &company, &topic)
                .await?;
            println!("{email}");
        }
        Command::EditImage {
            image,
            prompt,
            output,
        } => {
            let image = InlineImage::from_file(&image)
                .with_context(|| format!("Failed to read image at {:?}", image))?;
            match ImageEditor::new(llm_client, image_model)
                .edit(image, &prompt)
                .await?
            {
                Some(edited) => {
                    std::fs::write(&output, edited.decode()?)
                        .with_context(|| format!("Failed to write {:?}", output))?;
                    println!("Wrote {} ({})", output.display(), edited.mime_type);
                }
                None => println!("The model returned no image"),
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}

fn load_api_config() -> Result<ApiConfig> {
    let config_path = get_config_path();
    if !config_path.exists() {
        tracing::debug!("No config file at {:?}, using environment only", config_path);
        return Ok(ApiConfig::default());
    }

    let builder = Config::builder()
        .add_source(File::from(config_path))
        .build()?;

    Ok(builder.try_deserialize()?)
}

fn resolve_api_key(config: &ApiConfig) -> Result<String> {
    config
        .api_keys
        .as_ref()
        .and_then(|keys| keys.gemini_api_key.clone())
        .filter(|key| !key.trim().is_empty())
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .or_else(|| std::env::var("API_KEY").ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing gemini_api_key in {:?} and no GEMINI_API_KEY in the environment",
                get_config_path()
            )
        })
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("leadgen").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
