use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use leadgen_api::backend::schema::{CONTACTS_SCHEMA_VERSION, CONTACT_COLUMNS};
use leadgen_api::config::ApiConfig;
use leadgen_api::handlers;
use leadgen_api::helpers::backend::connect;
use leadgen_api::AppState;
use tracing_subscriber::prelude::*;

#[get("/health")]
async fn health(state: web::Data<AppState>) -> impl Responder {
    match state.try_backend() {
        Some(backend) => {
            let missing_columns = backend
                .contacts_schema
                .as_ref()
                .map(|schema| schema.missing(CONTACT_COLUMNS))
                .unwrap_or_default();
            HttpResponse::Ok().json(serde_json::json!({
                "status": "healthy",
                "backend": "connected",
                "backend_url": backend.client.base_url(),
                "contacts_schema_version": CONTACTS_SCHEMA_VERSION,
                "contacts_schema_discovered": backend.contacts_schema.is_some(),
                "missing_columns": missing_columns,
            }))
        }
        None => HttpResponse::Ok().json(serde_json::json!({
            "status": "degraded",
            "backend": "not_configured"
        })),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("leadgen-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let (config, config_path) = ApiConfig::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    tracing::info!("Loaded config from {}", config_path.display());

    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };

    let backend = connect(&config).await;
    let cors_config = config.cors.clone();
    let state = AppState::new(config, config_path, backend.clone());

    // Shared email settings and logo win over the local copy.
    if let Some(backend) = backend {
        handlers::settings::pull_remote_settings(&state, &backend).await;
    }

    tracing::info!("Starting server on {}:{}", host, port);

    let server = HttpServer::new(move || {
        let cors = if let Some(cors_config) = &cors_config {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .expose_headers(vec!["Content-Disposition"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .expose_headers(vec!["Content-Disposition"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PayloadConfig::new(10 * 1024 * 1024))
            .app_data(web::JsonConfig::default().limit(20 * 1024 * 1024))
            .service(health)
            .route("/settings", web::get().to(handlers::settings::get_settings))
            .route("/settings/backend", web::post().to(handlers::settings::update_backend))
            .route("/settings/email", web::post().to(handlers::settings::update_email))
            .route("/settings/logo", web::post().to(handlers::settings::update_logo))
            .route("/settings/api-keys", web::post().to(handlers::settings::update_api_keys))
            .route("/api/contacts", web::get().to(handlers::contacts::list_contacts))
            .route("/api/contacts", web::post().to(handlers::contacts::create_contact))
            .route("/api/contacts/import", web::post().to(handlers::contacts::import_contacts))
            .route("/api/contacts/template", web::get().to(handlers::contacts::download_template))
            .route("/api/contacts/{id}", web::get().to(handlers::contacts::get_contact))
            .route("/api/contacts/{id}", web::put().to(handlers::contacts::update_contact))
            .route("/api/contacts/{id}", web::delete().to(handlers::contacts::delete_contact))
            .route("/api/contacts/{id}/events", web::get().to(handlers::contacts::list_contact_events))
            .route("/api/reports/contacts.csv", web::get().to(handlers::reports::export_contacts_csv))
            .route("/api/reports/summary", web::get().to(handlers::reports::get_summary))
            .route("/api/templates", web::get().to(handlers::templates::list_templates))
            .route("/api/templates", web::post().to(handlers::templates::create_template))
            .route("/api/templates/{id}", web::get().to(handlers::templates::get_template))
            .route("/api/templates/{id}", web::delete().to(handlers::templates::delete_template))
            .route("/api/ai/scan-card", web::post().to(handlers::ai::scan_card))
            .route("/api/ai/enrich", web::post().to(handlers::ai::enrich))
            .route("/api/ai/edit-image", web::post().to(handlers::ai::edit_image))
            .route("/api/campaigns/generate", web::post().to(handlers::campaigns::generate))
            .route("/api/campaigns/send", web::post().to(handlers::campaigns::send))
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    server.await
}
