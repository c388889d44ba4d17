use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use studiobot::config::AppConfig;
use studiobot::db;
use studiobot::handlers;
use studiobot::services::ai::openai::OpenAiCompatProvider;
use studiobot::services::ai::CompletionProvider;
use studiobot::services::bot::BotEngine;
use studiobot::services::messaging::whatsapp::WhatsAppCloudProvider;
use studiobot::state::AppState;
use studiobot::DEFAULT_BUSINESS_ID;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    // The completion provider is resolved once here; the engine itself
    // never probes for optional wiring.
    let completion: Option<Box<dyn CompletionProvider>> = if config.ai_api_key.is_empty() {
        tracing::info!("AI_API_KEY not set, fallback generator disabled");
        None
    } else {
        tracing::info!("using completion provider (model: {})", config.ai_model);
        Some(Box::new(OpenAiCompatProvider::new(
            config.ai_api_key.clone(),
            config.ai_base_url.clone(),
            config.ai_model.clone(),
            Duration::from_secs(config.ai_timeout_secs),
        )))
    };

    let engine = BotEngine::new(Arc::clone(&db), DEFAULT_BUSINESS_ID, completion);

    let messaging = WhatsAppCloudProvider::new(
        config.whatsapp_token.clone(),
        config.whatsapp_phone_number_id.clone(),
        config.whatsapp_api_version.clone(),
    );

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        engine,
        messaging: Box::new(messaging),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/bot", get(handlers::chat::chat_page))
        .route("/bot/chat", post(handlers::chat::chat))
        .route("/bot/reset", post(handlers::chat::reset))
        .route("/bot/test", get(handlers::chat::test))
        .route("/webhook/whatsapp", get(handlers::webhook::verify_webhook))
        .route("/webhook/whatsapp", post(handlers::webhook::receive_webhook))
        .route("/admin", get(handlers::admin::admin_page))
        .route("/api/admin/business", get(handlers::admin::get_business))
        .route("/api/admin/business", post(handlers::admin::update_business))
        .route("/api/admin/services", get(handlers::admin::get_services))
        .route("/api/admin/services", post(handlers::admin::add_service))
        .route(
            "/api/admin/services/:id",
            post(handlers::admin::update_service),
        )
        .route(
            "/api/admin/services/:id",
            delete(handlers::admin::delete_service),
        )
        .route("/api/admin/hours", post(handlers::admin::update_hours))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
