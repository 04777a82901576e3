use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use clinicdesk::config::AppConfig;
use clinicdesk::db;
use clinicdesk::handlers;
use clinicdesk::services::classifier::RuleClassifier;
use clinicdesk::services::faq::KeywordFaq;
use clinicdesk::services::sessions::SessionStore;
use clinicdesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let faq = KeywordFaq::from_file(&config.faq_data_path);

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        sessions: SessionStore::new(),
        config: config.clone(),
        classifier: Box::new(RuleClassifier::default()),
        faq: Box::new(faq),
    });

    // The browser chat widget is served from another origin, hence the
    // permissive CORS layer.
    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat", post(handlers::chat::chat))
        .route(
            "/api/calendar/availability",
            get(handlers::calendar::get_availability),
        )
        .route("/api/calendar/book", post(handlers::calendar::book))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
