mod accounts;
mod auth;
mod careers;
mod catalog;
mod config;
mod credits;
mod cv;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod notifications;
mod render;
mod routes;
mod scraping;
mod settings;
mod similarity;
mod state;
mod store;
mod survey;
mod ws;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::cv::language::WhatlangDetector;
use crate::cv::CvServices;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::render::{CvRenderer, DisabledRenderer, HttpCvRenderer};
use crate::routes::build_router;
use crate::similarity::{LlmSimilarityScorer, SimilarityScorer};
use crate::state::AppState;
use crate::store::postgres::PgStore;
use crate::store::Store;
use crate::ws::{start_heartbeat, WsManager};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PinJobs API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;
    let store: Arc<dyn Store> = Arc::new(PgStore::new(db.clone()));

    let renderer: Arc<dyn CvRenderer> = match &config.render_service_url {
        Some(url) => {
            info!("CV renderer: {url}");
            Arc::new(HttpCvRenderer::new(url.clone())?)
        }
        None => {
            info!("RENDER_SERVICE_URL not set, PDF regeneration disabled");
            Arc::new(DisabledRenderer)
        }
    };

    let scorer: Option<Arc<dyn SimilarityScorer>> = match &config.gemini_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.gemini_model.clone())?;
            info!("LLM client initialized (model: {})", llm.model());
            Some(Arc::new(LlmSimilarityScorer::new(llm)))
        }
        None => {
            info!("GEMINI_API_KEY not set, similarity scoring disabled");
            None
        }
    };

    let ws_manager = Arc::new(WsManager::new());
    let heartbeat = start_heartbeat(Arc::clone(&ws_manager));

    let state = AppState {
        db,
        config: config.clone(),
        cv: CvServices {
            store: Arc::clone(&store),
            detector: Arc::new(WhatlangDetector),
            renderer,
            scorer,
        },
        store,
        ws_manager: Arc::clone(&ws_manager),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    heartbeat.abort();
    ws_manager.shutdown_all().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
