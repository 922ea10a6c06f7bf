use std::env;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;

use config::Config;
use handlers::AppState;
use services::{
    DocumentExtractor, JsonlAuditLog, OllamaMatcher, OllamaSummarizer, RequestPipeline,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "resume_triage=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting Resume Triage Service");
    tracing::info!("Max file size: {}MB", config.max_file_size_mb);
    tracing::info!("Max concurrent requests: {}", config.max_concurrent_requests);
    tracing::info!(
        "Models: summarizer={}, matcher={} via {}",
        config.summarizer_model,
        config.matcher_model,
        config.ollama_url
    );

    if !DocumentExtractor::ocr_available() {
        tracing::warn!("Tesseract not found; image uploads will fail extraction");
    }

    let llm_timeout = Duration::from_secs(config.request_timeout_seconds);
    let pipeline = RequestPipeline::new(
        Box::new(DocumentExtractor::new()),
        Box::new(OllamaSummarizer::new(
            &config.ollama_url,
            &config.summarizer_model,
            llm_timeout,
        )?),
        Box::new(OllamaMatcher::new(
            &config.ollama_url,
            &config.matcher_model,
            llm_timeout,
        )?),
        Box::new(JsonlAuditLog::new(&config.audit_log_path)),
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };
    let app = handlers::router(state, config.max_file_size_mb * 1024 * 1024);

    // PORT wins over SERVER_PORT for platform compatibility.
    let port = env::var("PORT")
        .unwrap_or_else(|_| config.server_port.to_string())
        .parse::<u16>()
        .unwrap_or(config.server_port);

    let addr = format!("{}:{}", config.server_host, port);
    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
