mod config;
mod errors;
mod extraction;
mod forecast;
mod jobs;
mod llm_client;
mod mentor;
mod routes;
mod sentiment;
mod skills;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::JobSearchClient;
use crate::llm_client::AvailabilityGate;
use crate::routes::build_router;
use crate::skills::SkillTaxonomy;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting skill engine v{}", env!("CARGO_PKG_VERSION"));

    // Decide LLM availability once; handlers only read it
    let gate = AvailabilityGate::from_credential(
        config.anthropic_api_key.as_deref(),
        &config.llm_model,
        Duration::from_secs(config.llm_timeout_secs),
    );
    info!("LLM status: {}", gate.status_label());

    let taxonomy = SkillTaxonomy::load(config.skill_taxonomy_path.as_deref())?;
    info!("Skill taxonomy loaded ({} labels)", taxonomy.len());

    let jobs = JobSearchClient::new(config.serpapi_api_key.clone())
        .context("Failed to build job search client")?;
    if !jobs.is_configured() {
        info!("SERPAPI_API_KEY not set; /jobs will report service unavailable");
    }

    let state = AppState {
        gate,
        taxonomy: Arc::new(taxonomy),
        jobs,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
