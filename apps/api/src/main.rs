mod config;
mod errors;
mod events;
mod matching;
mod routes;
mod slack_client;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::events::reply::ReplyTemplate;
use crate::matching::matcher::Matcher;
use crate::matching::store::ModelStore;
use crate::matching::tokenizer::Tokenizer;
use crate::routes::build_router;
use crate::slack_client::{LogSink, ReplySink, SlackClient};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting onboarding API v{}", env!("CARGO_PKG_VERSION"));

    // Tokenizer settings apply to both model keywords and message text
    let tokenizer =
        Tokenizer::new(config.min_token_length).with_stopwords(config.stopwords.iter());

    // Load the model once; reloads swap it atomically
    let models = ModelStore::open(&config.model_path, tokenizer.clone())
        .await
        .with_context(|| format!("Failed to load model from {}", config.model_path))?;

    let matcher = Matcher::new(tokenizer, config.max_recommendations, config.scorer.build());
    info!(
        "Matcher ready (scorer: {}, max recommendations: {})",
        matcher.scorer_name(),
        matcher.max_recommendations()
    );

    let template = ReplyTemplate::load(Path::new(&config.template_path)).await?;

    // Reply delivery: Slack when a token is configured, log-only otherwise
    let replies: Arc<dyn ReplySink> = match &config.slack_api_token {
        Some(token) => {
            info!("Slack client initialized ({})", config.slack_api_url);
            Arc::new(SlackClient::new(config.slack_api_url.clone(), token.clone())?)
        }
        None => {
            warn!("SLACK_API_TOKEN not set; replies will be logged, not posted");
            Arc::new(LogSink)
        }
    };

    // Build app state
    let state = AppState {
        models: Arc::new(models),
        matcher: Arc::new(matcher),
        template: Arc::new(template),
        replies,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
