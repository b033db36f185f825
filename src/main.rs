use std::sync::Arc;

use bookrec_api::{
    api::{create_router, AppState},
    config::Config,
    services::{GeminiGenerator, PromptBuilder},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookrec_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing credentials stop the process before any route is served
    let config = Config::from_env()?;

    let generator = GeminiGenerator::from_config(&config);
    let state = AppState::new(
        Arc::new(generator),
        PromptBuilder::new(config.reason_language.clone()),
    );

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        addr = %config.bind_addr(),
        model = %config.gemini_model,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
