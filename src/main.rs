use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use study_ai::config::Config;
use study_ai::{build_controller, server};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    let bind = config.bind_addr()?;

    let controller = Arc::new(build_controller(&config)?);
    let router = server::router(controller, config.server.bearer_token.clone());

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        %bind,
        model = %config.gemini.model,
        auth = %config.server.bearer_token.as_deref().map(|_| "bearer").unwrap_or("none"),
        "Starting StudyAI server"
    );

    axum::serve(listener, router).await?;
    Ok(())
}
