use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use llm_translate_server::agent::GroqFactory;
use llm_translate_server::config::Config;
use llm_translate_server::routes;
use llm_translate_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("llm_translate_server=debug,tower_http=debug")),
        )
        .init();

    let (config, loaded_path) = Config::discover();
    match loaded_path {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => warn!("No configuration file found, using defaults"),
    }

    let factory = Arc::new(GroqFactory::new(config.provider_config.clone())?);
    let app_state = AppState::new(config.clone(), factory)?;
    let app = routes::app(app_state);

    let addr: SocketAddr = format!("{}:{}", config.system_config.host, config.system_config.port)
        .parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
