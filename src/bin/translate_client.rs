//! Command-line front-end for the translation service.
//!
//! Usage: translate-client <model> <language> <text...>

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use llm_translate_server::client::TranslatorClient;
use llm_translate_server::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let (config, _) = Config::discover();
    let client = TranslatorClient::new(config.client_config.resolved_server_url());
    info!("Using translation service at {}", client.base_url());

    let mut args = std::env::args().skip(1);
    let model = args.next().unwrap_or_default();
    let language = args.next().unwrap_or_default();
    let text = args.collect::<Vec<_>>().join(" ");

    match client.available_models().await {
        Ok(models) => println!("Available models: {}", models.join(", ")),
        Err(e) => eprintln!("Failed to fetch available models: {}", e),
    }
    match client.available_languages().await {
        Ok(languages) => println!("Available languages: {}", languages.join(", ")),
        Err(e) => eprintln!("Failed to fetch available languages: {}", e),
    }

    match client.submit(&model, &language, &text).await {
        Ok(submission) => {
            println!("{}", submission.model_message);
            println!("Translated Text:");
            println!("{}", submission.translated_text);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
