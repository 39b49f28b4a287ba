use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tracing::info;

use crate::agent::stateless_llm::openai_compatible_llm::OpenAICompatibleLLM;
use crate::agent::stateless_llm::StatelessLLM;
use crate::config::{ProviderConfig, API_KEY_ENV};

/// Builds model clients bound to a model name.
/// Construction does no network I/O; it fails only when the client cannot be configured.
pub trait LLMFactory: Send + Sync {
    fn create_llm(&self, model_name: &str) -> Result<Arc<dyn StatelessLLM>>;
}

/// Factory for Groq-hosted models (OpenAI-compatible API)
pub struct GroqFactory {
    config: ProviderConfig,
    client: Client,
}

impl GroqFactory {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }
}

impl LLMFactory for GroqFactory {
    fn create_llm(&self, model_name: &str) -> Result<Arc<dyn StatelessLLM>> {
        info!("Initializing LLM: {}", model_name);

        let api_key = self.config.resolved_api_key().ok_or_else(|| {
            anyhow::anyhow!(
                "no API key configured; set provider_config.api_key or {}",
                API_KEY_ENV
            )
        })?;

        Ok(Arc::new(OpenAICompatibleLLM::new(
            model_name.to_string(),
            self.config.base_url.clone(),
            api_key,
            self.config.temperature,
            self.client.clone(),
        )))
    }
}
