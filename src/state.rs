use std::sync::Arc;

use crate::agent::stateless_llm_factory::LLMFactory;
use crate::config::Config;
use crate::translate::service::TranslationService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub translator: Arc<TranslationService>,
}

impl AppState {
    pub fn new(config: Config, factory: Arc<dyn LLMFactory>) -> anyhow::Result<Self> {
        let translator = Arc::new(TranslationService::new(factory)?);
        Ok(Self { config, translator })
    }
}
