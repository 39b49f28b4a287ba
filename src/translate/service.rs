use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::agent::pipeline::{build_pipeline, Pipeline};
use crate::agent::stateless_llm_factory::LLMFactory;
use crate::catalog::{self, LANGUAGES, MODELS};
use crate::error::TranslateError;
use crate::translate::interface::ChainInput;

/// The last accepted model/language pair and the pipeline built from it.
/// Replaced as a whole; never mutated in place.
#[derive(Debug, Clone)]
pub struct Selection {
    pub model: String,
    pub language: String,
    pub pipeline: Pipeline,
}

/// Process-wide translation configuration shared by every request.
///
/// Updates from different callers are last-write-wins: a `set_model` racing a
/// `set_language_and_translate` may land in either order, but readers only ever
/// observe a model/language pair that some accepted update produced.
pub struct TranslationService {
    factory: Arc<dyn LLMFactory>,
    current: RwLock<Arc<Selection>>,
}

impl TranslationService {
    /// Start with the default selection. Fails if the default model client cannot be built.
    pub fn new(factory: Arc<dyn LLMFactory>) -> anyhow::Result<Self> {
        Self::with_selection(factory, catalog::DEFAULT_MODEL, catalog::DEFAULT_LANGUAGE)
    }

    pub fn with_selection(
        factory: Arc<dyn LLMFactory>,
        model: &str,
        language: &str,
    ) -> anyhow::Result<Self> {
        if !catalog::is_supported_model(model) {
            anyhow::bail!("unsupported model: {}", model);
        }
        if !catalog::is_supported_language(language) {
            anyhow::bail!("unsupported language: {}", language);
        }

        let llm = factory.create_llm(model)?;
        let selection = Selection {
            model: model.to_string(),
            language: language.to_string(),
            pipeline: build_pipeline(language, llm),
        };
        info!("Translation service ready: model={}, language={}", model, language);

        Ok(Self {
            factory,
            current: RwLock::new(Arc::new(selection)),
        })
    }

    pub fn list_models(&self) -> Vec<String> {
        MODELS.iter().map(|m| m.to_string()).collect()
    }

    pub fn list_languages(&self) -> Vec<String> {
        LANGUAGES.iter().map(|l| l.to_string()).collect()
    }

    pub async fn current_selection(&self) -> Arc<Selection> {
        self.current.read().await.clone()
    }

    /// Bind a new model to the stored language. Returns the confirmation message.
    pub async fn set_model(&self, new_model: &str) -> Result<String, TranslateError> {
        if !catalog::is_supported_model(new_model) {
            warn!("Rejected model update: {}", new_model);
            return Err(TranslateError::InvalidModel(new_model.to_string()));
        }

        let mut current = self.current.write().await;
        let llm = self.factory.create_llm(new_model).map_err(|e| {
            error!("Failed to construct model {}: {:#}", new_model, e);
            TranslateError::ModelInit(format!("{:#}", e))
        })?;
        let language = current.language.clone();
        *current = Arc::new(Selection {
            model: new_model.to_string(),
            pipeline: build_pipeline(&language, llm),
            language,
        });
        drop(current);

        info!("Model updated to {}", new_model);
        Ok(format!("Model updated to {}", new_model))
    }

    /// Commit the new language, then translate `input_text` with the freshly built pipeline.
    /// The commit stands even if the upstream call fails.
    pub async fn set_language_and_translate(
        &self,
        new_language: &str,
        input_text: &str,
    ) -> Result<String, TranslateError> {
        if !catalog::is_supported_language(new_language) {
            warn!("Rejected language update: {}", new_language);
            return Err(TranslateError::InvalidLanguage(new_language.to_string()));
        }

        let selection = {
            let mut current = self.current.write().await;
            let next = Arc::new(Selection {
                model: current.model.clone(),
                language: new_language.to_string(),
                pipeline: build_pipeline(new_language, current.pipeline.llm()),
            });
            *current = next.clone();
            next
        };
        info!(
            "Language updated to {} (model={})",
            selection.language, selection.model
        );

        selection.pipeline.invoke(input_text).await.map_err(|e| {
            error!("Translation into {} failed: {:#}", selection.language, e);
            TranslateError::Upstream(format!("{:#}", e))
        })
    }

    /// Translate with a caller-chosen language through the stored model client.
    /// The selection is never changed.
    pub async fn invoke_chain(&self, input: &ChainInput) -> Result<String, TranslateError> {
        let pipeline = self.chain_pipeline(&input.language).await?;
        pipeline
            .invoke(&input.text)
            .await
            .map_err(|e| TranslateError::Invocation(format!("{:#}", e)))
    }

    /// Run every input concurrently; any unknown language rejects the whole batch
    /// before the provider is called, and the first upstream failure fails it.
    pub async fn batch_chain(&self, inputs: &[ChainInput]) -> Result<Vec<String>, TranslateError> {
        if let Some(bad) = inputs
            .iter()
            .find(|input| !catalog::is_supported_language(&input.language))
        {
            return Err(TranslateError::InvalidLanguage(bad.language.clone()));
        }

        let llm = self.current_selection().await.pipeline.llm();
        let pipelines: Vec<Pipeline> = inputs
            .iter()
            .map(|input| build_pipeline(&input.language, llm.clone()))
            .collect();
        try_join_all(
            pipelines
                .iter()
                .zip(inputs)
                .map(|(pipeline, input)| pipeline.invoke(&input.text)),
        )
        .await
        .map_err(|e| TranslateError::Invocation(format!("{:#}", e)))
    }

    async fn chain_pipeline(&self, language: &str) -> Result<Pipeline, TranslateError> {
        if !catalog::is_supported_language(language) {
            warn!("Rejected chain language: {}", language);
            return Err(TranslateError::InvalidLanguage(language.to_string()));
        }
        let llm = self.current_selection().await.pipeline.llm();
        Ok(build_pipeline(language, llm))
    }
}
