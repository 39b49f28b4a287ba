//! Caller side of the translation service: catalog lookups and the
//! update-model-then-translate submission sequence.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::translate::interface::{
    AvailableLanguages, AvailableModels, ErrorDetail, LanguageTextRequest, TranslateResponse,
    UpdateModelRequest, UpdateModelResponse,
};

#[derive(Error, Debug)]
pub enum ClientError {
    /// A required input was empty; nothing was sent.
    #[error("Please select a model, language, and enter text for translation.")]
    Validation,

    #[error("{action} failed ({status}): {detail}")]
    Rejected {
        action: &'static str,
        status: StatusCode,
        detail: String,
    },

    #[error("{action} failed: {source}")]
    Transport {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub model_message: String,
    pub translated_text: String,
}

#[derive(Debug, Clone)]
pub struct TranslatorClient {
    client: Client,
    base_url: String,
}

impl TranslatorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn available_models(&self) -> Result<Vec<String>, ClientError> {
        let action = "Fetching available models";
        let response: AvailableModels = self.get_json(action, "/available_models/").await?;
        Ok(response.available_models)
    }

    pub async fn available_languages(&self) -> Result<Vec<String>, ClientError> {
        let action = "Fetching available languages";
        let response: AvailableLanguages = self.get_json(action, "/available_languages/").await?;
        Ok(response.available_languages)
    }

    pub async fn update_model(&self, new_model: &str) -> Result<String, ClientError> {
        let request = UpdateModelRequest {
            new_model: new_model.to_string(),
        };
        let response: UpdateModelResponse = self
            .post_json("Updating the model", "/update_model/", &request)
            .await?;
        Ok(response.message)
    }

    pub async fn update_language_and_translate(
        &self,
        new_language: &str,
        input_text: &str,
    ) -> Result<String, ClientError> {
        let request = LanguageTextRequest {
            new_language: new_language.to_string(),
            input_text: input_text.to_string(),
        };
        let response: TranslateResponse = self
            .post_json("Getting the translation", "/update_language_txt/", &request)
            .await?;
        Ok(response.translated_text)
    }

    /// Update the model, then the language with the text to translate.
    /// Any empty input fails before a request is made; a rejected model update
    /// stops the sequence before the translation is attempted.
    pub async fn submit(
        &self,
        model: &str,
        language: &str,
        text: &str,
    ) -> Result<Submission, ClientError> {
        if model.is_empty() || language.is_empty() || text.is_empty() {
            return Err(ClientError::Validation);
        }

        let model_message = self.update_model(model).await?;
        let translated_text = self.update_language_and_translate(language, text).await?;

        Ok(Submission {
            model_message,
            translated_text,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        action: &'static str,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { action, source })?;
        Self::decode(action, response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        action: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { action, source })?;
        Self::decode(action, response).await
    }

    async fn decode<T: DeserializeOwned>(
        action: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorDetail>(&text)
                .map(|e| e.detail)
                .unwrap_or(text);
            warn!("{} rejected with {}: {}", action, status, detail);
            return Err(ClientError::Rejected {
                action,
                status,
                detail,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ClientError::Transport { action, source })
    }
}
