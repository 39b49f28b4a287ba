use async_trait::async_trait;

use crate::agent::input_types::ChatMessage;

/// Interface for a stateless language model
/// Stateless means the LLM doesn't store memory, system prompts, or user messages
#[async_trait]
pub trait StatelessLLM: Send + Sync {
    /// Identifier of the model this client is bound to
    fn model_name(&self) -> &str;

    /// Send the composed messages and return the full completion text
    async fn chat_completion(&self, messages: &[ChatMessage]) -> anyhow::Result<String>;
}
