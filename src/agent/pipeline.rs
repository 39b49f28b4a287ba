//! Prompt template + bound model: maps input text to translated text.

use std::sync::Arc;

use crate::agent::input_types::ChatMessage;
use crate::agent::stateless_llm::StatelessLLM;

pub const SYSTEM_TEMPLATE: &str = "Translate the following into {language}:";
pub const USER_TEMPLATE: &str = "{text}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    system: String,
}

impl PromptTemplate {
    /// Instruction with the language filled in; the user turn stays a placeholder.
    pub fn for_language(language: &str) -> Self {
        Self {
            system: SYSTEM_TEMPLATE.replace("{language}", language),
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system
    }

    /// Text is placed in the user turn verbatim.
    pub fn render(&self, text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::user(USER_TEMPLATE.replace("{text}", text)),
        ]
    }
}

#[derive(Clone)]
pub struct Pipeline {
    prompt: PromptTemplate,
    llm: Arc<dyn StatelessLLM>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("prompt", &self.prompt)
            .field("model", &self.llm.model_name())
            .finish()
    }
}

/// Compose the prompt for `language` with an already-built model client.
pub fn build_pipeline(language: &str, llm: Arc<dyn StatelessLLM>) -> Pipeline {
    Pipeline {
        prompt: PromptTemplate::for_language(language),
        llm,
    }
}

impl Pipeline {
    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    pub fn llm(&self) -> Arc<dyn StatelessLLM> {
        self.llm.clone()
    }

    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }

    /// render -> model -> plain text, no post-processing
    pub async fn invoke(&self, text: &str) -> anyhow::Result<String> {
        let messages = self.prompt.render(text);
        self.llm.chat_completion(&messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::stateless_llm::testing::StubFactory;
    use crate::agent::stateless_llm_factory::LLMFactory;
    use crate::agent::input_types::Role;

    #[test]
    fn template_substitutes_language_only() {
        let prompt = PromptTemplate::for_language("German");
        assert_eq!(prompt.system_instruction(), "Translate the following into German:");

        let messages = prompt.render("{language} <b>x</b>\n");
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "{language} <b>x</b>\n");
    }

    #[tokio::test]
    async fn invoke_passes_through_model_output() {
        let factory = StubFactory::echo();
        let llm = factory.create_llm("Gemma-7b-It").unwrap();
        let pipeline = build_pipeline("Hindi", llm);

        assert_eq!(pipeline.model_name(), "Gemma-7b-It");
        assert_eq!(pipeline.invoke(" Hi ").await.unwrap(), "Hindi: Hi ");

        let calls = factory.log.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "Translate the following into Hindi:");
        assert_eq!(calls[0].user, " Hi ");
    }
}
