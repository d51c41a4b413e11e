//! The plan/write stages and the retrieval-augmented answer flow.

use crate::config::{ASK_COLLECTION, resolve_collection};
use crate::error::GatewayResult;
use crate::llm::{
    ANSWER_SAMPLING, ChatClient, GENERATION_SAMPLING, REASONING_SAMPLING, conversation,
};
use crate::prompts;
use crate::services::ExternalServices;

#[derive(Debug, Clone)]
pub struct Orchestrator {
    chat: ChatClient,
    services: ExternalServices,
}

impl Orchestrator {
    pub fn new(chat: ChatClient, services: ExternalServices) -> Self {
        Self { chat, services }
    }

    pub fn services(&self) -> &ExternalServices {
        &self.services
    }

    /// Asks the reasoning model how the requested content should be written.
    pub async fn think(&self, prompt: &str) -> GatewayResult<String> {
        let messages = conversation(prompts::REASONING_SYSTEM_PROMPT, prompt);
        self.chat
            .complete(
                &self.chat.config().reasoning_model,
                &messages,
                REASONING_SAMPLING,
            )
            .await
    }

    pub async fn think_documentation(&self, topic: &str) -> GatewayResult<String> {
        self.think(&prompts::documentation_plan_prompt(topic)).await
    }

    /// Asks the generation model to write content from a prompt or plan.
    pub async fn talk(&self, prompt: &str) -> GatewayResult<String> {
        let messages = conversation(prompts::GENERATION_SYSTEM_PROMPT, prompt);
        self.chat
            .complete(
                &self.chat.config().generation_model,
                &messages,
                GENERATION_SAMPLING,
            )
            .await
    }

    pub async fn talk_documentation(&self, plan: &str) -> GatewayResult<String> {
        self.talk(&prompts::documentation_write_prompt(plan)).await
    }

    /// Answers `query` from the chunks the store returns for it.
    ///
    /// An empty `collection` searches [`ASK_COLLECTION`].
    pub async fn ask(&self, query: &str, collection: &str) -> GatewayResult<String> {
        let collection = resolve_collection(collection, ASK_COLLECTION);
        let chunks = self.services.lookup_chunks(query, &collection).await?;
        log::debug!(
            "lookup in {} returned {} chunks",
            collection,
            chunks.len()
        );

        let context = prompts::context_block(chunks.iter().map(|c| c.text.as_str()));
        let messages = conversation(
            prompts::ANSWER_SYSTEM_PROMPT,
            prompts::answer_prompt(&context, query),
        );
        self.chat
            .complete(&self.chat.config().answer_model, &messages, ANSWER_SAMPLING)
            .await
    }
}
