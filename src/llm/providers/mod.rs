use crate::llm::{ChatMessage, UpstreamError};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleProvider;

/// A chat-completion backend: ordered role-tagged turns in, reply text out.
#[async_trait]
pub trait LlmProvider: Debug + Send + Sync {
    async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String, UpstreamError>;

    /// Whether a credential is configured at all. Providers without one are
    /// never called; the client serves canned replies instead.
    fn has_credential(&self) -> bool {
        true
    }
}
