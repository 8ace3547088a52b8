//! Chat-completion access.
//!
//! The engine only ever needs one operation from a model: turn a
//! diagnosis prompt into text. The [`ChatClient`] trait keeps that
//! boundary narrow so tests can substitute canned replies, and so a
//! failed call is a typed outcome the orchestrator matches on: the LLM
//! failing is a normal branch of the pipeline, not an exception.

pub mod openai;
pub mod prompt;

pub use openai::OpenAiChatClient;
pub use prompt::build_diagnosis_prompt;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a completion call. All of them degrade to the fallback
/// generator upstream; none reach the engine's caller.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Provider error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider returned empty content")]
    EmptyResponse,
}

/// Minimal chat-completion interface.
#[async_trait]
pub trait ChatClient: Send + Sync + 'static {
    /// Run one prompt to completion and return the raw reply text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}
