//! Completion gateway
//!
//! Wraps a [`Provider`] with the prompt conventions and failure policy of
//! the chat service: every call yields text, and any provider failure is
//! replaced by a fixed apology.

use crate::prompts::{build_brief_prompt, build_context_prompt};
use crate::providers::Provider;
use crate::storage::ChatMessage;
use std::sync::Arc;

/// Reply used when the model returns no text
pub const EMPTY_REPLY_FALLBACK: &str =
    "Sorry, I didn't understand that. Could you try asking in a different way?";

/// Reply used when the provider call fails
pub const ERROR_REPLY_FALLBACK: &str = "Oops! Something went wrong. Please try again in a moment.";

/// Default number of trailing history entries sent as context
pub const DEFAULT_CONTEXT_MESSAGES: usize = 4;

/// Turns user messages into model replies
///
/// # Examples
///
/// ```no_run
/// use quickchat::config::GeminiConfig;
/// use quickchat::gateway::CompletionGateway;
/// use quickchat::providers::GeminiProvider;
/// use std::sync::Arc;
///
/// # async fn example() -> quickchat::error::Result<()> {
/// let provider = Arc::new(GeminiProvider::new(GeminiConfig::default())?);
/// let gateway = CompletionGateway::new(provider);
/// let reply = gateway.complete("What is the capital of France?").await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CompletionGateway {
    provider: Arc<dyn Provider>,
    context_messages: usize,
}

impl CompletionGateway {
    /// Create a gateway using the default context window
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self::with_context_messages(provider, DEFAULT_CONTEXT_MESSAGES)
    }

    /// Create a gateway that sends `context_messages` history entries
    pub fn with_context_messages(provider: Arc<dyn Provider>, context_messages: usize) -> Self {
        Self {
            provider,
            context_messages,
        }
    }

    /// Number of history entries included by [`Self::complete_with_context`]
    pub fn context_messages(&self) -> usize {
        self.context_messages
    }

    /// Ask for a one-sentence answer to `message`
    pub async fn complete(&self, message: &str) -> String {
        self.run(build_brief_prompt(message)).await
    }

    /// Ask for a one-sentence answer using the tail of `history` as context
    pub async fn complete_with_context(&self, message: &str, history: &[ChatMessage]) -> String {
        self.run(build_context_prompt(message, history, self.context_messages))
            .await
    }

    async fn run(&self, prompt: String) -> String {
        match self.provider.generate(&prompt).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::warn!("Model {} returned no text", self.provider.model());
                    EMPTY_REPLY_FALLBACK.to_string()
                } else {
                    text.to_string()
                }
            }
            Err(e) => {
                tracing::error!("Error getting completion: {:#}", e);
                ERROR_REPLY_FALLBACK.to_string()
            }
        }
    }
}
