//! Base provider trait for Quickchat
//!
//! This module defines the Provider trait every completion backend
//! implements. Providers turn a fully built prompt into model text;
//! prompt construction and failure fallbacks live in the gateway.

use crate::error::Result;
use async_trait::async_trait;

/// Provider trait for hosted completion APIs
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use quickchat::providers::Provider;
/// use quickchat::error::Result;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn generate(&self, prompt: &str) -> Result<String> {
///         Ok(prompt.to_string())
///     }
///
///     fn model(&self) -> String {
///         "echo".to_string()
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate text for a single prompt
    ///
    /// # Arguments
    ///
    /// * `prompt` - Complete prompt text sent as one user turn
    ///
    /// # Returns
    ///
    /// Returns the raw model text, which may be empty
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the model this provider targets
    fn model(&self) -> String;
}
