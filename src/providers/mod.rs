//! Provider module for Quickchat
//!
//! This module contains the completion provider abstraction and the
//! Google Gemini implementation.

pub mod base;
pub mod gemini;

pub use base::Provider;
pub use gemini::GeminiProvider;

use crate::config::ProviderConfig;
use crate::error::{QuickchatError, Result};
use std::sync::Arc;

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    match config.provider_type.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.gemini.clone())?)),
        other => Err(QuickchatError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}
