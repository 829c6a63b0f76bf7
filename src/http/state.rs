//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::gateway::CompletionGateway;
use crate::providers::create_provider;
use crate::storage::HistoryStore;

/// Dependencies shared by the request handlers
#[derive(Clone)]
pub struct AppState {
    /// Chat history store
    pub store: Arc<HistoryStore>,
    /// Completion gateway used by `send_message`
    pub gateway: CompletionGateway,
}

impl AppState {
    /// Assemble state from explicit parts
    pub fn new(store: HistoryStore, gateway: CompletionGateway) -> Self {
        Self {
            store: Arc::new(store),
            gateway,
        }
    }

    /// Build the store and provider described by `config`
    ///
    /// # Errors
    ///
    /// Returns error if the provider cannot be created
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(&config.provider)?;
        let gateway =
            CompletionGateway::with_context_messages(provider, config.provider.context_messages);
        let store = HistoryStore::new(&config.storage.history_file);
        tracing::info!("Chat history file: {}", store.path().display());
        Ok(Self::new(store, gateway))
    }
}
