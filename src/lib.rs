//! Quickchat - minimal web chat library
//!
//! This library provides a small chat service: conversations are kept in
//! a single JSON history file and user messages are answered by a hosted
//! model through a completion gateway.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: History document types and the file-backed store
//! - `gateway`: Prompt construction and fallback replies around a provider
//! - `providers`: Completion provider abstraction and the Gemini client
//! - `prompts`: Prompt text builders
//! - `http`: Axum router, handlers and error mapping
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use quickchat::{Config, http};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let state = http::AppState::from_config(&config)?;
//!     http::serve(&config.server.bind_addr(), state).await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod prompts;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{QuickchatError, Result};
pub use gateway::CompletionGateway;
pub use storage::{Chat, ChatMessage, HistoryDocument, HistoryStore};
