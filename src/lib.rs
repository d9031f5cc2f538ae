//! tutorchat - terminal client for an AI tutor service
//!
//! This library provides the pieces of the `tutorchat` CLI: a gateway to
//! the tutor backend, the chat session store, and the terminal
//! presentation layer.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `gateway`: Backend API client (`Gateway` trait, `HttpGateway`)
//! - `store`: Chat state and the operations that change it
//! - `ui`: Message styling, chat view, tables and the start screen
//! - `profile`: Local learner profile and stats
//! - `commands`: Handlers for each CLI command
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tutorchat::{ChatStore, Config, HttpGateway, UserIdentity};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let gateway = Arc::new(HttpGateway::new(&config.gateway)?);
//!     let mut store = ChatStore::new(gateway, UserIdentity::anonymous(), None);
//!     store.initialize().await;
//!     store.send_message("Give me a vocabulary quiz").await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod profile;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TutorError};
pub use gateway::{Gateway, GatewayError, HttpGateway, Message, Sender, SessionSummary};
pub use store::{ChatState, ChatStore, SendOutcome, UserIdentity};

#[cfg(test)]
pub mod test_utils;
