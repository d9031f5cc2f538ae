//! Backend gateway for the AI tutor service
//!
//! The [`Gateway`] trait is the seam between the chat store and the remote
//! backend. [`HttpGateway`] is the production implementation; tests drive
//! the store with scripted doubles.
//!
//! The gateway never retries and never caches. Failures come back as a
//! typed [`GatewayError`] and the store decides how to recover.

pub mod http;
pub mod types;

pub use http::HttpGateway;
pub use types::{DatabaseHealth, HealthReport, Message, Sender, SessionSummary};

use async_trait::async_trait;
use thiserror::Error;

/// Reply shown whenever a prompt could not be answered
pub const FALLBACK_REPLY: &str = "I apologize, but I'm having trouble connecting to my AI service right now. Please check your internet connection and try again.";

/// Reply shown when the backend answered without any text
pub const EMPTY_REPLY: &str =
    "I apologize, but I couldn't generate a response at the moment. Please try again.";

/// Failure taxonomy for backend calls
///
/// An empty history or roster is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced an HTTP response
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("backend returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body, possibly empty
        body: String,
    },

    /// A 2xx payload carried an `error` field
    #[error("backend reported an error: {0}")]
    Application(String),

    /// The payload could not be decoded
    #[error("unreadable backend payload: {0}")]
    Decode(String),
}

/// Result alias for gateway calls
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Operations the chat store needs from the backend
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use tutorchat::gateway::{Gateway, GatewayResult, Message, SessionSummary};
///
/// struct EchoGateway;
///
/// #[async_trait]
/// impl Gateway for EchoGateway {
///     async fn fetch_history(&self, _user: &str, _session: &str) -> GatewayResult<Vec<Message>> {
///         Ok(Vec::new())
///     }
///     async fn fetch_sessions(&self, _user: &str) -> GatewayResult<Vec<SessionSummary>> {
///         Ok(Vec::new())
///     }
///     async fn send_prompt(&self, _user: &str, _session: &str, prompt: &str) -> GatewayResult<String> {
///         Ok(prompt.to_string())
///     }
///     async fn clear_session(&self, _user: &str, _session: &str) -> GatewayResult<bool> {
///         Ok(true)
///     }
/// }
/// ```
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch the persisted messages of one session, oldest first
    async fn fetch_history(&self, user_id: &str, session_id: &str) -> GatewayResult<Vec<Message>>;

    /// Fetch the roster of sessions known for a user
    async fn fetch_sessions(&self, user_id: &str) -> GatewayResult<Vec<SessionSummary>>;

    /// Post a prompt and return the tutor's reply text
    async fn send_prompt(
        &self,
        user_id: &str,
        session_id: &str,
        prompt: &str,
    ) -> GatewayResult<String>;

    /// Delete a session's messages; `Ok(true)` only on a 2xx response
    async fn clear_session(&self, user_id: &str, session_id: &str) -> GatewayResult<bool>;

    /// Probe backend health
    ///
    /// # Default Implementation
    ///
    /// Reports that the probe is unsupported.
    async fn health(&self) -> GatewayResult<HealthReport> {
        Err(GatewayError::Application(
            "health probe is not supported by this gateway".to_string(),
        ))
    }
}
