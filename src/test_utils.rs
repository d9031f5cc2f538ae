//! Test utilities for tutorchat
//!
//! A scripted [`Gateway`] double and temporary file helpers shared by the
//! unit tests.

use crate::gateway::{Gateway, GatewayError, GatewayResult, Message, SessionSummary};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Roster entry with a fixed creation time
pub fn summary(session_id: &str, message_count: usize) -> SessionSummary {
    SessionSummary {
        session_id: session_id.to_string(),
        created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        message_count,
    }
}

#[derive(Default)]
struct Calls {
    history: Vec<String>,
    prompts: Vec<(String, String)>,
    cleared: Vec<String>,
}

/// Gateway double answering from a script
///
/// Unscripted history is empty, unscripted prompts are echoed back as
/// `"echo: <prompt>"` and clears succeed.
#[derive(Default)]
pub struct ScriptedGateway {
    histories: HashMap<String, Vec<Message>>,
    history_error: Option<GatewayError>,
    sessions: Vec<SessionSummary>,
    sessions_error: Option<GatewayError>,
    replies: HashMap<String, GatewayResult<String>>,
    hang: bool,
    clear_result: Option<GatewayResult<bool>>,
    calls: Mutex<Calls>,
}

impl ScriptedGateway {
    /// Empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `messages` as the history of `session_id`
    pub fn with_history(mut self, session_id: &str, messages: Vec<Message>) -> Self {
        self.histories.insert(session_id.to_string(), messages);
        self
    }

    /// Fail every history fetch
    pub fn failing_history(mut self, error: GatewayError) -> Self {
        self.history_error = Some(error);
        self
    }

    /// Serve `sessions` as the roster
    pub fn with_sessions(mut self, sessions: Vec<SessionSummary>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Fail every roster fetch
    pub fn failing_sessions(mut self, error: GatewayError) -> Self {
        self.sessions_error = Some(error);
        self
    }

    /// Answer `prompt` with `reply`
    pub fn with_reply(mut self, prompt: &str, reply: &str) -> Self {
        self.replies
            .insert(prompt.to_string(), Ok(reply.to_string()));
        self
    }

    /// Fail `prompt` with `error`
    pub fn failing_prompt(mut self, prompt: &str, error: GatewayError) -> Self {
        self.replies.insert(prompt.to_string(), Err(error));
        self
    }

    /// Never answer any prompt
    pub fn hanging_prompts(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Answer clears with a non-2xx status
    pub fn rejecting_clear(mut self) -> Self {
        self.clear_result = Some(Ok(false));
        self
    }

    /// Fail clears with `error`
    pub fn failing_clear(mut self, error: GatewayError) -> Self {
        self.clear_result = Some(Err(error));
        self
    }

    /// Sessions whose history was requested, in order
    pub fn history_requests(&self) -> Vec<String> {
        self.calls.lock().unwrap().history.clone()
    }

    /// `(session, prompt)` pairs that were posted, in order
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().prompts.clone()
    }

    /// Sessions that were cleared, in order
    pub fn cleared(&self) -> Vec<String> {
        self.calls.lock().unwrap().cleared.clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn fetch_history(&self, _user_id: &str, session_id: &str) -> GatewayResult<Vec<Message>> {
        self.calls
            .lock()
            .unwrap()
            .history
            .push(session_id.to_string());
        if let Some(error) = &self.history_error {
            return Err(error.clone());
        }
        Ok(self.histories.get(session_id).cloned().unwrap_or_default())
    }

    async fn fetch_sessions(&self, _user_id: &str) -> GatewayResult<Vec<SessionSummary>> {
        match &self.sessions_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.sessions.clone()),
        }
    }

    async fn send_prompt(
        &self,
        _user_id: &str,
        session_id: &str,
        prompt: &str,
    ) -> GatewayResult<String> {
        self.calls
            .lock()
            .unwrap()
            .prompts
            .push((session_id.to_string(), prompt.to_string()));
        if self.hang {
            std::future::pending::<()>().await;
        }
        match self.replies.get(prompt) {
            Some(result) => result.clone(),
            None => Ok(format!("echo: {}", prompt)),
        }
    }

    async fn clear_session(&self, _user_id: &str, session_id: &str) -> GatewayResult<bool> {
        self.calls
            .lock()
            .unwrap()
            .cleared
            .push(session_id.to_string());
        self.clear_result.clone().unwrap_or(Ok(true))
    }
}
