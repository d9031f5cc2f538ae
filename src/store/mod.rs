//! Session and message store
//!
//! [`ChatStore`] owns the [`ChatState`] and a [`Gateway`], and is the only
//! place where the chat state changes. The presentation layer calls its
//! operations directly and can register a [`StateObserver`] to be told
//! about each change.
//!
//! Backend failures never escape: history falls back to the welcome
//! message, the roster to empty, replies to [`FALLBACK_REPLY`]. Only a
//! failed clear produces a user-facing [`Notice`].

pub mod session;
pub mod state;

pub use session::{
    mint_session_id, welcome_message, welcome_text, UserIdentity, ANONYMOUS_USER_ID,
    ANONYMOUS_USER_NAME, DEFAULT_SESSION_ID,
};
pub use state::{ChatState, PendingSend, ReplyDisposition, SessionTicket};

use crate::gateway::{Gateway, FALLBACK_REPLY};
use chrono::Utc;
use std::sync::Arc;

/// Kind of state change reported to the observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A different session became active; the log was replaced
    SessionReplaced,
    /// History for the active session was installed
    HistoryLoaded,
    /// The roster was refreshed
    RosterUpdated,
    /// A message was appended to the log
    MessageAppended,
    /// The pending-reply flag changed to the given value
    AwaitingReply(bool),
}

/// Receives every state change made by the store
pub trait StateObserver: Send {
    /// Called after the state has changed
    fn on_change(&mut self, state: &ChatState, change: Change);
}

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The action succeeded
    Success,
    /// The action failed and state was left unchanged
    Failure,
}

/// Transient user-facing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text to display
    pub text: String,
}

impl Notice {
    /// Success notice
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    /// Failure notice
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            text: text.into(),
        }
    }
}

/// Result of [`ChatStore::send_message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or a reply was already pending; nothing changed
    Rejected,
    /// The user message and a reply (real or fallback) were appended
    Replied,
    /// The session changed before the reply arrived; the reply was dropped
    Discarded,
}

/// Clears the pending-reply flag if a send is abandoned mid-flight
///
/// The observer hears `AwaitingReply(false)` so the typing line goes away.
struct PendingReplyGuard<'a> {
    state: &'a mut ChatState,
    observer: &'a mut Option<Box<dyn StateObserver>>,
}

impl Drop for PendingReplyGuard<'_> {
    fn drop(&mut self) {
        if self.state.clear_awaiting_reply() {
            tracing::debug!("Send abandoned before a reply arrived");
            notify(&mut *self.observer, &*self.state, Change::AwaitingReply(false));
        }
    }
}

fn notify(observer: &mut Option<Box<dyn StateObserver>>, state: &ChatState, change: Change) {
    if let Some(observer) = observer.as_mut() {
        observer.on_change(state, change);
    }
}

/// Owner of the chat state
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tutorchat::config::GatewayConfig;
/// use tutorchat::gateway::HttpGateway;
/// use tutorchat::store::{ChatStore, UserIdentity};
///
/// # async fn example() -> tutorchat::error::Result<()> {
/// let gateway = Arc::new(HttpGateway::new(&GatewayConfig::default())?);
/// let mut store = ChatStore::new(gateway, UserIdentity::new("ada", "Ada"), None);
/// store.initialize().await;
/// store.send_message("Explain recursion").await;
/// # Ok(())
/// # }
/// ```
pub struct ChatStore {
    gateway: Arc<dyn Gateway>,
    user: UserIdentity,
    state: ChatState,
    notices: Vec<Notice>,
    observer: Option<Box<dyn StateObserver>>,
}

impl ChatStore {
    /// Create a store for `user`, starting on `session` or the default session
    pub fn new(gateway: Arc<dyn Gateway>, user: UserIdentity, session: Option<String>) -> Self {
        let session = session.unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());
        Self {
            gateway,
            user,
            state: ChatState::new(session),
            notices: Vec::new(),
            observer: None,
        }
    }

    /// Attach an observer that is told about every change
    pub fn with_observer(mut self, observer: Box<dyn StateObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Current state
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Identity the store talks to the backend as
    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// Drain pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Text of the most recent assistant message
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.state.last_assistant_reply().map(|m| m.text.as_str())
    }

    /// Load the active session's history and the roster
    pub async fn initialize(&mut self) {
        tracing::info!(
            "Initializing chat for {} on session {}",
            self.user.id,
            self.state.active_session_id()
        );
        self.reload_history().await;
        self.refresh_roster().await;
    }

    /// Start a fresh session locally
    ///
    /// The backend only learns about the session when its first prompt is
    /// sent.
    pub fn start_new_session(&mut self) {
        let now = Utc::now();
        let session_id = mint_session_id(&self.user.id, now, self.state.active_session_id());
        tracing::info!("Starting new session {}", session_id);

        self.state
            .replace_session(session_id, vec![welcome_message(&self.user, now)]);
        notify(&mut self.observer, &self.state, Change::SessionReplaced);
    }

    /// Make `session_id` active
    ///
    /// The log is emptied; nothing is fetched. Call
    /// [`reload_history`](Self::reload_history) to load the target's
    /// messages. Returns `false` when `session_id` was already active.
    pub fn switch_session(&mut self, session_id: &str) -> bool {
        if !self.state.switch_to(session_id) {
            tracing::debug!("Session {} is already active", session_id);
            return false;
        }
        tracing::info!("Switched to session {}", session_id);
        notify(&mut self.observer, &self.state, Change::SessionReplaced);
        true
    }

    /// Fetch and install the active session's history
    ///
    /// An empty or failed fetch installs the welcome message instead. A
    /// result for a session that stopped being active while the fetch was
    /// in flight is dropped.
    pub async fn reload_history(&mut self) {
        let ticket = self.state.ticket();
        let result = self
            .gateway
            .fetch_history(&self.user.id, ticket.session_id())
            .await;

        let messages = match result {
            Ok(messages) if !messages.is_empty() => {
                tracing::debug!(
                    "Loaded {} messages for session {}",
                    messages.len(),
                    ticket.session_id()
                );
                messages
            }
            Ok(_) => vec![welcome_message(&self.user, Utc::now())],
            Err(e) => {
                tracing::warn!(
                    "Failed to load chat history for session {}: {}",
                    ticket.session_id(),
                    e
                );
                vec![welcome_message(&self.user, Utc::now())]
            }
        };

        if self.state.apply_history(&ticket, messages) {
            notify(&mut self.observer, &self.state, Change::HistoryLoaded);
        } else {
            tracing::debug!("Dropping history for inactive session {}", ticket.session_id());
        }
    }

    /// Fetch the roster; any failure yields an empty roster
    pub async fn refresh_roster(&mut self) {
        let roster = match self.gateway.fetch_sessions(&self.user.id).await {
            Ok(roster) => roster,
            Err(e) => {
                tracing::warn!("Failed to load sessions: {}", e);
                Vec::new()
            }
        };
        self.state.set_roster(roster);
        notify(&mut self.observer, &self.state, Change::RosterUpdated);
    }

    /// Send a prompt and append the reply
    ///
    /// The user's message is appended before the request goes out and is
    /// never removed. Whatever happens to the request, the pending flag is
    /// cleared when this returns or when the future is dropped.
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let pending = match self.state.begin_send(text, Utc::now()) {
            Some(pending) => pending,
            None => {
                tracing::debug!("Ignoring send: blank input or reply pending");
                return SendOutcome::Rejected;
            }
        };
        notify(&mut self.observer, &self.state, Change::MessageAppended);
        notify(&mut self.observer, &self.state, Change::AwaitingReply(true));

        let gateway = Arc::clone(&self.gateway);
        let guard = PendingReplyGuard {
            state: &mut self.state,
            observer: &mut self.observer,
        };

        let reply = match gateway
            .send_prompt(&self.user.id, pending.session_id(), pending.prompt())
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Prompt failed, using fallback reply: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };

        let disposition = guard.state.complete_send(pending, reply, Utc::now());
        drop(guard);

        let outcome = match disposition {
            ReplyDisposition::Appended => {
                notify(&mut self.observer, &self.state, Change::MessageAppended);
                SendOutcome::Replied
            }
            ReplyDisposition::DiscardedStale => {
                tracing::warn!("Reply arrived after the session changed; dropping it");
                SendOutcome::Discarded
            }
        };
        notify(&mut self.observer, &self.state, Change::AwaitingReply(false));
        outcome
    }

    /// Delete the active session on the backend and start a new one
    ///
    /// On success the roster is refreshed as well. On failure the state is
    /// left untouched and a failure notice is recorded. Returns whether the
    /// backend confirmed the clear.
    pub async fn clear_active_session(&mut self) -> bool {
        let session_id = self.state.active_session_id().to_string();
        let cleared = match self.gateway.clear_session(&self.user.id, &session_id).await {
            Ok(cleared) => cleared,
            Err(e) => {
                tracing::warn!("Failed to clear session {}: {}", session_id, e);
                false
            }
        };

        if cleared {
            tracing::info!("Cleared session {}", session_id);
            self.start_new_session();
            self.refresh_roster().await;
            self.notices.push(Notice::success("Chat cleared successfully!"));
        } else {
            self.notices
                .push(Notice::failure("Error clearing chat. Please try again."));
        }
        cleared
    }
}
