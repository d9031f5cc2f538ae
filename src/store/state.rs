//! Chat state and its update operations
//!
//! [`ChatState`] is a plain value: the active session, its message log, the
//! session roster and the pending-reply flag. Every mutation goes through a
//! method here so the invariants hold in one place:
//!
//! - timestamps in the log never decrease
//! - at most one reply is pending
//! - results issued for a session that is no longer active are dropped
//!
//! The `epoch` counter changes whenever the active session is replaced, so a
//! [`SessionTicket`] taken before an await can tell whether its result is
//! still relevant.

use crate::gateway::{Message, SessionSummary};
use crate::store::session::mint_message_id;
use chrono::{DateTime, Utc};

/// Identifies the active session at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    session_id: String,
    epoch: u64,
}

impl SessionTicket {
    /// Session the ticket was issued for
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Epoch the ticket was issued in
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// A prompt that has been appended optimistically and awaits its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    ticket: SessionTicket,
    prompt: String,
}

impl PendingSend {
    /// Prompt text as it was appended
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Session the prompt belongs to
    pub fn session_id(&self) -> &str {
        self.ticket.session_id()
    }

    /// Ticket of the session the prompt was sent from
    pub fn ticket(&self) -> &SessionTicket {
        &self.ticket
    }
}

/// What happened to a reply when it resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyDisposition {
    /// Appended to the active log
    Appended,
    /// The active session changed while waiting; the reply was dropped
    DiscardedStale,
}

/// State of the chat view
#[derive(Debug, Clone)]
pub struct ChatState {
    active_session_id: String,
    messages: Vec<Message>,
    roster: Vec<SessionSummary>,
    awaiting_reply: bool,
    epoch: u64,
}

impl ChatState {
    /// Create an empty state for a session
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            active_session_id: session_id.into(),
            messages: Vec::new(),
            roster: Vec::new(),
            awaiting_reply: false,
            epoch: 0,
        }
    }

    /// Active session identifier
    pub fn active_session_id(&self) -> &str {
        &self.active_session_id
    }

    /// Message log of the active session, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Known sessions
    pub fn roster(&self) -> &[SessionSummary] {
        &self.roster
    }

    /// Whether a reply is pending
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Counter bumped whenever the active session is replaced
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Ticket for the active session
    pub fn ticket(&self) -> SessionTicket {
        SessionTicket {
            session_id: self.active_session_id.clone(),
            epoch: self.epoch,
        }
    }

    /// Whether `ticket` still names the active session
    pub fn is_current(&self, ticket: &SessionTicket) -> bool {
        ticket.epoch == self.epoch && ticket.session_id == self.active_session_id
    }

    /// Most recent assistant message
    pub fn last_assistant_reply(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }

    /// Replace the active session and seed its log
    pub fn replace_session(&mut self, session_id: impl Into<String>, seed: Vec<Message>) {
        self.active_session_id = session_id.into();
        self.messages = seed;
        self.epoch += 1;
    }

    /// Make another session active with an empty log
    ///
    /// Returns `false` and leaves everything untouched when `session_id` is
    /// already active.
    pub fn switch_to(&mut self, session_id: &str) -> bool {
        if session_id == self.active_session_id {
            return false;
        }
        self.replace_session(session_id, Vec::new());
        true
    }

    /// Install fetched history if `ticket` is still current
    pub fn apply_history(&mut self, ticket: &SessionTicket, messages: Vec<Message>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.messages = messages;
        true
    }

    /// Replace the roster
    pub fn set_roster(&mut self, roster: Vec<SessionSummary>) {
        self.roster = roster;
    }

    /// Start a send: append the user's message and mark a reply pending
    ///
    /// Returns `None` without touching the state when `text` is blank or a
    /// reply is already pending.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use tutorchat::store::ChatState;
    ///
    /// let mut state = ChatState::new("default");
    /// assert!(state.begin_send("   ", Utc::now()).is_none());
    ///
    /// let pending = state.begin_send("What is a monad?", Utc::now()).unwrap();
    /// assert!(state.is_awaiting_reply());
    /// assert!(state.begin_send("again", Utc::now()).is_none());
    ///
    /// state.complete_send(pending, "A burrito.".to_string(), Utc::now());
    /// assert_eq!(state.messages().len(), 2);
    /// assert!(!state.is_awaiting_reply());
    /// ```
    pub fn begin_send(&mut self, text: &str, now: DateTime<Utc>) -> Option<PendingSend> {
        if text.trim().is_empty() || self.awaiting_reply {
            return None;
        }

        let timestamp = self.next_timestamp(now);
        self.messages
            .push(Message::user(mint_message_id(), text, timestamp));
        self.awaiting_reply = true;

        Some(PendingSend {
            ticket: self.ticket(),
            prompt: text.to_string(),
        })
    }

    /// Finish a send: append the reply and clear the pending flag
    ///
    /// The flag is cleared in every case. The reply is dropped when the
    /// session the prompt came from is no longer active.
    pub fn complete_send(
        &mut self,
        pending: PendingSend,
        reply: String,
        now: DateTime<Utc>,
    ) -> ReplyDisposition {
        self.awaiting_reply = false;

        if !self.is_current(&pending.ticket) {
            return ReplyDisposition::DiscardedStale;
        }

        let timestamp = self.next_timestamp(now);
        self.messages
            .push(Message::assistant(mint_message_id(), reply, timestamp));
        ReplyDisposition::Appended
    }

    /// Clear the pending flag without a reply, returning its previous value
    pub(crate) fn clear_awaiting_reply(&mut self) -> bool {
        std::mem::replace(&mut self.awaiting_reply, false)
    }

    fn next_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        }
    }
}
