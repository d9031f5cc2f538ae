//! Session identity helpers
//!
//! Identifiers, the default session, and the synthesized welcome message.

use crate::gateway::Message;
use chrono::{DateTime, Utc};

/// Session used on first load when none was requested
pub const DEFAULT_SESSION_ID: &str = "default";

/// Identifier of the synthesized welcome message
pub const WELCOME_MESSAGE_ID: &str = "welcome";

/// User id used when no identity is configured
pub const ANONYMOUS_USER_ID: &str = "anonymous";

/// Display name used when no identity is configured
pub const ANONYMOUS_USER_NAME: &str = "Learner";

/// Who is chatting
///
/// The id is passed to the backend as a plain identifier; the name is only
/// used to address the learner in the welcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Backend user identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl UserIdentity {
    /// Create an identity from an id and display name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The anonymous pseudo-user
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_USER_ID, ANONYMOUS_USER_NAME)
    }
}

impl Default for UserIdentity {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Welcome text addressed to the learner
pub fn welcome_text(name: &str) -> String {
    format!(
        "Hello {}! I'm your AI tutor, ready to help you learn and grow. What would you like to explore today?",
        name
    )
}

/// Build the synthesized welcome message
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use tutorchat::store::{welcome_message, UserIdentity};
///
/// let message = welcome_message(&UserIdentity::new("u1", "Ada"), Utc::now());
/// assert!(message.text.starts_with("Hello Ada!"));
/// assert!(message.is_assistant());
/// ```
pub fn welcome_message(user: &UserIdentity, now: DateTime<Utc>) -> Message {
    Message::assistant(WELCOME_MESSAGE_ID, welcome_text(&user.name), now)
}

/// Mint a fresh session identifier
///
/// The identifier is `session_<user>_<unix micros>`. If it would collide
/// with `current` the timestamp component is bumped until it does not.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tutorchat::store::mint_session_id;
///
/// let now = Utc.timestamp_micros(1_700_000_000_000_000).unwrap();
/// let id = mint_session_id("ada", now, "default");
/// assert_eq!(id, "session_ada_1700000000000000");
/// assert_ne!(mint_session_id("ada", now, &id), id);
/// ```
pub fn mint_session_id(user_id: &str, now: DateTime<Utc>, current: &str) -> String {
    let mut micros = now.timestamp_micros();
    loop {
        let candidate = format!("session_{}_{}", user_id, micros);
        if candidate != current {
            return candidate;
        }
        micros += 1;
    }
}

/// Mint a locally unique message identifier
pub fn mint_message_id() -> String {
    ulid::Ulid::new().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_anonymous_identity() {
        let user = UserIdentity::default();
        assert_eq!(user.id, "anonymous");
        assert_eq!(user.name, "Learner");
    }

    #[test]
    fn test_welcome_message_shape() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let message = welcome_message(&UserIdentity::new("u1", "Grace"), now);
        assert_eq!(message.id, WELCOME_MESSAGE_ID);
        assert_eq!(message.timestamp, now);
        assert_eq!(
            message.text,
            "Hello Grace! I'm your AI tutor, ready to help you learn and grow. What would you like to explore today?"
        );
    }

    #[test]
    fn test_mint_session_id_embeds_user() {
        let now = Utc.timestamp_micros(42).unwrap();
        assert_eq!(mint_session_id("u-9", now, "default"), "session_u-9_42");
    }

    #[test]
    fn test_mint_session_id_avoids_current() {
        let now = Utc.timestamp_micros(42).unwrap();
        let id = mint_session_id("u", now, "session_u_42");
        assert_eq!(id, "session_u_43");
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = mint_message_id();
        let b = mint_message_id();
        assert_ne!(a, b);
    }
}
