//! Wire and domain types shared by the gateway and the store

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Who authored a message
///
/// The backend spells the assistant role `ai`; `assistant` is accepted on
/// input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The learner typing into the client
    #[serde(rename = "user")]
    User,
    /// The AI tutor
    #[serde(rename = "ai", alias = "assistant")]
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single turn in a session
///
/// Messages are immutable once created; the store only ever appends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier, unique within its session
    pub id: String,
    /// Body text exactly as authored
    pub text: String,
    /// Author role
    pub sender: Sender,
    /// Creation time (ISO-8601 on the wire)
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message authored by the user
    pub fn user(id: impl Into<String>, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::User,
            timestamp,
        }
    }

    /// Create a message authored by the assistant
    pub fn assistant(
        id: impl Into<String>,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::Assistant,
            timestamp,
        }
    }

    /// Whether the assistant authored this message
    pub fn is_assistant(&self) -> bool {
        self.sender == Sender::Assistant
    }
}

/// Roster entry for the session switcher
///
/// Carries no message bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier
    pub session_id: String,
    /// Time of the first message in the session
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Number of persisted messages
    #[serde(default)]
    pub message_count: usize,
}

/// Database section of the health report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseHealth {
    /// Whether the backend could reach its database
    #[serde(default)]
    pub connected: bool,
    /// Backend-provided detail
    #[serde(default)]
    pub message: String,
}

/// Response of `GET /api/health/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `healthy` or `unhealthy`
    pub status: String,
    /// Database connectivity
    #[serde(default)]
    pub database: DatabaseHealth,
    /// Model the backend selected at startup, if any
    #[serde(default)]
    pub selected_model: Option<String>,
    /// Backend clock at the time of the probe
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthReport {
    /// Whether the backend reports itself healthy
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Parse a backend timestamp
///
/// Accepts RFC 3339 with an offset, and naive ISO-8601 which is taken as UTC.
///
/// # Examples
///
/// ```
/// use tutorchat::gateway::types::parse_timestamp;
///
/// assert!(parse_timestamp("2024-03-01T09:30:00.123456+00:00").is_some());
/// assert!(parse_timestamp("2024-03-01T09:30:00").is_some());
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

mod timestamp {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}
