use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tutorchat::gateway::FALLBACK_REPLY;
use tutorchat::store::{welcome_text, NoticeLevel, DEFAULT_SESSION_ID};
use tutorchat::{ChatStore, SendOutcome, Sender, UserIdentity};

mod common;
use common::{gateway_for, message_json};

fn store_for(server: &MockServer, session: Option<&str>) -> ChatStore {
    let gateway = Arc::new(gateway_for(&server.uri()));
    ChatStore::new(
        gateway,
        UserIdentity::new("ada", "Ada"),
        session.map(str::to_string),
    )
}

#[tokio::test]
async fn test_first_load_with_empty_history_shows_welcome() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/history/"))
        .and(query_param("session_id", DEFAULT_SESSION_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sessions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sessions": []})))
        .mount(&server)
        .await;

    let mut store = store_for(&server, None);
    store.initialize().await;

    let log = store.state().messages();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].sender, Sender::Assistant);
    assert_eq!(log[0].text, welcome_text("Ada"));
}

#[tokio::test]
async fn test_backend_down_degrades_to_welcome_and_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let mut store = store_for(&server, None);
    store.initialize().await;
    assert_eq!(store.state().messages().len(), 1);
    assert!(store.state().roster().is_empty());

    let outcome = store.send_message("test").await;
    assert_eq!(outcome, SendOutcome::Replied);

    let log = store.state().messages();
    assert_eq!(log.len(), 3);
    assert_eq!((log[1].sender, log[1].text.as_str()), (Sender::User, "test"));
    assert_eq!(
        (log[2].sender, log[2].text.as_str()),
        (Sender::Assistant, FALLBACK_REPLY)
    );
    assert!(!store.state().is_awaiting_reply());
}

#[tokio::test]
async fn test_conversation_round_trip_against_backend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/history/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                message_json("1", "Hi", "user", "2024-05-01T10:00:00+00:00"),
                message_json("2", "Hello Ada", "ai", "2024-05-01T10:00:01+00:00"),
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"reply": "**Ownership** moves values."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut store = store_for(&server, Some("session_ada_1"));
    store.reload_history().await;
    store.send_message("Teach me Rust").await;

    let texts: Vec<&str> = store
        .state()
        .messages()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec!["Hi", "Hello Ada", "Teach me Rust", "**Ownership** moves values."]
    );
    assert_eq!(store.last_assistant_reply(), Some("**Ownership** moves values."));
}

#[tokio::test]
async fn test_switching_sessions_replaces_log() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/history/"))
        .and(query_param("session_id", "s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [message_json("1", "s1 only", "user", "2024-05-01T10:00:00+00:00")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/history/"))
        .and(query_param("session_id", "s2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [message_json("9", "s2 only", "ai", "2024-05-02T10:00:00+00:00")]
        })))
        .mount(&server)
        .await;

    let mut store = store_for(&server, Some("s1"));
    store.reload_history().await;
    assert_eq!(store.state().messages()[0].text, "s1 only");

    assert!(store.switch_session("s2"));
    assert!(store.state().messages().is_empty());
    store.reload_history().await;

    let texts: Vec<&str> = store
        .state()
        .messages()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(texts, vec!["s2 only"]);
}

#[tokio::test]
async fn test_clear_failure_keeps_session_and_records_notice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/clear/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = store_for(&server, Some("s1"));
    assert!(!store.clear_active_session().await);
    assert_eq!(store.state().active_session_id(), "s1");

    let notices = store.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Failure);
    assert_eq!(notices[0].text, "Error clearing chat. Please try again.");
}

#[tokio::test]
async fn test_clear_success_starts_fresh_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/clear/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "cleared"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = store_for(&server, Some("s1"));
    assert!(store.clear_active_session().await);
    assert!(store.state().active_session_id().starts_with("session_ada_"));
    assert_eq!(store.state().messages().len(), 1);
    assert_eq!(store.take_notices()[0].level, NoticeLevel::Success);
}
