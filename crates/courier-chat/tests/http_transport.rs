//! Integration tests for `HttpTransport` and the controller against a mock
//! backend.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use courier_chat::{
    ContextTag, EmailSummary, HttpTransport, Role, SessionController, SessionState, Transport,
    TransportError,
};

// =============================================================================
// Helpers
// =============================================================================

async fn transport_for(server: &MockServer) -> HttpTransport {
    HttpTransport::new(&server.uri()).unwrap()
}

// =============================================================================
// Transport
// =============================================================================

#[tokio::test]
async fn test_fetch_unread_today() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/emails/unread-today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "emails": [
                {"from": "Ana <ana@x.io>", "subject": "Budget", "snippet": "see attached"}
            ],
            "error": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let unread = transport_for(&server).await.fetch_unread_today().await.unwrap();

    let emails = unread.emails.unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].subject, "Budget");
    assert_eq!(emails[0].snippet.as_deref(), Some("see attached"));
    assert!(unread.error.is_none());
}

#[tokio::test]
async fn test_fetch_unread_today_tolerates_odd_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/emails/unread-today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "emails": [{"from": "Ana <ana@x.io>", "subject": 5}],
            "error": null
        })))
        .mount(&server)
        .await;

    let unread = transport_for(&server).await.fetch_unread_today().await.unwrap();

    let emails = unread.emails.unwrap();
    assert_eq!(emails[0].subject, "5");
    assert_eq!(emails[0].from, "Ana <ana@x.io>");
}

#[tokio::test]
async fn test_summarize_posts_emails_unchanged() {
    let server = MockServer::start().await;
    let email = json!({"from": "bob@x.io", "subject": "Lunch", "threadId": "t-9"});
    Mock::given(method("POST"))
        .and(path("/emails/summarize"))
        .and(body_json(json!({"emails": [email.clone()]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "Lunch plans."})))
        .expect(1)
        .mount(&server)
        .await;

    let emails: Vec<EmailSummary> = vec![serde_json::from_value(email).unwrap()];
    let digest = transport_for(&server)
        .await
        .summarize_emails(&emails)
        .await
        .unwrap();

    assert_eq!(digest.summary, "Lunch plans.");
}

#[tokio::test]
async fn test_send_chat_message_with_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "what's on today?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Two meetings.",
            "context": {"type": "calendar_events", "data": [{"summary": "Standup"}]}
        })))
        .mount(&server)
        .await;

    let reply = transport_for(&server)
        .await
        .send_chat_message("what's on today?")
        .await
        .unwrap();

    assert_eq!(reply.reply, "Two meetings.");
    assert_eq!(
        reply.context.unwrap().tag(),
        Some(ContextTag::CalendarEvents)
    );
}

#[tokio::test]
async fn test_non_success_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .await
        .send_chat_message("hi")
        .await
        .unwrap_err();

    assert_eq!(err, TransportError::Status { status: 503 });
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/emails/unread-today"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .await
        .fetch_unread_today()
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Non-pooled server: a pooled one stays listening after drop.
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);

    let err = HttpTransport::new(&uri)
        .unwrap()
        .fetch_unread_today()
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Network(_)));
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok", "service": "AI Email Assistant API"})),
        )
        .mount(&server)
        .await;

    let health = transport_for(&server).await.health().await.unwrap();
    assert!(health.is_ok());
    assert_eq!(health.service, "AI Email Assistant API");
}

// =============================================================================
// Controller over HTTP
// =============================================================================

#[tokio::test]
async fn test_summarize_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/emails/unread-today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "emails": [{"from": "ana@x.io", "subject": "Hi"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/emails/summarize"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = Arc::new(SessionState::new());
    let ctrl = SessionController::new(transport_for(&server).await, Arc::clone(&state));

    ctrl.handle_summarize().await;

    let messages = state.messages();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[0].role, Role::User);
    assert!(messages[2].text.contains("**1** unread email today"));
    assert_eq!(messages[4].text, "Something went wrong: HTTP error 500");
    assert_eq!(state.context().unwrap().tag(), Some(ContextTag::EmailList));
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_send_end_to_end_unknown_context_is_stored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Found 3 documents.",
            "context": {"type": "rag_results", "data": []}
        })))
        .mount(&server)
        .await;

    let state = Arc::new(SessionState::new());
    let ctrl = SessionController::new(transport_for(&server).await, Arc::clone(&state));

    ctrl.handle_send("search my docs").await;

    let ctx = state.context().unwrap();
    assert_eq!(ctx.kind, "rag_results");
    assert!(!courier_chat::render_context(Some(&ctx)).is_visible());
}
