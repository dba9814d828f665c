//! Integration tests: AI generation against a mock HTTP endpoint.

use mmd_core::{Direction, EditOrigin, EditorConfig};
use mmd_editor::EditorSession;
use mmd_editor::generate::{DiagramGenerator, GenerateError, GenerateRequest, HttpGenerator};
use mmd_editor::notify::{GENERATE_FAILED, GENERATE_SUCCEEDED, NotificationKind};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::net::TcpListener;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/api/generate-diagram";

fn make_session() -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    EditorSession::new(&EditorConfig {
        seed: include_str!("fixtures/minimal.mmd").to_string(),
        direction: Direction::TB,
        ..Default::default()
    })
}

/// Base URI of a local port nothing listens on.
fn closed_port_uri() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn generator_for(server: &MockServer) -> HttpGenerator {
    HttpGenerator::new(ENDPOINT, Some(&server.uri())).unwrap()
}

#[tokio::test]
async fn posts_prompt_and_direction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"prompt": "two routers", "direction": "TB"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("graph TB\n  R1 --> R2"))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerateRequest {
        prompt: "two routers".into(),
        direction: Direction::TB,
    };
    let source = generator_for(&server).generate(&request).await.unwrap();
    assert_eq!(source, "graph TB\n  R1 --> R2");
}

#[tokio::test]
async fn success_replaces_text_and_records_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("graph TB\n  FW[Firewall] --> SW[Switch]"))
        .mount(&server)
        .await;

    let mut session = make_session();
    let before = session.document().history().len();

    let applied = session
        .generate_with("office firewall", &generator_for(&server), 0.0)
        .await;

    assert!(applied);
    assert!(!session.is_generating());
    assert_eq!(session.text(), "graph TB\n  FW[Firewall] --> SW[Switch]");
    assert_eq!(session.document().history().len(), before + 1);
    let last = session.document().history().current();
    assert_eq!(last.origin, EditOrigin::Generated);

    let note = session.notifications().last().unwrap();
    assert_eq!(note.kind, NotificationKind::Info);
    assert_eq!(note.message, GENERATE_SUCCEEDED);

    // the generated text is due for a render
    assert!(session.next_deadline().is_some());
}

#[tokio::test]
async fn generated_text_can_be_undone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("graph LR\n  A --> B"))
        .mount(&server)
        .await;

    let mut session = make_session();
    session
        .generate_with("anything", &generator_for(&server), 0.0)
        .await;
    assert!(session.undo(0.0));
    assert_eq!(session.text(), include_str!("fixtures/minimal.mmd"));
}

#[tokio::test]
async fn server_error_leaves_document_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let mut session = make_session();
    let before_text = session.text().to_string();
    let before_len = session.document().history().len();

    let applied = session
        .generate_with("anything", &generator_for(&server), 0.0)
        .await;

    assert!(!applied);
    assert!(!session.is_generating());
    assert_eq!(session.text(), before_text);
    assert_eq!(session.document().history().len(), before_len);

    let note = session.notifications().last().unwrap();
    assert!(note.is_error());
    assert_eq!(note.message, GENERATE_FAILED);
}

#[tokio::test]
async fn non_200_success_code_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let request = GenerateRequest {
        prompt: "x".into(),
        direction: Direction::LR,
    };
    let err = generator_for(&server).generate(&request).await.unwrap_err();
    assert!(matches!(err, GenerateError::Status(204)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let generator = HttpGenerator::new(ENDPOINT, Some(&closed_port_uri())).unwrap();

    let mut session = make_session();
    let before_text = session.text().to_string();
    let applied = session.generate_with("anything", &generator, 0.0).await;

    assert!(!applied);
    assert_eq!(session.text(), before_text);
    assert_eq!(session.document().history().len(), 1);
    let note = session.notifications().last().unwrap();
    assert!(note.is_error());
    assert_eq!(note.message, GENERATE_FAILED);

    let request = GenerateRequest {
        prompt: "x".into(),
        direction: Direction::LR,
    };
    let err = generator.generate(&request).await.unwrap_err();
    assert!(
        matches!(err, GenerateError::Transport(_)),
        "expected a transport error, got {err:?}"
    );
}
