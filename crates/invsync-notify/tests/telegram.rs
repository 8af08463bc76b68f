//! Integration tests for `TelegramNotifier` against a local `wiremock` server.

use invsync_core::TelegramConfig;
use invsync_notify::{Notifier, TelegramNotifier};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config() -> TelegramConfig {
    TelegramConfig {
        bot_token: "123:abc".to_owned(),
        chat_id: "-100200".to_owned(),
    }
}

#[tokio::test]
async fn posts_chat_id_and_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_json(json!({"chat_id": "-100200", "text": "✅ zeroed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::with_base_url(&config(), &server.uri()).unwrap();

    assert!(notifier.notify("✅ zeroed").await);
}

#[tokio::test]
async fn rejected_message_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"ok": false})))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::with_base_url(&config(), &server.uri()).unwrap();

    assert!(!notifier.notify("hello").await);
}

#[tokio::test]
async fn unreachable_api_returns_false() {
    // Nothing listens on port 1.
    let notifier = TelegramNotifier::with_base_url(&config(), "http://127.0.0.1:1").unwrap();

    assert!(!notifier.notify("hello").await);
}
