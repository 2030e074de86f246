use std::time::Duration;

use mockito::Matcher;
use secrecy::SecretString;
use signal_notifier::{DeliveryError, Notifier, RetryPolicy, TelegramNotifier, deliver_with_retry};

fn notifier(base_url: String) -> TelegramNotifier {
    TelegramNotifier::new(SecretString::new("123:ABC".into()), "42", Duration::from_secs(2))
        .unwrap()
        .with_base_url(base_url)
}

#[tokio::test]
async fn posts_chat_id_and_text_as_form() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/bot123:ABC/sendMessage")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("chat_id".into(), "42".into()),
            Matcher::UrlEncoded("text".into(), "📊 GOLD SIGNAL".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"ok":true,"result":{"message_id":1}}"#)
        .create_async()
        .await;

    notifier(server.url()).send("📊 GOLD SIGNAL").await.expect("delivered");
    m.assert_async().await;
}

#[tokio::test]
async fn non_200_is_rejected_with_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/bot123:ABC/sendMessage")
        .with_status(400)
        .with_body(r#"{"ok":false,"description":"Bad Request: chat not found"}"#)
        .create_async()
        .await;

    let err = notifier(server.url()).send("hello").await.unwrap_err();
    match err {
        DeliveryError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("chat not found"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_errors_do_not_leak_the_token() {
    // Nothing listens on this port.
    let err = notifier("http://127.0.0.1:9".to_string())
        .send("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Transport(_)));
    assert!(!err.to_string().contains("123:ABC"), "{err}");
}

#[tokio::test]
async fn retry_stops_at_first_success() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/bot123:ABC/sendMessage")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let policy = RetryPolicy {
        max_attempts: 3,
        backoff_step: Duration::from_millis(5),
    };
    let attempts = deliver_with_retry(&notifier(server.url()), "hello", &policy)
        .await
        .unwrap();
    assert_eq!(attempts, 1);
    m.assert_async().await;
}

#[tokio::test]
async fn retry_exhausts_against_failing_server() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/bot123:ABC/sendMessage")
        .with_status(502)
        .expect(3)
        .create_async()
        .await;

    let policy = RetryPolicy {
        max_attempts: 3,
        backoff_step: Duration::from_millis(5),
    };
    let err = deliver_with_retry(&notifier(server.url()), "hello", &policy)
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Rejected { status: 502, .. }));
    m.assert_async().await;
}
