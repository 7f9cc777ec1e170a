//! Integration tests against a real listener.
//!
//! The application is bound to a random port with the mock provider and
//! exercised over HTTP with reqwest.

use campus_service::config::CampusConfig;
use campus_service::services::providers::mock::MockCompletionProvider;
use campus_service::startup::Application;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Spawn the application on a random port and return the port number.
async fn spawn_app() -> u16 {
    let app = Application::build(
        CampusConfig::for_tests(),
        Arc::new(MockCompletionProvider::fixed("A friendly reminder")),
    )
    .await
    .expect("Failed to build application");

    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for server to be ready by polling health endpoint
    let client = Client::new();
    let health_url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        if client.get(&health_url).send().await.is_ok() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    port
}

#[tokio::test]
async fn health_check_returns_ok() {
    let port = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "campus-service");
}

#[tokio::test]
async fn parent_message_over_http() {
    let port = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("http://127.0.0.1:{}/parent-message", port))
        .json(&serde_json::json!({ "context": "Annual sports day on 12 March" }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, serde_json::json!({ "message": "A friendly reminder" }));
}
