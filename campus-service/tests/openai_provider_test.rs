//! OpenAI provider against a stub completions endpoint on a local port.

use axum::{http::StatusCode, routing::post, Json, Router};
use campus_service::services::providers::openai::{OpenAiCompletionProvider, OpenAiConfig};
use campus_service::services::{CompletionProvider, ProviderError};
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

type Captured = Arc<Mutex<Option<(Option<String>, Value)>>>;

/// Serve `POST /v1/completions` answering with `status` and `body`, and
/// record the authorization header and JSON body of the last request.
async fn spawn_upstream(status: StatusCode, body: Value) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(None));
    let sink = captured.clone();

    let app = Router::new().route(
        "/v1/completions",
        post(move |headers: axum::http::HeaderMap, Json(request): Json<Value>| {
            let sink = sink.clone();
            let body = body.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                *sink.lock().unwrap() = Some((auth, request));
                (status, Json(body))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1", addr), captured)
}

fn provider(base_url: String, api_key: Option<&str>) -> OpenAiCompletionProvider {
    OpenAiCompletionProvider::new(OpenAiConfig {
        api_key: api_key.map(|k| Secret::new(k.to_string())),
        base_url,
        model: "gpt-3.5-turbo-instruct".to_string(),
        max_tokens: 256,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn returns_first_choice_text() {
    let (base_url, captured) = spawn_upstream(
        StatusCode::OK,
        json!({
            "choices": [
                { "text": "\n\n1. Objectives ...", "index": 0, "finish_reason": "stop" },
                { "text": "ignored", "index": 1, "finish_reason": "stop" }
            ],
            "usage": { "prompt_tokens": 30, "completion_tokens": 120, "total_tokens": 150 }
        }),
    )
    .await;

    let text = provider(base_url, Some("sk-test"))
        .complete("Generate a lesson plan", 0.5)
        .await
        .unwrap();

    assert_eq!(text, "\n\n1. Objectives ...");

    let (auth, request) = captured.lock().unwrap().clone().expect("no request captured");
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(request["model"], "gpt-3.5-turbo-instruct");
    assert_eq!(request["prompt"], "Generate a lesson plan");
    assert_eq!(request["temperature"], 0.5);
    assert_eq!(request["max_tokens"], 256);
}

#[tokio::test]
async fn upstream_error_message_is_reported() {
    let (base_url, _) = spawn_upstream(
        StatusCode::UNAUTHORIZED,
        json!({ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" } }),
    )
    .await;

    let err = provider(base_url, Some("sk-wrong"))
        .complete("hello", 0.5)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ProviderError::ApiError(
            "OpenAI API error 401 Unauthorized: Incorrect API key provided".to_string()
        )
    );
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let (base_url, _) = spawn_upstream(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "message": "Rate limit reached" } }),
    )
    .await;

    let err = provider(base_url, Some("sk-test"))
        .complete("hello", 0.5)
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::RateLimited);
}

#[tokio::test]
async fn empty_choices_is_an_api_error() {
    let (base_url, _) = spawn_upstream(StatusCode::OK, json!({ "choices": [] })).await;

    let err = provider(base_url, Some("sk-test"))
        .complete("hello", 0.5)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ProviderError::ApiError("OpenAI returned no choices".to_string())
    );
}

#[tokio::test]
async fn content_filter_finish_reason_is_reported() {
    let (base_url, _) = spawn_upstream(
        StatusCode::OK,
        json!({ "choices": [{ "text": "", "finish_reason": "content_filter" }] }),
    )
    .await;

    let err = provider(base_url, Some("sk-test"))
        .complete("hello", 0.5)
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::ContentFiltered);
}

#[tokio::test]
async fn missing_key_never_reaches_upstream() {
    let (base_url, captured) = spawn_upstream(StatusCode::OK, json!({ "choices": [] })).await;

    let err = provider(base_url, None)
        .complete("hello", 0.5)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NotConfigured(_)));
    assert!(captured.lock().unwrap().is_none());
}

#[tokio::test]
async fn unreachable_upstream_is_a_network_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = provider(format!("http://{}/v1", addr), Some("sk-test"))
        .complete("hello", 0.5)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError(_)));
}
