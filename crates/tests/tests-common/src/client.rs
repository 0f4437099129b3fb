//! Drive a router in-process.

use axum::http::StatusCode;
use axum_test_helper::{RequestBuilder, TestClient};

/// What a test needs from a response.
#[derive(Debug)]
pub struct JsonResponse {
    pub status: StatusCode,
    /// The `x-total-count` header, when present.
    pub total_count: Option<i64>,
    /// The body as JSON, or `Null` when the body is empty.
    pub body: serde_json::Value,
}

pub fn client(router: axum::Router) -> TestClient {
    TestClient::new(router)
}

pub async fn get(client: &TestClient, url: &str) -> JsonResponse {
    send(client.get(url)).await
}

pub async fn delete(client: &TestClient, url: &str) -> JsonResponse {
    send(client.delete(url)).await
}

pub async fn post(client: &TestClient, url: &str, body: &serde_json::Value) -> JsonResponse {
    send(with_json(client.post(url), body)).await
}

pub async fn put(client: &TestClient, url: &str, body: &serde_json::Value) -> JsonResponse {
    send(with_json(client.put(url), body)).await
}

pub async fn patch(client: &TestClient, url: &str, body: &serde_json::Value) -> JsonResponse {
    send(with_json(client.patch(url), body)).await
}

fn with_json(request: RequestBuilder, body: &serde_json::Value) -> RequestBuilder {
    request
        .body(body.to_string())
        .header("Content-Type", "application/json")
}

async fn send(request: RequestBuilder) -> JsonResponse {
    let response = request.send().await;
    let status = response.status();
    let total_count = response
        .headers()
        .get("x-total-count")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok());
    let text = response.text().await;
    let body = if text.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&text).expect("response body is not JSON")
    };
    JsonResponse {
        status,
        total_count,
        body,
    }
}
