use crate::gateway_harness::{GatewayTestServer, model_calls, model_fails, quest_request};
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::MockServer;

#[tokio::test]
async fn health_is_public_and_reports_prompt_versions() {
    let model = MockServer::start().await;
    let mut server = GatewayTestServer::start(&model, |_| {}).await;

    let health: Value = reqwest::get(server.url("/health"))
        .await
        .expect("health request should complete")
        .json()
        .await
        .expect("health should be json");
    assert_eq!(health["status"], "ok");
    assert!(health["promptVersions"]["reset"].is_string());

    let ready = reqwest::get(server.url("/health/ready"))
        .await
        .expect("ready request should complete");
    assert_eq!(ready.status(), StatusCode::OK);

    server.stop().await;
}

#[tokio::test]
async fn requests_without_identity_never_reach_the_model() {
    let model = MockServer::start().await;
    model_fails(&model, 500).await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    let response = reqwest::Client::new()
        .post(server.url("/ai/quests"))
        .json(&quest_request())
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = reqwest::Client::new()
        .post(server.url("/ai/quests"))
        .bearer_auth("not-a-known-token")
        .header("X-Device-Id", "phone-1")
        .json(&quest_request())
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("401 should be json");
    assert_eq!(body["errorRu"], "Необходима авторизация");

    assert_eq!(model_calls(&model).await, 0);
}

#[tokio::test]
async fn schema_violations_are_400_before_any_model_call() {
    let model = MockServer::start().await;
    model_fails(&model, 500).await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    let response = server
        .post(
            "/ai/reset",
            "phone-1",
            &json!({"trigger": "boredom"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("400 should be json");
    assert_eq!(body["error"], "Invalid request body");
    assert!(body["details"].as_array().is_some_and(|d| !d.is_empty()));

    assert_eq!(model_calls(&model).await, 0);
}

#[tokio::test]
async fn generation_window_rejects_with_retry_after() {
    let model = MockServer::start().await;
    model_fails(&model, 503).await;
    let server = GatewayTestServer::start(&model, |config| {
        config.rate_limit.generation_max = 2;
        config.rate_limit.generation_window_secs = 60;
    })
    .await;

    for _ in 0..2 {
        let ok = server
            .post("/ai/script", "phone-1", &json!({"scenarioType": "drama"}))
            .await;
        assert_eq!(ok.status(), StatusCode::OK);
    }

    let limited = server
        .post("/ai/script", "phone-1", &json!({"scenarioType": "drama"}))
        .await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = limited
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("429 should carry Retry-After");
    assert!((1..=60).contains(&retry_after));
    let body: Value = limited.json().await.expect("429 should be json");
    assert_eq!(body["retryAfter"], retry_after);

    let other_device = server
        .post("/ai/script", "phone-2", &json!({"scenarioType": "drama"}))
        .await;
    assert_eq!(other_device.status(), StatusCode::OK);

    assert_eq!(model_calls(&model).await, 3);
}

#[tokio::test]
async fn oversized_bodies_are_refused() {
    let model = MockServer::start().await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    let huge = "а".repeat(70_000);
    let response = server
        .post("/ai/safety", "phone-1", &json!({"text": huge}))
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(model_calls(&model).await, 0);
}

#[tokio::test]
async fn unknown_routes_get_localized_404() {
    let model = MockServer::start().await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    let response = reqwest::get(server.url("/ai/horoscope"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("404 should be json");
    assert_eq!(body["errorRu"], "Маршрут не найден");
}
