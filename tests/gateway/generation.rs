use crate::gateway_harness::{
    GatewayTestServer, model_answers, model_calls, model_fails, quest_request,
};
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::MockServer;

const QUEST_JSON: &str = r#"Вот план на сегодня:
```json
{
  "stateAssessment": {"ruachState": "focused", "notesRu": "Ровный день, можно творить."},
  "quests": [{
    "type": "main",
    "category": "creation",
    "titleRu": "Набросок за 20 минут",
    "whyRu": "Творчество возвращает опору.",
    "stepsRu": ["Открой блокнот", "Поставь таймер", "Рисуй без оценки"],
    "failSafeRu": "Одна линия тоже считается."
  }],
  "safetyFlags": [],
  "followupsRu": ["Что получилось?"]
}
```"#;

#[tokio::test]
async fn model_output_is_extracted_and_tagged_ai() {
    let model = MockServer::start().await;
    model_answers(&model, QUEST_JSON).await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    let response = server.post("/ai/quests", "phone-1", &quest_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.expect("quests should be json");

    assert_eq!(body["source"], "ai");
    assert_eq!(body["stateAssessment"]["ruachState"], "focused");
    assert_eq!(body["quests"][0]["titleRu"], "Набросок за 20 минут");
    assert!(body.get("intervention").is_none());
    assert_eq!(model_calls(&model).await, 1);
}

#[tokio::test]
async fn upstream_failure_is_invisible_to_the_caller() {
    let model = MockServer::start().await;
    model_fails(&model, 500).await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    for (path, request) in [
        ("/ai/quests", quest_request()),
        ("/ai/script", json!({"scenarioType": "accusation"})),
        ("/ai/reset", json!({"trigger": "overwhelm"})),
    ] {
        let response = server.post(path, "phone-1", &request).await;
        assert_eq!(response.status(), StatusCode::OK, "{path} should degrade");
        let body: Value = response.json().await.expect("fallback should be json");
        assert_eq!(body["source"], "fallback", "{path} should be tagged");
        assert!(body["promptVersion"].is_string());
    }
}

#[tokio::test]
async fn schema_mismatch_from_model_falls_back() {
    let model = MockServer::start().await;
    model_answers(&model, r#"{"scenario": "silence", "variants": {"shortRu": ""}}"#).await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    let response = server
        .post("/ai/script", "phone-1", &json!({"scenarioType": "silence"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("fallback should be json");
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["scenario"], "silence");
    for field in ["shortRu", "neutralRu", "boundaryRu", "exitRu"] {
        assert!(
            body["variants"][field].as_str().is_some_and(|s| !s.is_empty()),
            "{field} should be filled"
        );
    }
}

#[tokio::test]
async fn blocked_notes_yield_intervention_instead_of_quests() {
    let model = MockServer::start().await;
    model_answers(
        &model,
        r#"{"flags":["self_harm_risk"],"requiresIntervention":true,"crisisResourcesNeeded":true,"messageRu":"Ты не один."}"#,
    )
    .await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    let request = json!({
        "dailyState": {
            "energy": 2, "stress": 9, "focus": "relationship",
            "notes": "хочу умереть, всё бессмысленно"
        }
    });
    let response = server.post("/ai/quests", "phone-1", &request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("intervention should be json");

    assert_eq!(body["intervention"], true);
    assert_eq!(body["quests"], json!([]));
    assert_eq!(model_calls(&model).await, 1, "only the classifier may run");
}

#[tokio::test]
async fn safety_endpoint_returns_verdict_and_resources() {
    let model = MockServer::start().await;
    model_answers(
        &model,
        r#"{"flags":["crisis_detected"],"requiresIntervention":false,"crisisResourcesNeeded":true}"#,
    )
    .await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    let response = server
        .post("/ai/safety", "phone-1", &json!({"text": "кажется, я схожу с ума"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("verdict should be json");

    assert_eq!(body["source"], "ai");
    assert_eq!(body["flags"], json!(["crisis_detected"]));
    assert_eq!(body["crisisResourcesNeeded"], true);
    assert_eq!(body["crisisResources"][0]["name"], "Telefonseelsorge");
}

#[tokio::test]
async fn offline_reset_skips_the_model() {
    let model = MockServer::start().await;
    model_fails(&model, 500).await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    let response = server
        .post(
            "/ai/reset",
            "phone-1",
            &json!({"trigger": "jealousy", "useFallback": true}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("reset should be json");
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["trigger"], "jealousy");
    assert!(body["steps"].as_array().is_some_and(|s| s.len() == 5));
    assert!(body["trustAnchorRu"].is_string());
    assert_eq!(model_calls(&model).await, 0);
}

#[tokio::test]
async fn blocked_reset_context_serves_catalogue_steps() {
    let model = MockServer::start().await;
    model_answers(
        &model,
        r#"{"flags":["self_harm_risk"],"requiresIntervention":true,"crisisResourcesNeeded":true}"#,
    )
    .await;
    let server = GatewayTestServer::start(&model, |_| {}).await;

    let response = server
        .post(
            "/ai/reset",
            "phone-1",
            &json!({"trigger": "shame", "contextSummary": "не хочу жить"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("reset should be json");

    assert_eq!(body["intervention"], true);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["trigger"], "shame");
    assert!(body["steps"].as_array().is_some_and(|s| s.len() == 5));
    assert!(body["interventionMessageRu"].is_string());
    assert_eq!(model_calls(&model).await, 1, "only the classifier may run");
}
