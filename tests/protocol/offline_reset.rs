use ruach_compass::config::GenerationConfig;
use ruach_compass::content::{ResetRequest, Source, TriggerType};
use ruach_compass::generation::Orchestrator;
use ruach_compass::llm::GeminiProvider;
use ruach_compass::protocol::{ChannelObserver, DriveOutcome, Phase, RuntimeEvent, drive};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator(server: &MockServer) -> Arc<Orchestrator> {
    let provider = GeminiProvider::new(Some("test-key"), 5).with_base_url(&server.uri());
    Arc::new(
        Orchestrator::new(
            Arc::new(provider),
            "gemini-2.0-flash",
            Duration::from_secs(5),
            GenerationConfig::default(),
        )
        .expect("orchestrator should build"),
    )
}

fn request(trigger: TriggerType, use_fallback: bool) -> ResetRequest {
    ResetRequest {
        trigger,
        context_summary: None,
        use_fallback,
    }
}

#[tokio::test]
async fn offline_reset_plays_the_catalog_protocol_without_network() {
    let server = MockServer::start().await;
    let orchestrator = orchestrator(&server);

    let generated = orchestrator
        .reset(&request(TriggerType::Loneliness, true))
        .await;
    assert_eq!(generated.source, Source::Fallback);
    assert_eq!(generated.body.trigger, TriggerType::Loneliness);
    assert!(!generated.body.steps.is_empty());

    let received = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    assert!(received.is_empty(), "offline mode must not call the model");

    // Let the step timers run on virtual time.
    tokio::time::pause();
    let total = generated.body.steps.len();
    let (_tx, rx) = mpsc::channel(1);
    let (observer, mut events) = ChannelObserver::new();
    let body = generated.body.clone();

    let outcome = drive(async move { body }, rx, &observer).await;

    assert_eq!(outcome, DriveOutcome::Completed);
    let mut last = None;
    while let Ok((event, state)) = events.try_recv() {
        last = Some((event, state));
    }
    let (event, state) = last.expect("observer should see events");
    assert_eq!(event, RuntimeEvent::Completed);
    assert_eq!(state.phase, Phase::Complete);
    assert_eq!(state.total_steps, total);
}

#[tokio::test]
async fn model_reset_keeps_requested_trigger_through_playback() {
    let server = MockServer::start().await;
    let payload = json!({
        "trigger": "anger",
        "steps": [
            { "type": "label", "titleRu": "Назови", "contentRu": "Это тревога.", "durationSeconds": 5 },
            { "type": "breath", "titleRu": "Дыши", "contentRu": "Вдох, выдох.", "durationSeconds": 0 }
        ],
        "trustAnchorRu": "Ты справишься."
    });
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": format!("```json\n{payload}\n```") }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator = orchestrator(&server);
    let generated = orchestrator
        .reset(&request(TriggerType::Uncertainty, false))
        .await;

    assert_eq!(generated.source, Source::Ai);
    assert_eq!(generated.body.trigger, TriggerType::Uncertainty);
    assert_eq!(generated.body.steps.len(), 2);

    tokio::time::pause();
    let started = Instant::now();
    let (_tx, rx) = mpsc::channel(1);
    let (observer, mut events) = ChannelObserver::new();
    let body = generated.body;

    let outcome = drive(async move { body }, rx, &observer).await;
    assert_eq!(outcome, DriveOutcome::Completed);
    assert!(started.elapsed() >= Duration::from_secs(15));

    let durations: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|(event, _)| match event {
            RuntimeEvent::StepEntered { duration, .. } => Some(duration.as_secs()),
            _ => None,
        })
        .collect();
    // A zero duration plays for the default step length.
    assert_eq!(durations, [5, 10]);
}

#[tokio::test]
async fn unreachable_model_still_yields_a_playable_protocol() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(&server);
    let generated = orchestrator
        .reset(&request(TriggerType::Shame, false))
        .await;

    assert_eq!(generated.source, Source::Fallback);
    assert_eq!(generated.body.trigger, TriggerType::Shame);
    assert!(
        generated
            .body
            .steps
            .iter()
            .all(|step| step.positive_duration_secs().is_some())
    );
}
