use crate::content::{
    ContentKind, Generated, QuestGenerationRequest, ResetRequest, SafetyCheckRequest,
    SafetyVerdict, ScriptGenerationRequest, Shape, validate_str,
};
use crate::error::{ValidationError, ValidationIssue};
use crate::fallback::{CRISIS_RESOURCES_DE, CrisisResource, SAFETY_INTERVENTION_MESSAGE_RU};
use crate::generation::{PROMPT_VERSIONS, prompt_version};
use crate::ratelimit::{EndpointClass, Identity};
use crate::store::{self, DAILY_STATE_KIND, QUEST_SET_KIND, RecordKey};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::AppState;
use super::defense::{RATE_LIMIT_REMAINING_HEADER, Rejection};
use super::identity::resolve_identity;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// An admitted request: who sent it, its parsed body, and how much of the
/// window is left.
struct Admitted<T> {
    request_id: Uuid,
    identity: Identity,
    body: T,
    remaining: u32,
}

/// Identity, then rate limit, then body validation. Nothing external is
/// touched until all three pass.
fn admit<T: Shape>(
    state: &AppState,
    headers: &HeaderMap,
    class: EndpointClass,
    body: &Bytes,
) -> Result<Admitted<T>, Rejection> {
    let request_id = Uuid::new_v4();
    let identity = resolve_identity(headers, state.identity.as_ref(), state.require_user_auth)?;

    let remaining = state
        .rate_limiter
        .try_acquire(&identity, class)
        .into_result(&identity)?;

    let text = std::str::from_utf8(body).map_err(|_| {
        ValidationError::from(vec![ValidationIssue::new("", "body must be UTF-8 JSON")])
    })?;
    let body = validate_str::<T>(text)?;

    Ok(Admitted {
        request_id,
        identity,
        body,
        remaining,
    })
}

fn refuse(class: EndpointClass, rejection: Rejection) -> Response {
    warn!(endpoint = %class, reason = rejection.reason(), "gateway.rejected");
    rejection.into_response()
}

fn respond<T: Serialize>(
    class: EndpointClass,
    admitted: &Admitted<impl Sized>,
    generated: &Generated<T>,
) -> Response {
    info!(
        request_id = %admitted.request_id,
        endpoint = %class,
        identity = %admitted.identity,
        source = %generated.source,
        intervention = generated.intervention,
        "gateway.served"
    );
    with_admission_headers(admitted, Json(generated))
}

fn with_admission_headers(admitted: &Admitted<impl Sized>, body: impl IntoResponse) -> Response {
    let mut response = (StatusCode::OK, body).into_response();
    let headers = response.headers_mut();
    headers.insert(
        RATE_LIMIT_REMAINING_HEADER,
        HeaderValue::from(admitted.remaining),
    );
    if let Ok(value) = HeaderValue::from_str(&admitted.request_id.to_string()) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Runs the safety gate over a free-text field. `Some` only when the verdict
/// asks for an intervention, in which case generation must be skipped.
async fn blocking_verdict(state: &AppState, text: Option<&str>) -> Option<SafetyVerdict> {
    let text = text.map(str::trim).filter(|text| !text.is_empty())?;
    let verdict = state.safety.check(text).await;
    verdict.requires_intervention.then_some(verdict)
}

/// Best-effort write; failures are logged and never change the response.
async fn persist<T: Serialize + Sync>(state: &AppState, key: &RecordKey, value: &T) {
    if let Err(error) = store::put_json(state.store.as_ref(), key, value).await {
        warn!(
            store = state.store.name(),
            kind = %key.kind,
            error = %error,
            "gateway.persist_failed"
        );
    }
}

/// GET /health: always public
pub(super) async fn handle_health() -> impl IntoResponse {
    let versions: serde_json::Map<String, serde_json::Value> = PROMPT_VERSIONS
        .iter()
        .map(|(kind, version)| (kind.to_string(), serde_json::Value::from(*version)))
        .collect();
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "ruach-compass-api",
        "version": env!("CARGO_PKG_VERSION"),
        "promptVersions": versions,
    }))
}

/// GET /health/ready: 503 until a model key is configured
pub(super) async fn handle_ready(State(state): State<AppState>) -> impl IntoResponse {
    if state.orchestrator.provider_configured() {
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ready",
                "provider": state.orchestrator.provider_name(),
                "gemini": "configured"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "not_ready",
                "reason": "GEMINI_API_KEY not configured"
            })),
        )
    }
}

/// Any unrouted path
pub(super) async fn handle_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not found",
            "errorRu": "Маршрут не найден"
        })),
    )
}

/// POST /ai/quests
pub(super) async fn handle_quests(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let class = EndpointClass::Quests;
    let admitted = match admit::<QuestGenerationRequest>(&state, &headers, class, &body) {
        Ok(admitted) => admitted,
        Err(rejection) => return refuse(class, rejection),
    };
    let request = &admitted.body;

    if let Some(verdict) = blocking_verdict(&state, request.daily_state.notes.as_deref()).await {
        let generated = Generated::intervention(
            state.orchestrator.fallback().intervention(verdict.flags),
            prompt_version(ContentKind::Quests),
            SAFETY_INTERVENTION_MESSAGE_RU,
        );
        return respond(class, &admitted, &generated);
    }

    let generated = state.orchestrator.quests(request).await;

    if let Some(user_id) = admitted.identity.user_id() {
        persist(
            &state,
            &RecordKey::today(user_id, DAILY_STATE_KIND),
            &request.daily_state,
        )
        .await;
        persist(
            &state,
            &RecordKey::today(user_id, QUEST_SET_KIND),
            &generated.body,
        )
        .await;
    }

    respond(class, &admitted, &generated)
}

/// POST /ai/script
pub(super) async fn handle_script(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let class = EndpointClass::Scripts;
    let admitted = match admit::<ScriptGenerationRequest>(&state, &headers, class, &body) {
        Ok(admitted) => admitted,
        Err(rejection) => return refuse(class, rejection),
    };

    let request = &admitted.body;

    if let Some(verdict) = blocking_verdict(&state, request.context_summary.as_deref()).await {
        let mut scripts = state
            .orchestrator
            .fallback()
            .scripts(request.scenario_type, request.boundaries_style());
        scripts.safety_flags = verdict.flags;
        let generated = Generated::intervention(
            scripts,
            prompt_version(ContentKind::Scripts),
            SAFETY_INTERVENTION_MESSAGE_RU,
        );
        return respond(class, &admitted, &generated);
    }

    let generated = state.orchestrator.scripts(request).await;

    if let Some(user_id) = admitted.identity.user_id() {
        let kind = store::scripts_kind(request.scenario_type);
        persist(&state, &RecordKey::today(user_id, &kind), &generated.body).await;
    }

    respond(class, &admitted, &generated)
}

/// POST /ai/reset: `useFallback` skips the model
pub(super) async fn handle_reset(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let class = EndpointClass::Reset;
    let admitted = match admit::<ResetRequest>(&state, &headers, class, &body) {
        Ok(admitted) => admitted,
        Err(rejection) => return refuse(class, rejection),
    };

    let request = &admitted.body;

    if blocking_verdict(&state, request.context_summary.as_deref())
        .await
        .is_some()
    {
        let generated = Generated::intervention(
            state.orchestrator.fallback().reset_protocol(request.trigger),
            prompt_version(ContentKind::Reset),
            SAFETY_INTERVENTION_MESSAGE_RU,
        );
        return respond(class, &admitted, &generated);
    }

    let generated = state.orchestrator.reset(request).await;
    respond(class, &admitted, &generated)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetyResponse {
    #[serde(flatten)]
    generated: Generated<SafetyVerdict>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    crisis_resources: Vec<CrisisResource>,
}

/// POST /ai/safety
pub(super) async fn handle_safety(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let class = EndpointClass::Safety;
    let admitted = match admit::<SafetyCheckRequest>(&state, &headers, class, &body) {
        Ok(admitted) => admitted,
        Err(rejection) => return refuse(class, rejection),
    };

    let generated = state.safety.assess(&admitted.body.text).await;
    info!(
        request_id = %admitted.request_id,
        endpoint = %class,
        identity = %admitted.identity,
        source = %generated.source,
        intervention = generated.body.requires_intervention,
        "gateway.served"
    );

    let crisis_resources = if generated.body.crisis_resources_needed {
        CRISIS_RESOURCES_DE.to_vec()
    } else {
        Vec::new()
    };
    with_admission_headers(
        &admitted,
        Json(SafetyResponse {
            generated,
            crisis_resources,
        }),
    )
}
