//! Model-backed content generation with fallback degradation.
//!
//! [`Orchestrator::generate`] is the raw attempt: invoke the model, extract
//! a JSON candidate, validate it. The per-content methods wrap it and turn
//! every [`GenerationError`] into the matching [`FallbackCatalog`] entry, so
//! they never fail.

mod extract;
pub mod prompts;

pub use extract::extract_json;
pub use prompts::{PROMPT_VERSIONS, PromptCatalog, prompt_version, system_prompt};

use crate::config::{Config, GenerationConfig};
use crate::content::{
    ContentKind, Generated, QuestGenerationRequest, QuestSet, ResetProtocol, ResetRequest,
    SafetyVerdict, ScriptGenerationRequest, ScriptVariantSet, Shape, validate,
};
use crate::error::GenerationError;
use crate::fallback::FallbackCatalog;
use crate::llm::{Provider, create_provider, sanitize_api_error};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Stateless generation front-end shared by every endpoint.
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    model: String,
    timeout: Duration,
    sampling: GenerationConfig,
    prompts: PromptCatalog,
    fallback: FallbackCatalog,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: &str,
        timeout: Duration,
        sampling: GenerationConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            provider,
            model: model.to_string(),
            timeout,
            sampling,
            prompts: PromptCatalog::new()?,
            fallback: FallbackCatalog::new(),
        })
    }

    /// Orchestrator over the configured Gemini provider.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            create_provider(config),
            &config.model,
            config.request_timeout(),
            config.generation.clone(),
        )
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn provider_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Cap on a single model call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn fallback(&self) -> &FallbackCatalog {
        &self.fallback
    }

    /// One model attempt for `kind`, parsed into `T`.
    pub async fn generate<T: Shape>(
        &self,
        kind: ContentKind,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<T, GenerationError> {
        let raw = self.invoke(kind, system_prompt, user_prompt).await?;
        parse_payload(&raw, |value| value)
    }

    async fn invoke(
        &self,
        kind: ContentKind,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let sampling = self.sampling.sampling_for(kind);
        let call = self
            .provider
            .chat_with_system(system_prompt, user_prompt, &self.model, sampling);

        match tokio::time::timeout(self.timeout, call).await {
            Err(_) => Err(GenerationError::ModelUnavailable(format!(
                "timed out after {}s",
                self.timeout.as_secs()
            ))),
            Ok(Err(e)) => Err(GenerationError::ModelUnavailable(sanitize_api_error(
                &format!("{e:#}"),
            ))),
            Ok(Ok(text)) if text.trim().is_empty() => Err(GenerationError::ModelUnavailable(
                "empty response".to_string(),
            )),
            Ok(Ok(text)) => Ok(text),
        }
    }

    // ── Per-content entry points ──

    pub async fn quests(&self, request: &QuestGenerationRequest) -> Generated<QuestSet> {
        let kind = ContentKind::Quests;
        let attempt = match self.prompts.quests(request) {
            Ok(user) => self.generate(kind, prompts::QUEST_SYSTEM_PROMPT, &user).await,
            Err(e) => Err(render_failed(&e)),
        };

        let state = &request.daily_state;
        settle(kind, attempt, || {
            self.fallback.quests(state.energy, state.stress)
        })
    }

    pub async fn scripts(&self, request: &ScriptGenerationRequest) -> Generated<ScriptVariantSet> {
        let kind = ContentKind::Scripts;
        let attempt = match self.prompts.scripts(request) {
            Ok(user) => self
                .generate::<ScriptVariantSet>(kind, prompts::SCRIPT_SYSTEM_PROMPT, &user)
                .await
                .map(|mut set| {
                    set.scenario = request.scenario_type;
                    set
                }),
            Err(e) => Err(render_failed(&e)),
        };

        settle(kind, attempt, || {
            self.fallback
                .scripts(request.scenario_type, request.boundaries_style())
        })
    }

    /// Reset protocol for `request.trigger`. `useFallback` skips the model.
    pub async fn reset(&self, request: &ResetRequest) -> Generated<ResetProtocol> {
        let kind = ContentKind::Reset;
        if request.use_fallback {
            debug!(trigger = %request.trigger, "generation.reset.offline");
            return Generated::fallback(
                self.fallback.reset_protocol(request.trigger),
                prompt_version(kind),
            );
        }

        let attempt = match self.prompts.reset(request) {
            Ok(user) => match self.invoke(kind, prompts::RESET_SYSTEM_PROMPT, &user).await {
                Ok(raw) => parse_payload(&raw, |value| {
                    pin_trigger(value, &request.trigger.to_string())
                }),
                Err(e) => Err(e),
            },
            Err(e) => Err(render_failed(&e)),
        };

        settle(kind, attempt, || {
            self.fallback.reset_protocol(request.trigger)
        })
    }

    /// Model-backed safety classification. Unlike the content methods this
    /// reports failure; the safety gate owns the failure policy.
    pub async fn classify_safety(&self, text: &str) -> Result<SafetyVerdict, GenerationError> {
        let user = self.prompts.safety(text).map_err(|e| render_failed(&e))?;
        self.generate::<SafetyVerdict>(ContentKind::Safety, prompts::SAFETY_SYSTEM_PROMPT, &user)
            .await
            .map(SafetyVerdict::normalized)
    }
}

fn render_failed(e: &anyhow::Error) -> GenerationError {
    GenerationError::ModelUnavailable(format!("prompt render failed: {e}"))
}

fn settle<T>(
    kind: ContentKind,
    attempt: Result<T, GenerationError>,
    fallback: impl FnOnce() -> T,
) -> Generated<T> {
    let version = prompt_version(kind);
    match attempt {
        Ok(body) => {
            debug!(content = %kind, source = "ai", "generation.complete");
            Generated::ai(body, version)
        }
        Err(err) => {
            warn!(
                content = %kind,
                failure = err.kind(),
                error = %err,
                "generation.fallback"
            );
            Generated::fallback(fallback(), version)
        }
    }
}

/// Extract, parse and validate a model payload.
fn parse_payload<T: Shape>(
    raw: &str,
    reshape: impl FnOnce(Value) -> Value,
) -> Result<T, GenerationError> {
    let candidate = extract_json(raw);
    let value: Value =
        serde_json::from_str(candidate).map_err(|_| GenerationError::ExtractionFailed)?;
    validate::<T>(reshape(value)).map_err(|e| GenerationError::SchemaMismatch(e.to_string()))
}

/// The requested trigger always wins; a bare steps array is wrapped.
fn pin_trigger(value: Value, trigger: &str) -> Value {
    match value {
        Value::Array(steps) => serde_json::json!({ "trigger": trigger, "steps": steps }),
        Value::Object(mut map) => {
            map.insert("trigger".to_string(), Value::String(trigger.to_string()));
            Value::Object(map)
        }
        other => other,
    }
}
