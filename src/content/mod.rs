//! Request and response shapes for every generation endpoint.

mod enums;
mod requests;
mod responses;
pub mod validate;

pub use enums::{
    BoundariesStyle, FocusArea, QuestCategory, QuestType, RuachState, SafetyFlag, ScenarioType,
    StepKind, TonePreference, TriggerType, UserValue,
};
pub use requests::{
    DailyState, MemorySignals, QuestGenerationRequest, ResetRequest, SafetyCheckRequest,
    ScriptGenerationRequest, UserProfile,
};
pub use responses::{
    DEFAULT_TRUST_ANCHOR_RU, ProtocolStep, Quest, QuestSet, ResetProtocol, SafetyVerdict,
    ScriptVariantSet, ScriptVariants, StateAssessment,
};
pub use validate::{Shape, validate, validate_str};

use serde::{Deserialize, Serialize};

/// The four content types a generation endpoint can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentKind {
    Quests,
    Scripts,
    Reset,
    Safety,
}

/// Where a response body came from. Never reflected in the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Source {
    Ai,
    Fallback,
}

/// A response body tagged with its origin.
///
/// The body fields are flattened, so a validator reading the JSON sees the
/// same shape whichever way it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generated<T> {
    #[serde(flatten)]
    pub body: T,
    pub source: Source,
    pub prompt_version: String,
    /// Set when the safety gate blocked generation.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub intervention: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervention_message_ru: Option<String>,
}

impl<T> Generated<T> {
    pub fn ai(body: T, prompt_version: &str) -> Self {
        Self {
            body,
            source: Source::Ai,
            prompt_version: prompt_version.to_string(),
            intervention: false,
            intervention_message_ru: None,
        }
    }

    pub fn fallback(body: T, prompt_version: &str) -> Self {
        Self {
            body,
            source: Source::Fallback,
            prompt_version: prompt_version.to_string(),
            intervention: false,
            intervention_message_ru: None,
        }
    }

    /// Catalogue `body` served in place of generation after the safety gate
    /// asked for an intervention.
    pub fn intervention(body: T, prompt_version: &str, message_ru: &str) -> Self {
        Self {
            intervention: true,
            intervention_message_ru: Some(message_ru.to_string()),
            ..Self::fallback(body, prompt_version)
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }
}
