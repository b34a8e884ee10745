use super::enums::{
    BoundariesStyle, FocusArea, QuestCategory, ScenarioType, TonePreference, TriggerType,
    UserValue,
};
use super::validate::{Shape, check_len, check_range};
use crate::error::ValidationIssue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCORE_MIN: u8 = 1;
pub const SCORE_MAX: u8 = 10;
pub const SLEEP_HOURS_MAX: f64 = 24.0;
pub const DEFAULT_SLEEP_HOURS: f64 = 7.0;
/// Upper bound for any free-text field sent to the model.
pub const MAX_FREE_TEXT_CHARS: usize = 4_000;

/// Partial user profile; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<UserValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<TriggerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_tone: Option<TonePreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_anchor_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundaries_style: Option<BoundariesStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyState {
    pub energy: u8,
    pub stress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    pub focus: FocusArea,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_intensity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_intensity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DailyState {
    pub fn energy_clamped(&self) -> u8 {
        self.energy.clamp(SCORE_MIN, SCORE_MAX)
    }

    pub fn stress_clamped(&self) -> u8 {
        self.stress.clamp(SCORE_MIN, SCORE_MAX)
    }

    /// Sleep hours with the default applied and clamped to `0..=24`.
    pub fn sleep_hours_or_default(&self) -> f64 {
        match self.sleep_hours {
            Some(hours) if hours.is_finite() => hours.clamp(0.0, SLEEP_HOURS_MAX),
            _ => DEFAULT_SLEEP_HOURS,
        }
    }

    /// Notes with surrounding whitespace removed, `None` when blank.
    pub fn notes_trimmed(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySignals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_worked: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_failed: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_quest_types: Option<Vec<QuestCategory>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestGenerationRequest {
    pub daily_state: DailyState,
    #[serde(default)]
    pub user_profile: UserProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_signals: Option<MemorySignals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptGenerationRequest {
    pub scenario_type: ScenarioType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_summary: Option<String>,
    #[serde(default)]
    pub user_profile: UserProfile,
}

impl ScriptGenerationRequest {
    pub fn boundaries_style(&self) -> BoundariesStyle {
        self.user_profile.boundaries_style.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    pub trigger: TriggerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_summary: Option<String>,
    /// Skip the model and serve the catalog protocol directly.
    #[serde(default)]
    pub use_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyCheckRequest {
    pub text: String,
}

// ── Structural checks ──

impl Shape for QuestGenerationRequest {
    fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        let state = &self.daily_state;
        check_range(issues, "dailyState.energy", state.energy, SCORE_MIN, SCORE_MAX);
        check_range(issues, "dailyState.stress", state.stress, SCORE_MIN, SCORE_MAX);
        if let Some(hours) = state.sleep_hours
            && !(hours.is_finite() && (0.0..=SLEEP_HOURS_MAX).contains(&hours))
        {
            issues.push(ValidationIssue::new(
                "dailyState.sleepHours",
                "must be between 0 and 24",
            ));
        }
        if let Some(value) = state.relationship_intensity {
            check_range(
                issues,
                "dailyState.relationshipIntensity",
                value,
                SCORE_MIN,
                SCORE_MAX,
            );
        }
        if let Some(value) = state.work_intensity {
            check_range(
                issues,
                "dailyState.workIntensity",
                value,
                SCORE_MIN,
                SCORE_MAX,
            );
        }
        if let Some(notes) = &state.notes {
            check_len(issues, "dailyState.notes", notes, MAX_FREE_TEXT_CHARS);
        }
    }
}

impl Shape for ScriptGenerationRequest {
    fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        if let Some(context) = &self.context_summary {
            check_len(issues, "contextSummary", context, MAX_FREE_TEXT_CHARS);
        }
    }
}

impl Shape for ResetRequest {
    fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        if let Some(context) = &self.context_summary {
            check_len(issues, "contextSummary", context, MAX_FREE_TEXT_CHARS);
        }
    }
}

impl Shape for SafetyCheckRequest {
    fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        if self.text.trim().is_empty() {
            issues.push(ValidationIssue::new("text", "must not be empty"));
        }
        check_len(issues, "text", &self.text, MAX_FREE_TEXT_CHARS);
    }
}
