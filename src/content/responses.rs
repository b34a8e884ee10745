use super::enums::{
    QuestCategory, QuestType, RuachState, SafetyFlag, ScenarioType, StepKind, TriggerType,
};
use super::validate::{Shape, check_non_empty};
use crate::error::ValidationIssue;
use serde::{Deserialize, Serialize};

/// Anchor phrase closing every reset protocol unless the model supplies one.
pub const DEFAULT_TRUST_ANCHOR_RU: &str =
    "ДОВЕРИЕ. Я делаю правильно — результат не в моём контроле.";

fn default_trust_anchor() -> String {
    DEFAULT_TRUST_ANCHOR_RU.to_string()
}

// ── Quests ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateAssessment {
    pub ruach_state: RuachState,
    pub notes_ru: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    #[serde(rename = "type")]
    pub kind: QuestType,
    pub category: QuestCategory,
    pub title_ru: String,
    pub why_ru: String,
    pub steps_ru: Vec<String>,
    pub fail_safe_ru: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSet {
    pub state_assessment: StateAssessment,
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub safety_flags: Vec<SafetyFlag>,
    #[serde(default)]
    pub followups_ru: Vec<String>,
}

impl Shape for QuestSet {
    fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        if self.quests.is_empty() {
            issues.push(ValidationIssue::new("quests", "must contain at least 1 quest"));
        }
        for (i, quest) in self.quests.iter().enumerate() {
            check_non_empty(issues, &format!("quests.{i}.titleRu"), &quest.title_ru);
            if quest.steps_ru.is_empty() {
                issues.push(ValidationIssue::new(
                    format!("quests.{i}.stepsRu"),
                    "must contain at least 1 step",
                ));
            }
        }
    }
}

// ── Scripts ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptVariants {
    pub short_ru: String,
    pub neutral_ru: String,
    pub boundary_ru: String,
    pub exit_ru: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptVariantSet {
    pub scenario: ScenarioType,
    pub variants: ScriptVariants,
    #[serde(default)]
    pub tone_notes_ru: String,
    #[serde(default)]
    pub safety_flags: Vec<SafetyFlag>,
}

impl Shape for ScriptVariantSet {
    fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        let v = &self.variants;
        check_non_empty(issues, "variants.shortRu", &v.short_ru);
        check_non_empty(issues, "variants.neutralRu", &v.neutral_ru);
        check_non_empty(issues, "variants.boundaryRu", &v.boundary_ru);
        check_non_empty(issues, "variants.exitRu", &v.exit_ru);
    }
}

// ── Reset protocol ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub title_ru: String,
    pub content_ru: String,
    /// Raw duration as sent; normalised by the runtime, not at parse time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<serde_json::Number>,
}

impl ProtocolStep {
    pub fn new(kind: StepKind, title_ru: &str, content_ru: &str, duration_seconds: u64) -> Self {
        Self {
            kind,
            title_ru: title_ru.to_string(),
            content_ru: content_ru.to_string(),
            duration_seconds: Some(duration_seconds.into()),
        }
    }

    /// Positive whole-second duration, or `None` when missing or malformed.
    ///
    /// Fractional values round up so a 0.4 s step still lasts one tick.
    pub fn positive_duration_secs(&self) -> Option<u64> {
        let number = self.duration_seconds.as_ref()?;
        if let Some(secs) = number.as_u64() {
            return (secs > 0).then_some(secs);
        }
        let secs = number.as_f64()?;
        if secs.is_finite() && secs > 0.0 && secs <= f64::from(u32::MAX) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            return Some(secs.ceil() as u64);
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetProtocol {
    pub trigger: TriggerType,
    pub steps: Vec<ProtocolStep>,
    #[serde(default = "default_trust_anchor")]
    pub trust_anchor_ru: String,
}

impl Shape for ResetProtocol {
    fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        if self.steps.is_empty() {
            issues.push(ValidationIssue::new("steps", "must contain at least 1 step"));
        }
        for (i, step) in self.steps.iter().enumerate() {
            check_non_empty(issues, &format!("steps.{i}.contentRu"), &step.content_ru);
        }
    }
}

// ── Safety ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyVerdict {
    pub flags: Vec<SafetyFlag>,
    pub requires_intervention: bool,
    pub crisis_resources_needed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_ru: Option<String>,
}

impl SafetyVerdict {
    /// `{flags: [none], requiresIntervention: false}`.
    pub fn clear() -> Self {
        Self {
            flags: vec![SafetyFlag::None],
            requires_intervention: false,
            crisis_resources_needed: false,
            message_ru: None,
        }
    }

    /// True when no flag other than the `none` sentinel is present.
    pub fn has_no_risk_flags(&self) -> bool {
        self.flags.iter().all(|flag| *flag == SafetyFlag::None)
    }

    /// Enforce that an empty or `none`-only flag set never blocks.
    pub fn normalized(mut self) -> Self {
        if self.flags.is_empty() {
            self.flags.push(SafetyFlag::None);
        }
        if self.has_no_risk_flags() {
            self.requires_intervention = false;
        } else {
            self.flags.retain(|flag| *flag != SafetyFlag::None);
        }
        self
    }
}

impl Shape for SafetyVerdict {
    fn collect_issues(&self, _issues: &mut Vec<ValidationIssue>) {}
}
