use serde::{Deserialize, Serialize};

// Wire names are snake_case; unknown values fail deserialization instead of
// being coerced to a default.

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FocusArea {
    Work,
    Relationship,
    Body,
    Creation,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TriggerType {
    Jealousy,
    Uncertainty,
    Anger,
    Shame,
    Loneliness,
    Overwhelm,
}

impl TriggerType {
    /// Russian label shown in the trigger picker.
    pub fn label_ru(self) -> &'static str {
        match self {
            Self::Jealousy => "ревность",
            Self::Uncertainty => "неизвестность",
            Self::Anger => "злость",
            Self::Shame => "стыд",
            Self::Loneliness => "одиночество",
            Self::Overwhelm => "перегруз",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScenarioType {
    Provocation,
    Accusation,
    Coldness,
    Drama,
    Comparison,
    Silence,
    Blame,
    Testing,
    Manipulation,
    Escalation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestCategory {
    Micro,
    Medium,
    Courage,
    Creation,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestType {
    Main,
    Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RuachState {
    Calm,
    Tense,
    Triggered,
    Focused,
    Drained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SafetyFlag {
    SelfHarmRisk,
    CrisisDetected,
    SubstanceMention,
    SevereDistress,
    /// Sentinel for "checked, nothing found".
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepKind {
    Label,
    Breath,
    Reframe,
    Action,
    Anchor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BoundariesStyle {
    #[default]
    Firm,
    Gentle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TonePreference {
    Warm,
    Direct,
    Philosophical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserValue {
    Dignity,
    Honesty,
    Actions,
    Meaning,
    Independence,
    Growth,
    Boundaries,
}
