//! Hand-authored content served whenever model generation is skipped or fails.
//!
//! Every entry satisfies the same shape checks as model output, so callers
//! only learn the origin from the `source` tag.

mod protocols;
mod quests;
mod scripts;

use crate::content::{
    BoundariesStyle, DEFAULT_TRUST_ANCHOR_RU, QuestSet, ResetProtocol, RuachState, SafetyFlag,
    SafetyVerdict, ScenarioType, ScriptVariantSet, StateAssessment, TriggerType,
};
use serde::Serialize;

pub const SAFETY_INTERVENTION_MESSAGE_RU: &str = "Я слышу тебя. То, что ты переживаешь — тяжело.

Пожалуйста, если тебе сейчас очень плохо — обратись за профессиональной поддержкой:
📞 Telefonseelsorge: 0800 111 0 111 (бесплатно, 24/7)

Ты не один в этом. Просить помощи — это сила, не слабость.

Я здесь, чтобы поддержать, но профессионал сможет помочь лучше.";

/// A crisis hotline surfaced alongside an intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrisisResource {
    pub name: &'static str,
    pub phone: &'static str,
    pub available: &'static str,
}

// Germany only for now; numbers still need confirming per deployment region.
pub const CRISIS_RESOURCES_DE: [CrisisResource; 2] = [
    CrisisResource {
        name: "Telefonseelsorge",
        phone: "0800 111 0 111",
        available: "24/7, бесплатно",
    },
    CrisisResource {
        name: "Suizidprävention",
        phone: "0800 111 0 222",
        available: "24/7, бесплатно",
    },
];

/// Static fallback content keyed by trigger, scenario or raw state.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCatalog;

impl FallbackCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn reset_protocol(&self, trigger: TriggerType) -> ResetProtocol {
        ResetProtocol {
            trigger,
            steps: protocols::steps_for(trigger),
            trust_anchor_ru: DEFAULT_TRUST_ANCHOR_RU.to_string(),
        }
    }

    /// Default quest set keyed off raw energy and stress.
    ///
    /// Out-of-domain values are clamped to `1..=10` first.
    pub fn quests(&self, energy: u8, stress: u8) -> QuestSet {
        quests::default_quests(energy.clamp(1, 10), stress.clamp(1, 10))
    }

    pub fn scripts(&self, scenario: ScenarioType, style: BoundariesStyle) -> ScriptVariantSet {
        scripts::scripts_for(scenario, style)
    }

    /// Verdict for text the keyword scan found nothing in.
    pub fn safety(&self) -> SafetyVerdict {
        SafetyVerdict::clear()
    }

    /// Keywords matched but the classifier could not answer: surface the
    /// matched flags and the hotlines without blocking.
    pub fn unclassified_safety(&self, flags: Vec<SafetyFlag>) -> SafetyVerdict {
        SafetyVerdict {
            flags,
            requires_intervention: false,
            crisis_resources_needed: true,
            message_ru: None,
        }
        .normalized()
    }

    /// Quest-shaped body returned instead of content when intervention is flagged.
    pub fn intervention(&self, flags: Vec<SafetyFlag>) -> QuestSet {
        QuestSet {
            state_assessment: StateAssessment {
                ruach_state: RuachState::Triggered,
                notes_ru: SAFETY_INTERVENTION_MESSAGE_RU.to_string(),
            },
            quests: Vec::new(),
            safety_flags: flags,
            followups_ru: Vec::new(),
        }
    }
}
