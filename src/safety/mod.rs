//! Two-tier safety gate: a local keyword pre-filter, then a model-backed
//! classifier only when the pre-filter matches.

pub mod keywords;

use crate::content::{ContentKind, Generated, SafetyVerdict, Source};
use crate::generation::{Orchestrator, prompt_version};
use std::sync::Arc;
use tracing::{info, warn};

pub use keywords::{KeywordMatch, KeywordScan, scan};

#[derive(Clone)]
pub struct SafetyGate {
    orchestrator: Arc<Orchestrator>,
}

impl SafetyGate {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Verdict for `text`.
    ///
    /// Text with no keyword match is cleared without touching the network.
    /// When the classifier fails after a match, the verdict keeps the matched
    /// categories and asks for crisis resources but does not block.
    pub async fn check(&self, text: &str) -> SafetyVerdict {
        self.evaluate(text).await.0
    }

    /// [`Self::check`] wrapped in the endpoint envelope. The source is `ai`
    /// only when the classifier produced the verdict.
    pub async fn assess(&self, text: &str) -> Generated<SafetyVerdict> {
        let version = prompt_version(ContentKind::Safety);
        match self.evaluate(text).await {
            (verdict, Source::Ai) => Generated::ai(verdict, version),
            (verdict, Source::Fallback) => Generated::fallback(verdict, version),
        }
    }

    async fn evaluate(&self, text: &str) -> (SafetyVerdict, Source) {
        let prefilter = scan(text);
        if prefilter.is_clear() {
            return (self.orchestrator.fallback().safety(), Source::Fallback);
        }

        let flags = prefilter.flags();
        info!(flags = ?flags, "safety.keyword_match");

        match self.orchestrator.classify_safety(text).await {
            Ok(verdict) => {
                info!(
                    flags = ?verdict.flags,
                    intervention = verdict.requires_intervention,
                    "safety.classified"
                );
                (verdict, Source::Ai)
            }
            Err(err) => {
                warn!(
                    flags = ?flags,
                    failure = err.kind(),
                    error = %err,
                    "safety.classifier_failed"
                );
                (
                    self.orchestrator.fallback().unclassified_safety(flags),
                    Source::Fallback,
                )
            }
        }
    }
}
