use crate::content::ContentKind;
use crate::llm::SamplingParams;
use serde::{Deserialize, Serialize};

/// Per-content sampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub quests: SamplingParams,
    #[serde(default)]
    pub scripts: SamplingParams,
    #[serde(default)]
    pub reset: SamplingParams,
    #[serde(default = "default_safety_sampling")]
    pub safety: SamplingParams,
}

fn default_safety_sampling() -> SamplingParams {
    SamplingParams {
        temperature: 0.2,
        max_output_tokens: 512,
        ..SamplingParams::default()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            quests: SamplingParams::default(),
            scripts: SamplingParams::default(),
            reset: SamplingParams::default(),
            safety: default_safety_sampling(),
        }
    }
}

impl GenerationConfig {
    pub fn sampling_for(&self, kind: ContentKind) -> SamplingParams {
        match kind {
            ContentKind::Quests => self.quests,
            ContentKind::Scripts => self.scripts,
            ContentKind::Reset => self.reset,
            ContentKind::Safety => self.safety,
        }
    }

    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        for (name, params) in [
            ("quests", &self.quests),
            ("scripts", &self.scripts),
            ("reset", &self.reset),
            ("safety", &self.safety),
        ] {
            if !(0.0..=2.0).contains(&params.temperature) {
                anyhow::bail!("generation.{name}.temperature must be within 0.0..=2.0");
            }
            if !(0.0..=1.0).contains(&params.top_p) {
                anyhow::bail!("generation.{name}.top_p must be within 0.0..=1.0");
            }
            if params.max_output_tokens == 0 {
                anyhow::bail!("generation.{name}.max_output_tokens must be positive");
            }
        }
        Ok(())
    }
}
