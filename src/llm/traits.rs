use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Sampling knobs sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

/// A hosted text-completion model.
///
/// The output is free text that may or may not contain JSON; callers own
/// extraction and validation.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "gemini").
    fn name(&self) -> &str;

    /// Whether credentials are present. Drives the readiness probe.
    fn is_configured(&self) -> bool {
        true
    }

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: &'a str,
        message: &'a str,
        model: &'a str,
        sampling: SamplingParams,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;
}
