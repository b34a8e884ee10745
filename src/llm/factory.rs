use super::gemini::GeminiProvider;
use super::traits::Provider;
use crate::config::Config;
use std::sync::Arc;

/// Provider described by `config`: Gemini, optionally behind a custom base URL.
pub fn create_provider(config: &Config) -> Arc<dyn Provider> {
    let mut gemini = GeminiProvider::new(config.api_key.as_deref(), config.request_timeout_secs);
    if let Some(base) = &config.api_base_url {
        gemini = gemini.with_base_url(base);
    }
    Arc::new(gemini)
}
