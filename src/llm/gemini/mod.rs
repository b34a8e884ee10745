//! Google Gemini provider (`generateContent` REST endpoint).

use crate::error::LlmError;
use crate::llm::{
    build_provider_client_with_timeout, sanitize_api_error,
    traits::{Provider, SamplingParams},
};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

mod types;
use types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini provider authenticated with an API key.
pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// Key priority:
    /// 1. Explicit API key passed in
    /// 2. `GEMINI_API_KEY` environment variable
    /// 3. `GOOGLE_API_KEY` environment variable
    pub fn new(api_key: Option<&str>, timeout_secs: u64) -> Self {
        let resolved_key = api_key
            .filter(|key| !key.trim().is_empty())
            .map(String::from)
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|key| !key.trim().is_empty());

        Self {
            api_key: resolved_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    /// Point the provider at a different host (proxies, tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_request(
        system_prompt: &str,
        message: &str,
        sampling: SamplingParams,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature: sampling.temperature,
                top_p: sampling.top_p,
                top_k: sampling.top_k,
                max_output_tokens: sampling.max_output_tokens,
            },
        }
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/{}:generateContent",
            self.base_url,
            Self::model_name(model)
        )
    }

    fn api_key(&self) -> anyhow::Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            LlmError::MissingKey {
                provider: "gemini".into(),
            }
            .into()
        })
    }

    async fn ensure_success_status(
        response: reqwest::Response,
    ) -> anyhow::Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let sanitized_error = sanitize_api_error(&error_text);
            anyhow::bail!("Gemini API error ({status}): {sanitized_error}");
        }

        Ok(response)
    }

    fn extract_text(result: &GenerateContentResponse) -> anyhow::Result<String> {
        if let Some(err) = &result.error {
            anyhow::bail!("Gemini API error: {}", sanitize_api_error(&err.message));
        }

        if let Some(reason) = result
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            anyhow::bail!("Gemini blocked the prompt: {reason}");
        }

        let text = result
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let finish = result
                .candidates
                .as_ref()
                .and_then(|c| c.first())
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("unknown");
            return Err(LlmError::EmptyResponse {
                provider: format!("gemini (finish reason: {finish})"),
            }
            .into());
        }

        Ok(text)
    }

    async fn call_api(
        &self,
        system_prompt: &str,
        message: &str,
        model: &str,
        sampling: SamplingParams,
    ) -> anyhow::Result<String> {
        let api_key = self.api_key()?;
        let request = Self::build_request(system_prompt, message, sampling);

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Request {
                provider: "gemini".into(),
                message: sanitize_api_error(&e.without_url().to_string()),
            })?;
        let response = Self::ensure_success_status(response).await?;
        let result: GenerateContentResponse = response.json().await?;
        Self::extract_text(&result)
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: &'a str,
        message: &'a str,
        model: &'a str,
        sampling: SamplingParams,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(self.call_api(system_prompt, message, model, sampling))
    }
}
