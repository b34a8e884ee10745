use super::super::{GatewayConfig, GenerationConfig, RateLimitConfig, StoreConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Gemini API key. Falls back to `GEMINI_API_KEY` / `GOOGLE_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Override for the Gemini endpoint root (proxies, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Upper bound on one model call (default: 30 s)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            api_key: None,
            api_base_url: None,
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            gateway: GatewayConfig::default(),
            generation: GenerationConfig::default(),
            rate_limit: RateLimitConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Directory holding config.toml and the default SQLite file.
    pub fn data_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model.trim().is_empty() {
            anyhow::bail!("model must not be empty");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        if let Some(base) = &self.api_base_url {
            let parsed = url::Url::parse(base)
                .map_err(|e| anyhow::anyhow!("api_base_url {base:?} is not a valid URL: {e}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("api_base_url must use http or https");
            }
        }
        self.generation.validate()?;
        self.rate_limit.validate()?;
        for user in &self.gateway.users {
            let hash = &user.token_sha256;
            if hash.len() != 64 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
                anyhow::bail!(
                    "gateway.users entry {:?} needs a 64-char hex token_sha256",
                    user.user_id
                );
            }
        }
        Ok(())
    }
}
