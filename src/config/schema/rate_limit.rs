use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per identity per coarse window, all endpoints (default: 100)
    #[serde(default = "default_coarse_max")]
    pub coarse_max: u32,
    /// Coarse fixed window length (default: 900 s)
    #[serde(default = "default_coarse_window_secs")]
    pub coarse_window_secs: u64,
    /// Generation requests per identity per endpoint class (default: 10)
    #[serde(default = "default_generation_max")]
    pub generation_max: u32,
    /// Generation sliding window length (default: 60 s)
    #[serde(default = "default_generation_window_secs")]
    pub generation_window_secs: u64,
}

fn default_coarse_max() -> u32 {
    100
}

fn default_coarse_window_secs() -> u64 {
    900
}

fn default_generation_max() -> u32 {
    10
}

fn default_generation_window_secs() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            coarse_max: default_coarse_max(),
            coarse_window_secs: default_coarse_window_secs(),
            generation_max: default_generation_max(),
            generation_window_secs: default_generation_window_secs(),
        }
    }
}

impl RateLimitConfig {
    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        if self.coarse_max == 0 || self.generation_max == 0 {
            anyhow::bail!("rate_limit limits must be positive");
        }
        if self.coarse_window_secs == 0 || self.generation_window_secs == 0 {
            anyhow::bail!("rate_limit windows must be positive");
        }
        Ok(())
    }
}
