//! Per-identity call limits: a coarse fixed window on every request plus a
//! tighter sliding window per generation endpoint. Both must admit a call.

mod store;
mod window;

pub use store::{InMemoryRateStore, RateStore, StoreDecision};
pub use window::{RatePolicy, RateWindow, WindowKind};

use crate::config::RateLimitConfig;
use crate::error::RateLimitError;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Who is being limited. Device and user ids live in separate namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Device(String),
    User(String),
}

impl Identity {
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User(id) => Some(id),
            Self::Device(_) => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(id) => write!(f, "device:{id}"),
            Self::User(id) => write!(f, "user:{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EndpointClass {
    Quests,
    Scripts,
    Reset,
    Safety,
}

/// Result of [`RateLimiter::try_acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub allowed: bool,
    /// Whole seconds until a retry can succeed. Set only when denied.
    pub retry_after_seconds: Option<u64>,
    pub remaining: u32,
    pub denied_by: Option<&'static str>,
}

impl Admission {
    pub fn into_result(self, identity: &Identity) -> Result<u32, RateLimitError> {
        match (self.allowed, self.retry_after_seconds) {
            (true, _) => Ok(self.remaining),
            (false, retry) => Err(RateLimitError::Exhausted {
                identity: identity.key(),
                policy: self.denied_by.unwrap_or("coarse"),
                retry_after_secs: retry.unwrap_or(1),
            }),
        }
    }
}

pub struct RateLimiter {
    store: Arc<dyn RateStore>,
    coarse: RatePolicy,
    generation: RatePolicy,
    epoch: Instant,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateStore>, coarse: RatePolicy, generation: RatePolicy) -> Self {
        Self {
            store,
            coarse,
            generation,
            epoch: Instant::now(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            Arc::new(InMemoryRateStore::new()),
            RatePolicy::fixed("coarse", config.coarse_max, config.coarse_window_secs),
            RatePolicy::sliding(
                "generation",
                config.generation_max,
                config.generation_window_secs,
            ),
        )
    }

    fn keys(&self, identity: &Identity, class: EndpointClass) -> Vec<(String, RatePolicy)> {
        vec![
            (format!("coarse|{identity}"), self.coarse),
            (format!("{class}|{identity}"), self.generation),
        ]
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn try_acquire(&self, identity: &Identity, class: EndpointClass) -> Admission {
        self.try_acquire_at(identity, class, self.now_ms())
    }

    /// [`Self::try_acquire`] against an explicit clock reading.
    pub fn try_acquire_at(
        &self,
        identity: &Identity,
        class: EndpointClass,
        now_ms: u64,
    ) -> Admission {
        match self.store.acquire(&self.keys(identity, class), now_ms) {
            StoreDecision::Admitted { remaining } => Admission {
                allowed: true,
                retry_after_seconds: None,
                remaining,
                denied_by: None,
            },
            StoreDecision::Denied { policy, wait_ms } => Admission {
                allowed: false,
                retry_after_seconds: Some(wait_ms.div_ceil(1000)),
                remaining: 0,
                denied_by: Some(policy),
            },
        }
    }

    /// Current window for `identity` under `class`'s tightest policy.
    pub fn window(&self, identity: &Identity, class: EndpointClass) -> Option<RateWindow> {
        let (key, policy) = self.keys(identity, class).pop()?;
        self.store.snapshot(&key, &policy, self.now_ms())
    }
}
