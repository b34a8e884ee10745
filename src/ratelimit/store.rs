use super::window::{RatePolicy, RateWindow, WindowState};
use std::collections::HashMap;
use std::sync::Mutex;

/// Idle windows are swept at most this often.
const SWEEP_INTERVAL_MS: u64 = 60_000;

/// Outcome of one all-or-nothing acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreDecision {
    /// Every window admitted the call; `remaining` is the tightest headroom left.
    Admitted { remaining: u32 },
    /// The first window that refused, and how long until it frees a slot.
    Denied { policy: &'static str, wait_ms: u64 },
}

/// Backing store for rate windows.
///
/// `acquire` must be atomic across all keys it is given: either every
/// window records the call or none does.
pub trait RateStore: Send + Sync {
    fn acquire(&self, keys: &[(String, RatePolicy)], now_ms: u64) -> StoreDecision;

    fn snapshot(&self, key: &str, policy: &RatePolicy, now_ms: u64) -> Option<RateWindow>;
}

#[derive(Debug, Default)]
struct Windows {
    by_key: HashMap<String, WindowState>,
    last_sweep_ms: u64,
}

impl Windows {
    fn sweep(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_sweep_ms) < SWEEP_INTERVAL_MS {
            return;
        }
        self.last_sweep_ms = now_ms;
        self.by_key.retain(|_, state| !state.is_idle(now_ms));
    }
}

/// Process-local store: one mutex over every window.
#[derive(Debug, Default)]
pub struct InMemoryRateStore {
    windows: Mutex<Windows>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .by_key
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RateStore for InMemoryRateStore {
    fn acquire(&self, keys: &[(String, RatePolicy)], now_ms: u64) -> StoreDecision {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        windows.sweep(now_ms);

        for (key, policy) in keys {
            let state = windows
                .by_key
                .entry(key.clone())
                .or_insert_with(|| WindowState::new(policy, now_ms));
            state.roll(policy, now_ms);
            if let Err(wait_ms) = state.check(policy, now_ms) {
                return StoreDecision::Denied {
                    policy: policy.name,
                    wait_ms,
                };
            }
        }

        let mut remaining = u32::MAX;
        for (key, policy) in keys {
            if let Some(state) = windows.by_key.get_mut(key) {
                state.record(now_ms);
                remaining = remaining.min(policy.limit.saturating_sub(state.count()));
            }
        }
        StoreDecision::Admitted { remaining }
    }

    fn snapshot(&self, key: &str, policy: &RatePolicy, now_ms: u64) -> Option<RateWindow> {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let state = windows.by_key.get_mut(key)?;
        state.roll(policy, now_ms);
        let identity = key.split_once('|').map_or(key, |(_, identity)| identity);
        Some(state.snapshot(identity, policy, now_ms))
    }
}
