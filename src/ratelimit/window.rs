use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// Counter that resets when the window that began at its first call ends.
    Fixed,
    /// Timestamps of accepted calls within the trailing window.
    Sliding,
}

/// Limit applied to one `(identity, endpoint class)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    pub name: &'static str,
    pub limit: u32,
    pub window_ms: u64,
    pub kind: WindowKind,
}

impl RatePolicy {
    pub fn fixed(name: &'static str, limit: u32, window_secs: u64) -> Self {
        Self {
            name,
            limit,
            window_ms: window_secs.saturating_mul(1000),
            kind: WindowKind::Fixed,
        }
    }

    pub fn sliding(name: &'static str, limit: u32, window_secs: u64) -> Self {
        Self {
            name,
            limit,
            window_ms: window_secs.saturating_mul(1000),
            kind: WindowKind::Sliding,
        }
    }
}

/// Read-only view of one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateWindow {
    pub identity: String,
    pub window_start_ms: u64,
    pub count: u32,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub(super) enum WindowState {
    Fixed {
        start_ms: u64,
        count: u32,
        window_ms: u64,
    },
    Sliding {
        hits: VecDeque<u64>,
        window_ms: u64,
    },
}

impl WindowState {
    pub(super) fn new(policy: &RatePolicy, now_ms: u64) -> Self {
        match policy.kind {
            WindowKind::Fixed => Self::Fixed {
                start_ms: now_ms,
                count: 0,
                window_ms: policy.window_ms,
            },
            WindowKind::Sliding => Self::Sliding {
                hits: VecDeque::new(),
                window_ms: policy.window_ms,
            },
        }
    }

    /// Drop everything that fell out of the window ending at `now_ms`.
    pub(super) fn roll(&mut self, policy: &RatePolicy, now_ms: u64) {
        match self {
            Self::Fixed {
                start_ms, count, ..
            } => {
                if now_ms.saturating_sub(*start_ms) >= policy.window_ms {
                    *start_ms = now_ms;
                    *count = 0;
                }
            }
            Self::Sliding { hits, .. } => {
                while let Some(&oldest) = hits.front() {
                    if now_ms.saturating_sub(oldest) >= policy.window_ms {
                        hits.pop_front();
                    } else {
                        break;
                    }
                }
            }
        }
    }

    pub(super) fn count(&self) -> u32 {
        match self {
            Self::Fixed { count, .. } => *count,
            Self::Sliding { hits, .. } => u32::try_from(hits.len()).unwrap_or(u32::MAX),
        }
    }

    /// `Err(wait_ms)` when one more call would exceed the limit.
    pub(super) fn check(&self, policy: &RatePolicy, now_ms: u64) -> Result<(), u64> {
        if self.count() < policy.limit {
            return Ok(());
        }
        let opened_at = match self {
            Self::Fixed { start_ms, .. } => *start_ms,
            Self::Sliding { hits, .. } => hits.front().copied().unwrap_or(now_ms),
        };
        Err((opened_at + policy.window_ms).saturating_sub(now_ms).max(1))
    }

    pub(super) fn record(&mut self, now_ms: u64) {
        match self {
            Self::Fixed { count, .. } => *count = count.saturating_add(1),
            Self::Sliding { hits, .. } => hits.push_back(now_ms),
        }
    }

    /// True once nothing recorded in this window still counts at `now_ms`.
    pub(super) fn is_idle(&self, now_ms: u64) -> bool {
        match self {
            Self::Fixed {
                start_ms,
                count,
                window_ms,
            } => *count == 0 || now_ms.saturating_sub(*start_ms) >= *window_ms,
            Self::Sliding { hits, window_ms } => hits
                .back()
                .is_none_or(|&last| now_ms.saturating_sub(last) >= *window_ms),
        }
    }

    pub(super) fn snapshot(&self, identity: &str, policy: &RatePolicy, now_ms: u64) -> RateWindow {
        let window_start_ms = match self {
            Self::Fixed { start_ms, .. } => *start_ms,
            Self::Sliding { hits, .. } => hits
                .front()
                .copied()
                .unwrap_or_else(|| now_ms.saturating_sub(policy.window_ms)),
        };
        RateWindow {
            identity: identity.to_string(),
            window_start_ms,
            count: self.count(),
            limit: policy.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(state: &mut WindowState, policy: &RatePolicy, at: &[u64]) {
        for &t in at {
            state.roll(policy, t);
            assert!(state.check(policy, t).is_ok(), "call at {t}ms");
            state.record(t);
        }
    }

    #[test]
    fn fixed_window_resets_at_rollover() {
        let policy = RatePolicy::fixed("coarse", 2, 10);
        let mut state = WindowState::new(&policy, 0);
        fill(&mut state, &policy, &[0, 4_000]);

        assert_eq!(state.check(&policy, 9_000), Err(1_000));

        state.roll(&policy, 10_000);
        assert_eq!(state.count(), 0);
        assert!(state.check(&policy, 10_000).is_ok());
    }

    #[test]
    fn sliding_window_waits_for_oldest_hit() {
        let policy = RatePolicy::sliding("quests", 2, 60);
        let mut state = WindowState::new(&policy, 0);
        fill(&mut state, &policy, &[0, 30_000]);

        assert_eq!(state.check(&policy, 45_000), Err(15_000));

        state.roll(&policy, 60_000);
        assert_eq!(state.count(), 1);
        assert!(state.check(&policy, 60_000).is_ok());
    }

    #[test]
    fn wait_is_never_zero() {
        let policy = RatePolicy::fixed("coarse", 1, 1);
        let mut state = WindowState::new(&policy, 0);
        fill(&mut state, &policy, &[0]);
        assert_eq!(state.check(&policy, 999), Err(1));
    }

    #[test]
    fn snapshot_reports_window_start() {
        let policy = RatePolicy::sliding("scripts", 5, 60);
        let mut state = WindowState::new(&policy, 0);
        fill(&mut state, &policy, &[1_000, 2_000]);
        let window = state.snapshot("device:abc", &policy, 3_000);
        assert_eq!(window.window_start_ms, 1_000);
        assert_eq!(window.count, 2);
        assert_eq!(window.limit, 5);
    }

    #[test]
    fn windows_go_idle_once_their_last_hit_expires() {
        let fixed = RatePolicy::fixed("coarse", 5, 10);
        let mut state = WindowState::new(&fixed, 0);
        assert!(state.is_idle(0));
        fill(&mut state, &fixed, &[1_000]);
        assert!(!state.is_idle(9_999));
        assert!(state.is_idle(10_000));

        let sliding = RatePolicy::sliding("quests", 5, 60);
        let mut state = WindowState::new(&sliding, 0);
        fill(&mut state, &sliding, &[0, 30_000]);
        assert!(!state.is_idle(60_000));
        assert!(state.is_idle(90_000));
    }
}
