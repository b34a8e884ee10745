use crate::content::{ProtocolStep, ResetProtocol, StepKind, TriggerType};
use serde::Serialize;
use tokio::time::{Duration, Instant};
use tracing::debug;

/// Substituted for a missing, zero or malformed step duration.
pub const DEFAULT_STEP_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Select,
    Running,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdvanceCause {
    Expired,
    Skipped,
}

/// What a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolRunState {
    pub phase: Phase,
    pub step_index: usize,
    pub total_steps: usize,
    /// Whole seconds left in the current step, rounded up.
    pub time_remaining: u64,
    pub paused: bool,
}

/// Transition cues, emitted exactly once per transition.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    Started {
        trigger: TriggerType,
        total_steps: usize,
    },
    StepEntered {
        index: usize,
        kind: StepKind,
        duration: Duration,
        cause: Option<AdvanceCause>,
    },
    Completed,
    Closed {
        phase: Phase,
    },
}

/// Identifies one step-list fetch. Results for any other ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, Copy)]
enum Clock {
    Idle,
    Counting { deadline: Instant },
    Paused { remaining: Duration },
}

/// Single-owner state machine for one reset-protocol session.
///
/// All timing is absolute: natural expiry moves the deadline forward by the
/// next step's duration, a skip restarts it from `now`, and pause keeps the
/// exact remainder. Nothing here sleeps; the caller supplies `now`.
#[derive(Debug)]
pub struct ProtocolRuntime {
    phase: Phase,
    protocol: Option<ResetProtocol>,
    durations: Vec<Duration>,
    step_index: usize,
    clock: Clock,
    next_ticket: u64,
    pending: Option<FetchTicket>,
}

impl Default for ProtocolRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolRuntime {
    pub fn new() -> Self {
        Self {
            phase: Phase::Select,
            protocol: None,
            durations: Vec::new(),
            step_index: 0,
            clock: Clock::Idle,
            next_ticket: 0,
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn protocol(&self) -> Option<&ResetProtocol> {
        self.protocol.as_ref()
    }

    pub fn current_step(&self) -> Option<&ProtocolStep> {
        match self.phase {
            Phase::Running => self.protocol.as_ref()?.steps.get(self.step_index),
            Phase::Select | Phase::Complete => None,
        }
    }

    /// Deadline of the running step, `None` when paused or not running.
    pub fn deadline(&self) -> Option<Instant> {
        match self.clock {
            Clock::Counting { deadline } => Some(deadline),
            Clock::Idle | Clock::Paused { .. } => None,
        }
    }

    // ── Fetching ──

    /// Issue a ticket for a new step-list fetch, invalidating any earlier one.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        let ticket = FetchTicket(self.next_ticket);
        self.pending = Some(ticket);
        ticket
    }

    pub fn cancel_fetch(&mut self) {
        self.pending = None;
    }

    /// Start with a fetched protocol if `ticket` is still the live one.
    pub fn deliver(
        &mut self,
        ticket: FetchTicket,
        protocol: ResetProtocol,
        now: Instant,
    ) -> Vec<RuntimeEvent> {
        if self.pending != Some(ticket) || self.phase != Phase::Select {
            debug!(ticket = ticket.0, "protocol.stale_fetch_dropped");
            return Vec::new();
        }
        self.pending = None;
        self.start(protocol, now)
    }

    // ── Transitions ──

    /// `select → running`. Ignored outside `select`.
    pub fn start(&mut self, protocol: ResetProtocol, now: Instant) -> Vec<RuntimeEvent> {
        if self.phase != Phase::Select {
            return Vec::new();
        }

        self.durations = protocol
            .steps
            .iter()
            .map(|step| {
                Duration::from_secs(step.positive_duration_secs().unwrap_or(DEFAULT_STEP_SECS))
            })
            .collect();
        let mut events = vec![RuntimeEvent::Started {
            trigger: protocol.trigger,
            total_steps: protocol.steps.len(),
        }];
        self.protocol = Some(protocol);
        self.pending = None;
        self.step_index = 0;

        if self.durations.is_empty() {
            self.finish(&mut events);
            return events;
        }

        self.phase = Phase::Running;
        self.clock = Clock::Counting {
            deadline: now + self.durations[0],
        };
        events.push(self.entered(None));
        events
    }

    /// Advance past every deadline that has elapsed by `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Clock::Counting { deadline } = self.clock
            && now >= deadline
            && self.phase == Phase::Running
        {
            self.step(deadline, AdvanceCause::Expired, &mut events);
        }
        events
    }

    /// Cancel the current step timer and advance immediately.
    pub fn skip(&mut self, now: Instant) -> Vec<RuntimeEvent> {
        self.advance(self.step_index, now)
    }

    /// Advance once from `expected_index`. A second call for the same index,
    /// or any call outside `running`, is a no-op.
    pub fn advance(&mut self, expected_index: usize, now: Instant) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        if self.phase == Phase::Running && self.step_index == expected_index {
            self.step(now, AdvanceCause::Skipped, &mut events);
        }
        events
    }

    pub fn pause(&mut self, now: Instant) -> bool {
        if let Clock::Counting { deadline } = self.clock {
            self.clock = Clock::Paused {
                remaining: deadline.saturating_duration_since(now),
            };
            return true;
        }
        false
    }

    pub fn resume(&mut self, now: Instant) -> bool {
        if let Clock::Paused { remaining } = self.clock {
            self.clock = Clock::Counting {
                deadline: now + remaining,
            };
            return true;
        }
        false
    }

    /// Exact time left in the current step.
    pub fn time_remaining(&self, now: Instant) -> Duration {
        match self.clock {
            Clock::Counting { deadline } => deadline.saturating_duration_since(now),
            Clock::Paused { remaining } => remaining,
            Clock::Idle => Duration::ZERO,
        }
    }

    pub fn snapshot(&self, now: Instant) -> ProtocolRunState {
        let remaining = self.time_remaining(now);
        let whole = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        ProtocolRunState {
            phase: self.phase,
            step_index: self.step_index,
            total_steps: self.durations.len(),
            time_remaining: whole,
            paused: matches!(self.clock, Clock::Paused { .. }),
        }
    }

    /// Discard the session from any phase.
    pub fn close(self) -> RuntimeEvent {
        RuntimeEvent::Closed { phase: self.phase }
    }

    // ── Internals ──

    /// Move to the next step, with its timer starting at `from`.
    fn step(&mut self, from: Instant, cause: AdvanceCause, events: &mut Vec<RuntimeEvent>) {
        let next = self.step_index + 1;
        if next >= self.durations.len() {
            self.finish(events);
            return;
        }

        self.step_index = next;
        let duration = self.durations[next];
        self.clock = match self.clock {
            Clock::Paused { .. } => Clock::Paused {
                remaining: duration,
            },
            Clock::Counting { .. } | Clock::Idle => Clock::Counting {
                deadline: from + duration,
            },
        };
        events.push(self.entered(Some(cause)));
    }

    fn finish(&mut self, events: &mut Vec<RuntimeEvent>) {
        self.phase = Phase::Complete;
        self.clock = Clock::Idle;
        events.push(RuntimeEvent::Completed);
    }

    fn entered(&self, cause: Option<AdvanceCause>) -> RuntimeEvent {
        let kind = self
            .protocol
            .as_ref()
            .and_then(|p| p.steps.get(self.step_index))
            .map_or(StepKind::Label, |step| step.kind);
        RuntimeEvent::StepEntered {
            index: self.step_index,
            kind,
            duration: self.durations[self.step_index],
            cause,
        }
    }
}
