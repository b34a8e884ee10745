use super::runtime::{ProtocolRunState, RuntimeEvent};
use tokio::sync::mpsc;
use tracing::info;

/// Sink for runtime transition cues (rendering, haptics, logs).
pub trait ProtocolObserver: Send + Sync {
    fn on_event(&self, event: &RuntimeEvent, state: &ProtocolRunState);

    fn name(&self) -> &str;
}

/// Tracing-backed observer.
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolObserver for LogObserver {
    fn on_event(&self, event: &RuntimeEvent, state: &ProtocolRunState) {
        match event {
            RuntimeEvent::Started {
                trigger,
                total_steps,
            } => {
                info!(trigger = %trigger, steps = total_steps, "protocol.start");
            }
            RuntimeEvent::StepEntered {
                index,
                kind,
                duration,
                cause,
            } => {
                let cause = cause.map_or_else(|| "start".to_string(), |c| c.to_string());
                info!(
                    step = index,
                    kind = %kind,
                    duration_secs = duration.as_secs(),
                    cause = %cause,
                    "protocol.step"
                );
            }
            RuntimeEvent::Completed => {
                info!(steps = state.total_steps, "protocol.complete");
            }
            RuntimeEvent::Closed { phase } => {
                info!(phase = %phase, step = state.step_index, "protocol.closed");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Forwards every event to a channel; dropped receivers are ignored.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<(RuntimeEvent, ProtocolRunState)>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(RuntimeEvent, ProtocolRunState)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProtocolObserver for ChannelObserver {
    fn on_event(&self, event: &RuntimeEvent, state: &ProtocolRunState) {
        let _ = self.tx.send((event.clone(), state.clone()));
    }

    fn name(&self) -> &str {
        "channel"
    }
}

/// Fans one event out to several observers in order.
pub struct MultiObserver {
    observers: Vec<Box<dyn ProtocolObserver>>,
}

impl MultiObserver {
    pub fn new(observers: Vec<Box<dyn ProtocolObserver>>) -> Self {
        Self { observers }
    }
}

impl ProtocolObserver for MultiObserver {
    fn on_event(&self, event: &RuntimeEvent, state: &ProtocolRunState) {
        for observer in &self.observers {
            observer.on_event(event, state);
        }
    }

    fn name(&self) -> &str {
        "multi"
    }
}
