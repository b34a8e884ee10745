//! Client-side playback of a reset protocol.
//!
//! [`ProtocolRuntime`] is the pure state machine (`select → running →
//! complete`, plus close from anywhere). [`drive`] owns one runtime on a
//! tokio task and feeds it timer expiries and user commands.

mod driver;
mod observer;
mod runtime;

pub use driver::{Command, DriveOutcome, drive};
pub use observer::{ChannelObserver, LogObserver, MultiObserver, ProtocolObserver};
pub use runtime::{
    AdvanceCause, DEFAULT_STEP_SECS, FetchTicket, Phase, ProtocolRunState, ProtocolRuntime,
    RuntimeEvent,
};

/// Russian countdown label: "45 сек", "2 мин", "1 мин 30 сек".
pub fn format_duration_ru(secs: u64) -> String {
    let (mins, rest) = (secs / 60, secs % 60);
    match (mins, rest) {
        (0, s) => format!("{s} сек"),
        (m, 0) => format!("{m} мин"),
        (m, s) => format!("{m} мин {s} сек"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_russian_durations() {
        assert_eq!(format_duration_ru(0), "0 сек");
        assert_eq!(format_duration_ru(45), "45 сек");
        assert_eq!(format_duration_ru(120), "2 мин");
        assert_eq!(format_duration_ru(90), "1 мин 30 сек");
    }
}
