use super::observer::ProtocolObserver;
use super::runtime::{Phase, ProtocolRuntime, RuntimeEvent};
use crate::content::ResetProtocol;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Skip,
    Pause,
    Resume,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    Completed,
    Closed { phase: Phase },
}

/// Run one protocol session to a terminal state.
///
/// `fetch` yields the step list (model or fallback). Commands are polled
/// before the step timer, so a skip racing an expiry wins. `Close` while
/// the fetch is pending drops the fetch. If the command channel closes the
/// protocol keeps playing on its timer alone.
pub async fn drive<F>(
    fetch: F,
    mut commands: mpsc::Receiver<Command>,
    observer: &dyn ProtocolObserver,
) -> DriveOutcome
where
    F: Future<Output = ResetProtocol>,
{
    let mut runtime = ProtocolRuntime::new();
    let mut commands_open = true;
    let ticket = runtime.begin_fetch();
    tokio::pin!(fetch);

    // ── select: waiting for steps ──
    loop {
        tokio::select! {
            biased;
            cmd = commands.recv(), if commands_open => match cmd {
                Some(Command::Close) => return close(runtime, observer),
                Some(_) => {}
                None => commands_open = false,
            },
            protocol = &mut fetch => {
                let now = Instant::now();
                let events = runtime.deliver(ticket, protocol, now);
                emit(&runtime, &events, observer, now);
                break;
            }
        }
    }

    // ── running ──
    while !runtime.is_complete() {
        let deadline = runtime.deadline();
        if deadline.is_none() && !commands_open {
            // Paused with nobody left to resume.
            runtime.resume(Instant::now());
            continue;
        }
        tokio::select! {
            biased;
            cmd = commands.recv(), if commands_open => {
                let now = Instant::now();
                let events = match cmd {
                    Some(Command::Skip) => runtime.skip(now),
                    Some(Command::Pause) => {
                        runtime.pause(now);
                        Vec::new()
                    }
                    Some(Command::Resume) => {
                        runtime.resume(now);
                        Vec::new()
                    }
                    Some(Command::Close) => return close(runtime, observer),
                    None => {
                        commands_open = false;
                        Vec::new()
                    }
                };
                emit(&runtime, &events, observer, now);
            }
            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                let now = Instant::now();
                let events = runtime.tick(now);
                emit(&runtime, &events, observer, now);
            }
        }
    }

    DriveOutcome::Completed
}

fn emit(
    runtime: &ProtocolRuntime,
    events: &[RuntimeEvent],
    observer: &dyn ProtocolObserver,
    now: Instant,
) {
    if events.is_empty() {
        return;
    }
    let state = runtime.snapshot(now);
    for event in events {
        observer.on_event(event, &state);
    }
}

fn close(runtime: ProtocolRuntime, observer: &dyn ProtocolObserver) -> DriveOutcome {
    let state = runtime.snapshot(Instant::now());
    let event = runtime.close();
    observer.on_event(&event, &state);
    DriveOutcome::Closed { phase: state.phase }
}
