use ruach_compass::content::{
    DEFAULT_TRUST_ANCHOR_RU, ProtocolStep, ResetProtocol, StepKind, TriggerType,
};
use ruach_compass::protocol::{
    AdvanceCause, ChannelObserver, Command, DriveOutcome, Phase, ProtocolRunState, RuntimeEvent,
    drive,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

fn protocol(durations: &[u64]) -> ResetProtocol {
    ResetProtocol {
        trigger: TriggerType::Uncertainty,
        steps: durations
            .iter()
            .map(|&secs| ProtocolStep::new(StepKind::Breath, "Дыши", "Вдох на 4 счёта", secs))
            .collect(),
        trust_anchor_ru: DEFAULT_TRUST_ANCHOR_RU.to_string(),
    }
}

fn drain(
    rx: &mut mpsc::UnboundedReceiver<(RuntimeEvent, ProtocolRunState)>,
) -> Vec<(RuntimeEvent, ProtocolRunState)> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn assert_elapsed(started: Instant, secs: u64) {
    let elapsed = started.elapsed();
    assert!(
        elapsed >= Duration::from_secs(secs) && elapsed < Duration::from_secs(secs + 1),
        "expected ~{secs}s, got {elapsed:?}"
    );
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::test(start_paused = true)]
async fn plays_every_step_on_the_timer() {
    let (_tx, rx) = mpsc::channel(8);
    let (observer, mut events) = ChannelObserver::new();
    let started = Instant::now();

    let outcome = drive(async { protocol(&[10, 30, 20]) }, rx, &observer).await;

    assert_eq!(outcome, DriveOutcome::Completed);
    assert_elapsed(started, 60);

    let events = drain(&mut events);
    let kinds: Vec<_> = events
        .iter()
        .map(|(event, _)| match event {
            RuntimeEvent::Started { .. } => "started",
            RuntimeEvent::StepEntered { .. } => "step",
            RuntimeEvent::Completed => "completed",
            RuntimeEvent::Closed { .. } => "closed",
        })
        .collect();
    assert_eq!(kinds, ["started", "step", "step", "step", "completed"]);
    assert_eq!(events.last().map(|(_, s)| s.phase), Some(Phase::Complete));
}

#[tokio::test(start_paused = true)]
async fn skip_cancels_the_running_timer() {
    let (tx, rx) = mpsc::channel(8);
    let (observer, mut events) = ChannelObserver::new();
    let started = Instant::now();

    let handle = tokio::spawn(async move {
        drive(async { protocol(&[10, 10, 10]) }, rx, &observer).await
    });

    tokio::time::sleep(Duration::from_secs(3)).await;
    tx.send(Command::Skip).await.expect("driver should accept skip");

    let outcome = handle.await.expect("driver task should not panic");
    assert_eq!(outcome, DriveOutcome::Completed);
    // 3 s into step 0, then two full steps.
    assert_elapsed(started, 23);

    let skipped = drain(&mut events)
        .into_iter()
        .find_map(|(event, state)| match event {
            RuntimeEvent::StepEntered {
                cause: Some(AdvanceCause::Skipped),
                index,
                ..
            } => Some((index, state)),
            _ => None,
        });
    let (index, state) = skipped.expect("a skipped transition should be observed");
    assert_eq!(index, 1);
    assert_eq!(state.phase, Phase::Running);
    assert_eq!(state.step_index, 1);
    assert_eq!(state.time_remaining, 10);
}

#[tokio::test(start_paused = true)]
async fn pause_and_resume_do_not_drift() {
    let (tx, rx) = mpsc::channel(8);
    let (observer, _events) = ChannelObserver::new();
    let started = Instant::now();

    let handle = tokio::spawn(async move {
        drive(async { protocol(&[10]) }, rx, &observer).await
    });

    tokio::time::sleep(Duration::from_secs(4)).await;
    tx.send(Command::Pause).await.expect("driver should accept pause");
    tokio::time::sleep(Duration::from_secs(100)).await;
    tx.send(Command::Resume).await.expect("driver should accept resume");

    assert_eq!(
        handle.await.expect("driver task should not panic"),
        DriveOutcome::Completed
    );
    assert_elapsed(started, 110);
}

#[tokio::test(start_paused = true)]
async fn close_while_fetching_drops_the_fetch() {
    let dropped = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&dropped);
    let fetch = async move {
        let _guard = DropFlag(flag);
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        protocol(&[10])
    };

    let (tx, rx) = mpsc::channel(8);
    let (observer, mut events) = ChannelObserver::new();
    let handle = tokio::spawn(async move { drive(fetch, rx, &observer).await });

    tokio::time::sleep(Duration::from_secs(1)).await;
    tx.send(Command::Close).await.expect("driver should accept close");

    let outcome = handle.await.expect("driver task should not panic");
    assert_eq!(
        outcome,
        DriveOutcome::Closed {
            phase: Phase::Select
        }
    );
    assert!(dropped.load(Ordering::SeqCst));

    let events = drain(&mut events);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].0,
        RuntimeEvent::Closed {
            phase: Phase::Select
        }
    );
}

#[tokio::test(start_paused = true)]
async fn close_mid_protocol_stops_immediately() {
    let (tx, rx) = mpsc::channel(8);
    let (observer, mut events) = ChannelObserver::new();
    let started = Instant::now();

    let handle = tokio::spawn(async move {
        drive(async { protocol(&[10, 10]) }, rx, &observer).await
    });

    tokio::time::sleep(Duration::from_secs(12)).await;
    tx.send(Command::Close).await.expect("driver should accept close");

    assert_eq!(
        handle.await.expect("driver task should not panic"),
        DriveOutcome::Closed {
            phase: Phase::Running
        }
    );
    assert_elapsed(started, 12);
    assert!(
        !drain(&mut events)
            .iter()
            .any(|(event, _)| *event == RuntimeEvent::Completed)
    );
}

#[tokio::test(start_paused = true)]
async fn dropped_command_channel_keeps_playing() {
    let (tx, rx) = mpsc::channel(8);
    let (observer, _events) = ChannelObserver::new();
    let started = Instant::now();

    let handle = tokio::spawn(async move {
        drive(async { protocol(&[5, 5]) }, rx, &observer).await
    });
    tokio::time::sleep(Duration::from_secs(2)).await;
    tx.send(Command::Pause).await.expect("driver should accept pause");
    drop(tx);

    assert_eq!(
        handle.await.expect("driver task should not panic"),
        DriveOutcome::Completed
    );
    assert_elapsed(started, 10);
}
