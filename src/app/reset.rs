//! Terminal playback of a reset protocol.

use crate::content::{ResetProtocol, ResetRequest, Source};
use crate::generation::Orchestrator;
use crate::protocol::{
    AdvanceCause, Command, DriveOutcome, LogObserver, MultiObserver, ProtocolObserver,
    ProtocolRunState, RuntimeEvent, drive, format_duration_ru,
};
use crate::ui::style;
use anyhow::Result;
use std::sync::{Arc, OnceLock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Prints each transition; remembers the protocol so steps can be shown.
#[derive(Clone)]
struct TerminalObserver {
    protocol: Arc<OnceLock<(ResetProtocol, Source)>>,
}

impl TerminalObserver {
    fn new() -> Self {
        Self {
            protocol: Arc::new(OnceLock::new()),
        }
    }

    fn remember(&self, protocol: ResetProtocol, source: Source) {
        let _ = self.protocol.set((protocol, source));
    }

    /// Steps have arrived and the runtime accepts pause/resume.
    fn is_playing(&self) -> bool {
        self.protocol.get().is_some()
    }

    fn render(&self, event: &RuntimeEvent, state: &ProtocolRunState) -> Option<String> {
        let (protocol, source) = self.protocol.get()?;
        let text = match event {
            RuntimeEvent::Started {
                trigger,
                total_steps,
            } => {
                let origin = match source {
                    Source::Ai => "",
                    Source::Fallback => " (офлайн)",
                };
                format!(
                    "{}{}\n{}",
                    style::header(format!("Перезагрузка: {}", trigger.label_ru())),
                    style::dim(origin),
                    style::dim(format!(
                        "{total_steps} шагов · Enter = дальше, p = пауза, q = выход"
                    )),
                )
            }
            RuntimeEvent::StepEntered {
                index,
                duration,
                cause,
                ..
            } => {
                let step = protocol.steps.get(*index)?;
                let skipped = if *cause == Some(AdvanceCause::Skipped) {
                    style::dim(" (пропущено)")
                } else {
                    String::new()
                };
                format!(
                    "\n{} {}{}\n{}\n{}",
                    style::accent(format!("{}/{}", index + 1, state.total_steps)),
                    style::header(&step.title_ru),
                    skipped,
                    step.content_ru,
                    style::dim(format_duration_ru(duration.as_secs())),
                )
            }
            RuntimeEvent::Completed => format!(
                "\n{}\n{}",
                style::success("Готово."),
                style::header(&protocol.trust_anchor_ru)
            ),
            RuntimeEvent::Closed { .. } => style::yellow("\nОстановлено."),
        };
        Some(text)
    }
}

impl ProtocolObserver for TerminalObserver {
    fn on_event(&self, event: &RuntimeEvent, state: &ProtocolRunState) {
        if let Some(text) = self.render(event, state) {
            println!("{text}");
        }
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

/// Map one line of terminal input to a runtime command. Pause input is
/// ignored until the protocol is playing, so the toggle stays in step with
/// the runtime.
fn parse_input(line: &str, paused: &mut bool, playing: bool) -> Option<Command> {
    match line.trim().to_lowercase().as_str() {
        "" | "n" | "s" => Some(Command::Skip),
        "p" if !playing => None,
        "p" => {
            *paused = !*paused;
            Some(if *paused {
                Command::Pause
            } else {
                Command::Resume
            })
        }
        "q" => Some(Command::Close),
        _ => None,
    }
}

async fn forward_stdin(tx: mpsc::Sender<Command>, terminal: TerminalObserver) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut paused = false;
    while let Ok(Some(line)) = lines.next_line().await {
        let Some(command) = parse_input(&line, &mut paused, terminal.is_playing()) else {
            continue;
        };
        if command == Command::Pause {
            println!("{}", style::yellow("Пауза. p = продолжить"));
        }
        if tx.send(command).await.is_err() {
            break;
        }
    }
    debug!("protocol.stdin_closed");
}

/// Fetch (model or catalog) and play a reset protocol until it completes or
/// the user quits.
pub(super) async fn play_reset(orchestrator: &Orchestrator, request: &ResetRequest) -> Result<()> {
    let terminal = TerminalObserver::new();
    let observer = MultiObserver::new(vec![
        Box::new(terminal.clone()),
        Box::new(LogObserver::new()),
    ]);

    let (tx, rx) = mpsc::channel(8);
    let input = tokio::spawn(forward_stdin(tx, terminal.clone()));

    println!("{}", style::dim("Готовлю протокол..."));
    let fetch = async {
        let generated = orchestrator.reset(request).await;
        terminal.remember(generated.body.clone(), generated.source);
        generated.body
    };
    let outcome = drive(fetch, rx, &observer).await;
    input.abort();

    if let DriveOutcome::Closed { phase } = outcome {
        debug!(%phase, "protocol.closed_by_user");
    }
    Ok(())
}
