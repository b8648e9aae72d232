//! Line-oriented control surface reading commands from stdin.

use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::display::terminal::OutputFormat;
use crate::error::TimerError;
use crate::pomodoro::duration::{auto_format_entry, format_hms};
use crate::pomodoro::scheduler::TimerHandle;
use crate::pomodoro::timer::{TimerSnapshot, TimerState};

pub const HELP: &str = "\
Commands:
  start | s           start the countdown
  pause | p           pause or resume
  reset | r           back to a fresh Pomodoro
  set <HH:MM:SS>      override the time left (digits only also work: 000130)
  status              show the current state
  help | h | ?        this text
  quit | q | exit     stop the timer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Pause,
    Reset,
    SetCustom(String),
    Status,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, TimerError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    let command = match word.to_lowercase().as_str() {
        "start" | "s" => ConsoleCommand::Start,
        "pause" | "p" | "resume" => ConsoleCommand::Pause,
        "reset" | "r" => ConsoleCommand::Reset,
        "status" => ConsoleCommand::Status,
        "help" | "h" | "?" => ConsoleCommand::Help,
        "quit" | "q" | "exit" => ConsoleCommand::Quit,
        "set" => {
            let entry = words
                .next()
                .ok_or_else(|| TimerError::invalid("Missing time, expected HH:MM:SS"))?;
            let entry = if entry.contains(':') {
                entry.to_string()
            } else {
                auto_format_entry(entry)
            };
            ConsoleCommand::SetCustom(entry)
        }
        other => {
            return Err(TimerError::invalid(format!(
                "Unknown command: {} (type 'help')",
                other
            )));
        }
    };
    Ok(Some(command))
}

pub fn pause_label(state: TimerState) -> &'static str {
    match state {
        TimerState::Paused => "Paused (type 'pause' to resume)",
        TimerState::Running => "Resumed",
        TimerState::Idle => "Timer is not running",
    }
}

pub fn render_status(snapshot: &TimerSnapshot, format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => format!(
            "{} {} {} [{:?}] Pomodoros completed: {}",
            snapshot.mode.emoji(),
            snapshot.label,
            format_hms(snapshot.remaining),
            snapshot.state,
            snapshot.completed_work_count
        ),
        OutputFormat::Json => serde_json::to_string(snapshot)
            .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e)),
    }
}

/// Forward stdin lines from a dedicated thread. A blocking read cannot be
/// cancelled, so it must not live on the runtime.
pub fn spawn_stdin_reader() -> std::io::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read console input");
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

/// Handle commands until `quit` or end of input.
pub async fn run_console(
    handle: TimerHandle,
    mut lines: mpsc::UnboundedReceiver<String>,
    format: OutputFormat,
) -> Result<(), TimerError> {
    loop {
        let Some(line) = lines.recv().await else {
            debug!("console input closed");
            return Ok(());
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("\n{}", e);
                continue;
            }
        };

        match command {
            ConsoleCommand::Start => {
                if !handle.start().await? {
                    println!("\nTimer is already running");
                }
            }
            ConsoleCommand::Pause => {
                let state = handle.pause().await?;
                println!("\n{}", pause_label(state));
            }
            ConsoleCommand::Reset => handle.reset().await?,
            ConsoleCommand::SetCustom(entry) => match handle.set_custom_duration(&entry).await {
                Ok(()) => {}
                Err(e @ TimerError::InvalidInput(_)) => println!("\n{}", e),
                Err(e) => return Err(e),
            },
            ConsoleCommand::Status => {
                let snapshot = handle.snapshot().await?;
                println!("\n{}", render_status(&snapshot, format));
            }
            ConsoleCommand::Help => println!("\n{}", HELP),
            ConsoleCommand::Quit => return Ok(()),
        }
    }
}
