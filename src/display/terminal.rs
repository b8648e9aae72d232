use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

use crate::pomodoro::collaborators::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Single redrawn status line
    #[default]
    Plain,
    /// One JSON object per update
    Json,
}

#[derive(Debug, Serialize)]
struct DisplayLine<'a> {
    mode: &'a str,
    hours: u64,
    minutes: u64,
    seconds: u64,
}

pub fn render_plain(mode: &str, hours: u64, minutes: u64, seconds: u64) -> String {
    format!("{}  {:02}:{:02}:{:02}", mode, hours, minutes, seconds)
}

pub fn render_json(mode: &str, hours: u64, minutes: u64, seconds: u64) -> serde_json::Result<String> {
    serde_json::to_string(&DisplayLine {
        mode,
        hours,
        minutes,
        seconds,
    })
}

/// Writes countdown updates to stdout.
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    format: OutputFormat,
}

impl TerminalDisplay {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Display for TerminalDisplay {
    fn update(&mut self, mode: &str, hours: u64, minutes: u64, seconds: u64) {
        let mut stdout = io::stdout().lock();
        let written = match self.format {
            // Clear the line and redraw in place
            OutputFormat::Plain => write!(
                stdout,
                "\r\x1b[2K{}",
                render_plain(mode, hours, minutes, seconds)
            ),
            OutputFormat::Json => match render_json(mode, hours, minutes, seconds) {
                Ok(line) => writeln!(stdout, "{}", line),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to encode display update");
                    return;
                }
            },
        };
        if let Err(e) = written.and_then(|_| stdout.flush()) {
            tracing::debug!(error = %e, "Display write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        assert_eq!(render_plain("Pomodoro", 0, 25, 0), "Pomodoro  00:25:00");
        assert_eq!(render_plain("Long Break", 1, 2, 3), "Long Break  01:02:03");
    }

    #[test]
    fn test_render_json() {
        let line = render_json("Short Break", 0, 5, 0).unwrap();
        assert_eq!(
            line,
            r#"{"mode":"Short Break","hours":0,"minutes":5,"seconds":0}"#
        );
    }
}
