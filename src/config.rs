use clap::Parser;
use std::path::PathBuf;

use crate::display::terminal::OutputFormat;
use crate::error::TimerError;
use crate::pomodoro::pomodoro::{
    POMODORO_LONG_BREAK_SECS, POMODORO_SHORT_BREAK_SECS, POMODORO_WORK_SECS, TimerConfig,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "pomodoro_timer", version, about = "🍅 Pomodoro timer with automatic work/break cycling")]
pub struct Args {
    /// Work interval length in seconds
    #[arg(long, env = "POMODORO_WORK_SECS", default_value_t = POMODORO_WORK_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub work_secs: u64,

    /// Short break length in seconds
    #[arg(long, env = "POMODORO_SHORT_BREAK_SECS", default_value_t = POMODORO_SHORT_BREAK_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub short_break_secs: u64,

    /// Long break length in seconds (every 4th break)
    #[arg(long, env = "POMODORO_LONG_BREAK_SECS", default_value_t = POMODORO_LONG_BREAK_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub long_break_secs: u64,

    /// Alert sound file (falls back to the system sounds)
    #[arg(long, env = "POMODORO_SOUND")]
    pub sound: Option<PathBuf>,

    /// Disable the alert sound
    #[arg(long)]
    pub no_sound: bool,

    /// Print notifications to the console instead of the desktop
    #[arg(long)]
    pub no_notify: bool,

    /// Countdown output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Start counting down immediately
    #[arg(long)]
    pub autostart: bool,

    /// Append logs to this file instead of stderr
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "pomodoro_timer=trace"
    #[arg(long, env = "RUST_LOG", default_value = "pomodoro_timer=info")]
    pub log_level: String,
}

impl Args {
    pub fn timer_config(&self) -> Result<TimerConfig, TimerError> {
        TimerConfig::new(self.work_secs, self.short_break_secs, self.long_break_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pomodoro_timer"]).unwrap();
        assert_eq!(args.timer_config(), Ok(TimerConfig::default()));
        assert_eq!(args.format, OutputFormat::Plain);
        assert!(!args.autostart);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "pomodoro_timer",
            "--work-secs",
            "60",
            "--short-break-secs",
            "10",
            "--long-break-secs",
            "20",
            "--format",
            "json",
            "--no-sound",
        ])
        .unwrap();
        assert_eq!(
            args.timer_config(),
            TimerConfig::new(60, 10, 20)
        );
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.no_sound);
    }

    #[test]
    fn test_rejects_zero_duration() {
        assert!(Args::try_parse_from(["pomodoro_timer", "--work-secs", "0"]).is_err());
    }
}
