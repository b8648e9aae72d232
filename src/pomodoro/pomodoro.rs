use serde::Serialize;

use crate::error::TimerError;

pub const TICK_INTERVAL_MS: u64 = 1000; // One countdown step per second
pub const POMODORO_WORK_SECS: u64 = 25 * 60; // Default Pomodoro work time
pub const POMODORO_SHORT_BREAK_SECS: u64 = 5 * 60; // Default short break
pub const POMODORO_LONG_BREAK_SECS: u64 = 30 * 60; // Default long break
pub const POMODOROS_UNTIL_LONG_BREAK: u32 = 4;

pub const NOTIFICATION_TITLE: &str = "Pomodoro Timer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PomodoroMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroMode::Work => "Pomodoro",
            PomodoroMode::ShortBreak => "Short Break",
            PomodoroMode::LongBreak => "Long Break",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            PomodoroMode::Work => "🍅",
            PomodoroMode::ShortBreak => "☕",
            PomodoroMode::LongBreak => "🌴",
        }
    }

    /// Mode that follows this one, given how many work intervals have
    /// completed including the one just finished.
    pub fn next(&self, completed_work: u32) -> PomodoroMode {
        match self {
            PomodoroMode::Work if completed_work % POMODOROS_UNTIL_LONG_BREAK == 0 => {
                PomodoroMode::LongBreak
            }
            PomodoroMode::Work => PomodoroMode::ShortBreak,
            PomodoroMode::ShortBreak | PomodoroMode::LongBreak => PomodoroMode::Work,
        }
    }
}

/// Fixed interval lengths, in seconds. Only constructible with positive
/// durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    work_secs: u64,
    short_break_secs: u64,
    long_break_secs: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_secs: POMODORO_WORK_SECS,
            short_break_secs: POMODORO_SHORT_BREAK_SECS,
            long_break_secs: POMODORO_LONG_BREAK_SECS,
        }
    }
}

impl TimerConfig {
    pub fn new(
        work_secs: u64,
        short_break_secs: u64,
        long_break_secs: u64,
    ) -> Result<Self, TimerError> {
        for (name, secs) in [
            ("Work", work_secs),
            ("Short break", short_break_secs),
            ("Long break", long_break_secs),
        ] {
            if secs == 0 {
                return Err(TimerError::invalid(format!(
                    "{} duration must be greater than zero",
                    name
                )));
            }
        }
        Ok(Self {
            work_secs,
            short_break_secs,
            long_break_secs,
        })
    }

    pub fn duration_for(&self, mode: PomodoroMode) -> u64 {
        match mode {
            PomodoroMode::Work => self.work_secs,
            PomodoroMode::ShortBreak => self.short_break_secs,
            PomodoroMode::LongBreak => self.long_break_secs,
        }
    }
}
