//! The interval state machine.
//!
//! `IntervalTimer` owns the countdown and decides which interval comes next.
//! It has no clock of its own: something else calls [`IntervalTimer::tick`]
//! once per elapsed second (see `scheduler`).

use serde::Serialize;
use tracing::{debug, info, warn};

use super::collaborators::{Collaborators, NotificationResult};
use super::duration::{parse_custom_duration, split_hms};
use super::pomodoro::{NOTIFICATION_TITLE, PomodoroMode, TimerConfig};
use crate::error::TimerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Point-in-time view of the timer for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub mode: PomodoroMode,
    pub label: &'static str,
    pub remaining: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub state: TimerState,
    pub completed_work_count: u32,
}

pub struct IntervalTimer {
    config: TimerConfig,
    mode: PomodoroMode,
    remaining: u64,
    running: bool,
    paused: bool,
    completed_work_count: u32,
    collaborators: Collaborators,
}

impl IntervalTimer {
    pub fn new(config: TimerConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            mode: PomodoroMode::Work,
            remaining: config.duration_for(PomodoroMode::Work),
            running: false,
            paused: false,
            completed_work_count: 0,
            collaborators,
        }
    }

    /// Start counting down. Returns false if the timer was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            debug!("start ignored, timer already running");
            return false;
        }
        self.running = true;
        self.paused = false;
        info!(
            mode = self.mode.as_str(),
            remaining = self.remaining,
            "Timer started"
        );
        true
    }

    /// Toggle between running and paused. Has no effect while idle.
    pub fn pause(&mut self) -> TimerState {
        if self.running {
            self.paused = !self.paused;
            if self.paused {
                info!(remaining = self.remaining, "Timer paused");
            } else {
                info!(remaining = self.remaining, "Timer resumed");
            }
        } else {
            debug!("pause ignored, timer not running");
        }
        self.state()
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) {
        if self.state() != TimerState::Running {
            return;
        }

        if self.remaining == 0 {
            self.complete_interval();
            return;
        }

        self.remaining -= 1;
        debug!(remaining = self.remaining, "tick");

        if self.remaining == 0 {
            self.complete_interval();
        } else {
            self.refresh_display();
        }
    }

    fn complete_interval(&mut self) {
        if self.mode == PomodoroMode::Work {
            self.completed_work_count += 1;
        }
        let next = self.mode.next(self.completed_work_count);

        info!(
            finished = self.mode.as_str(),
            next = next.as_str(),
            completed_work = self.completed_work_count,
            "Interval complete"
        );

        self.mode = next;
        self.remaining = self.config.duration_for(next);

        self.refresh_display();

        let message = format!("{} started!", next.as_str());
        match self.collaborators.notifier.notify(NOTIFICATION_TITLE, &message) {
            NotificationResult::Ok => {}
            NotificationResult::Unavailable => warn!("Desktop notifications are unavailable"),
            NotificationResult::Denied => warn!("Permission denied when showing notification"),
            NotificationResult::Failed(reason) => {
                warn!(error = %reason, "Failed to send notification")
            }
        }

        self.collaborators.sounder.play_alert();
    }

    /// Return to the initial idle state: work mode, full work duration, no
    /// completed intervals.
    pub fn reset(&mut self) {
        self.running = false;
        self.paused = false;
        self.mode = PomodoroMode::Work;
        self.remaining = self.config.duration_for(PomodoroMode::Work);
        self.completed_work_count = 0;
        info!("Timer reset");
        self.refresh_display();
    }

    /// Override the time left in the current interval with `HH:MM:SS` input.
    pub fn set_custom_duration(&mut self, input: &str) -> Result<(), TimerError> {
        let total = parse_custom_duration(input)?;
        self.set_custom_seconds(total)
    }

    pub fn set_custom_seconds(&mut self, total_seconds: u64) -> Result<(), TimerError> {
        if total_seconds == 0 {
            return Err(TimerError::invalid("Time must be greater than zero"));
        }
        self.remaining = total_seconds;
        info!(remaining = total_seconds, "Custom time set");
        self.refresh_display();
        Ok(())
    }

    /// Draw the current state without changing it, e.g. before the first tick.
    pub fn redraw(&mut self) {
        self.refresh_display();
    }

    fn refresh_display(&mut self) {
        let (hours, minutes, seconds) = split_hms(self.remaining);
        self.collaborators
            .display
            .update(self.mode.as_str(), hours, minutes, seconds);
    }

    pub fn current_mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.running && self.paused
    }

    pub fn completed_work_count(&self) -> u32 {
        self.completed_work_count
    }

    pub fn state(&self) -> TimerState {
        match (self.running, self.paused) {
            (false, _) => TimerState::Idle,
            (true, false) => TimerState::Running,
            (true, true) => TimerState::Paused,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let (hours, minutes, seconds) = split_hms(self.remaining);
        TimerSnapshot {
            mode: self.mode,
            label: self.mode.as_str(),
            remaining: self.remaining,
            hours,
            minutes,
            seconds,
            state: self.state(),
            completed_work_count: self.completed_work_count,
        }
    }
}
