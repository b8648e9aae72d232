//! Pomodoro interval timer: a work/break countdown state machine with a
//! tokio tick scheduler and desktop, sound and terminal alerts.

pub mod alerts;
pub mod config;
pub mod console;
pub mod display;
pub mod error;
pub mod pomodoro;

pub use error::TimerError;
pub use pomodoro::pomodoro::{PomodoroMode, TimerConfig};
pub use pomodoro::scheduler::{TimerHandle, spawn_timer};
pub use pomodoro::timer::{IntervalTimer, TimerSnapshot, TimerState};
