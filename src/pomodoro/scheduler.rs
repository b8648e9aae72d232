//! Drives an [`IntervalTimer`] from a one-second tick source.
//!
//! A single task owns the timer and handles both control commands and
//! ticks, so no two mutations ever overlap. The tick source only exists
//! while the timer is running; reset drops it, which also drops any tick
//! that was still pending.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use super::pomodoro::TICK_INTERVAL_MS;
use super::timer::{IntervalTimer, TimerSnapshot, TimerState};
use crate::error::TimerError;

#[derive(Debug)]
enum Command {
    Start {
        reply: oneshot::Sender<bool>,
    },
    Pause {
        reply: oneshot::Sender<TimerState>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    SetCustomDuration {
        input: String,
        reply: oneshot::Sender<Result<(), TimerError>>,
    },
    Snapshot {
        reply: oneshot::Sender<TimerSnapshot>,
    },
    Shutdown,
}

/// Cloneable control handle for a running timer task.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl TimerHandle {
    /// Start the countdown. Resolves to false if it was already running.
    pub async fn start(&self) -> Result<bool, TimerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Start { reply })?;
        rx.await.map_err(|_| TimerError::SchedulerStopped)
    }

    /// Toggle pause and return the resulting state.
    pub async fn pause(&self) -> Result<TimerState, TimerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Pause { reply })?;
        rx.await.map_err(|_| TimerError::SchedulerStopped)
    }

    /// Reset the timer. Once this resolves, no tick from before the reset
    /// can fire.
    pub async fn reset(&self) -> Result<(), TimerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Reset { reply })?;
        rx.await.map_err(|_| TimerError::SchedulerStopped)
    }

    pub async fn set_custom_duration(&self, input: &str) -> Result<(), TimerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SetCustomDuration {
            input: input.to_string(),
            reply,
        })?;
        rx.await.map_err(|_| TimerError::SchedulerStopped)?
    }

    pub async fn snapshot(&self) -> Result<TimerSnapshot, TimerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply })?;
        rx.await.map_err(|_| TimerError::SchedulerStopped)
    }

    pub fn shutdown(&self) -> Result<(), TimerError> {
        self.send(Command::Shutdown)
    }

    fn send(&self, command: Command) -> Result<(), TimerError> {
        self.tx
            .send(command)
            .map_err(|_| TimerError::SchedulerStopped)
    }
}

/// Move `timer` onto its own task. The task ends on shutdown or once every
/// handle is dropped, returning the timer.
pub fn spawn_timer(timer: IntervalTimer) -> (TimerHandle, JoinHandle<IntervalTimer>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_timer(timer, rx));
    (TimerHandle { tx }, task)
}

fn new_ticker() -> Interval {
    let period = Duration::from_millis(TICK_INTERVAL_MS);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn run_timer(
    mut timer: IntervalTimer,
    mut rx: mpsc::UnboundedReceiver<Command>,
) -> IntervalTimer {
    let mut ticker: Option<Interval> = None;

    loop {
        tokio::select! {
            command = rx.recv() => {
                let Some(command) = command else {
                    debug!("all timer handles dropped");
                    break;
                };
                match command {
                    Command::Start { reply } => {
                        let started = timer.start();
                        if started {
                            ticker = Some(new_ticker());
                        }
                        let _ = reply.send(started);
                    }
                    Command::Pause { reply } => {
                        let _ = reply.send(timer.pause());
                    }
                    Command::Reset { reply } => {
                        ticker = None;
                        timer.reset();
                        let _ = reply.send(());
                    }
                    Command::SetCustomDuration { input, reply } => {
                        let _ = reply.send(timer.set_custom_duration(&input));
                    }
                    Command::Snapshot { reply } => {
                        let _ = reply.send(timer.snapshot());
                    }
                    Command::Shutdown => break,
                }
            }
            _ = next_tick(&mut ticker) => {
                timer.tick();
                if !timer.is_running() {
                    ticker = None;
                }
            }
        }
    }

    info!("Timer scheduler stopped");
    timer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pomodoro::collaborators::testing::{Event, Recorder};
    use crate::pomodoro::pomodoro::{PomodoroMode, TimerConfig};
    use tokio::time::sleep;

    fn spawn_with(config: TimerConfig) -> (TimerHandle, JoinHandle<IntervalTimer>, Recorder) {
        let recorder = Recorder::default();
        let timer = IntervalTimer::new(config, recorder.collaborators());
        let (handle, task) = spawn_timer(timer);
        (handle, task, recorder)
    }

    fn short_config() -> TimerConfig {
        TimerConfig::new(3, 2, 5).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_second() {
        let (handle, _task, _) = spawn_with(TimerConfig::default());
        handle.start().await.unwrap();

        sleep(Duration::from_millis(3500)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.remaining, 1497);
        assert_eq!(snapshot.state, TimerState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timer_does_not_tick() {
        let (handle, _task, recorder) = spawn_with(TimerConfig::default());
        sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.snapshot().await.unwrap().remaining, 1500);
        assert!(recorder.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_keeps_single_tick_source() {
        let (handle, _task, _) = spawn_with(TimerConfig::default());
        assert!(handle.start().await.unwrap());
        sleep(Duration::from_millis(500)).await;
        assert!(!handle.start().await.unwrap());

        sleep(Duration::from_millis(2800)).await;
        assert_eq!(handle.snapshot().await.unwrap().remaining, 1497);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_decrements() {
        let (handle, _task, _) = spawn_with(TimerConfig::default());
        handle.start().await.unwrap();
        sleep(Duration::from_millis(2500)).await;

        assert_eq!(handle.pause().await.unwrap(), TimerState::Paused);
        sleep(Duration::from_secs(30)).await;
        assert_eq!(handle.snapshot().await.unwrap().remaining, 1498);

        assert_eq!(handle.pause().await.unwrap(), TimerState::Running);
        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.snapshot().await.unwrap().remaining, 1497);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_ticks() {
        let (handle, _task, recorder) = spawn_with(TimerConfig::default());
        handle.start().await.unwrap();
        sleep(Duration::from_millis(2500)).await;

        handle.reset().await.unwrap();
        assert_eq!(
            recorder.events().last(),
            Some(&Event::Display("Pomodoro".to_string(), 0, 25, 0))
        );
        recorder.clear();
        sleep(Duration::from_secs(10)).await;

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.remaining, 1500);
        assert_eq!(snapshot.state, TimerState::Idle);
        assert!(
            !recorder
                .events()
                .iter()
                .any(|e| matches!(e, Event::Display(..))),
            "no redraw may follow a reset"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_reset_uses_fresh_ticker() {
        let (handle, _task, _) = spawn_with(TimerConfig::default());
        handle.start().await.unwrap();
        sleep(Duration::from_millis(1900)).await;
        handle.reset().await.unwrap();
        handle.start().await.unwrap();

        sleep(Duration::from_millis(500)).await;
        assert_eq!(handle.snapshot().await.unwrap().remaining, 1500);
        sleep(Duration::from_millis(600)).await;
        assert_eq!(handle.snapshot().await.unwrap().remaining, 1499);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_automatically() {
        let (handle, _task, recorder) = spawn_with(short_config());
        handle.start().await.unwrap();

        sleep(Duration::from_millis(3500)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.mode, PomodoroMode::ShortBreak);
        assert_eq!(snapshot.remaining, 2);
        assert_eq!(snapshot.completed_work_count, 1);

        sleep(Duration::from_secs(2)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.mode, PomodoroMode::Work);
        assert_eq!(snapshot.remaining, 3);

        let notifications: Vec<_> = recorder
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Notify(_, message) => Some(message),
                _ => None,
            })
            .collect();
        assert_eq!(
            notifications,
            vec!["Short Break started!", "Pomodoro started!"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_custom_duration_through_handle() {
        let (handle, _task, _) = spawn_with(TimerConfig::default());
        handle.set_custom_duration("00:00:05").await.unwrap();
        assert_eq!(handle.snapshot().await.unwrap().remaining, 5);

        let err = handle.set_custom_duration("00:00:00").await.unwrap_err();
        assert!(matches!(err, TimerError::InvalidInput(_)));
        assert_eq!(handle.snapshot().await.unwrap().remaining, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_returns_timer() {
        let (handle, task, _) = spawn_with(TimerConfig::default());
        handle.start().await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        handle.shutdown().unwrap();

        let timer = task.await.unwrap();
        assert_eq!(timer.remaining_seconds(), 1499);
        assert!(matches!(
            handle.snapshot().await,
            Err(TimerError::SchedulerStopped)
        ));
    }
}
