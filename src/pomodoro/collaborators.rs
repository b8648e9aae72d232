//! Interfaces the interval timer drives when its state changes.

/// Outcome reported by a notification backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    Ok,
    Unavailable,
    Denied,
    Failed(String),
}

impl NotificationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, NotificationResult::Ok)
    }
}

/// Renders the remaining time and the current mode label.
pub trait Display: Send {
    fn update(&mut self, mode: &str, hours: u64, minutes: u64, seconds: u64);
}

/// Best-effort user notification. Must not panic or block for long.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str) -> NotificationResult;
}

/// Best-effort alert tone.
pub trait Sounder: Send + Sync {
    fn play_alert(&self);
}

pub struct Collaborators {
    pub display: Box<dyn Display>,
    pub notifier: Box<dyn Notifier>,
    pub sounder: Box<dyn Sounder>,
}

impl Collaborators {
    pub fn new(
        display: impl Display + 'static,
        notifier: impl Notifier + 'static,
        sounder: impl Sounder + 'static,
    ) -> Self {
        Self {
            display: Box::new(display),
            notifier: Box::new(notifier),
            sounder: Box::new(sounder),
        }
    }
}
