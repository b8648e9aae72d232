use chrono::Local;
use notify_rust::Notification;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tracing::{debug, warn};

use crate::pomodoro::collaborators::{NotificationResult, Notifier};

const APP_NAME: &str = "Pomodoro Timer";
const NOTIFICATION_TIMEOUT_MS: i32 = 10_000;

/// Desktop notification through the platform notification service.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) -> NotificationResult {
        let shown = Notification::new()
            .summary(title)
            .body(message)
            .appname(APP_NAME)
            .timeout(NOTIFICATION_TIMEOUT_MS)
            .show();

        match shown {
            Ok(_) => NotificationResult::Ok,
            Err(e) => classify_failure(&e.to_string()),
        }
    }
}

fn classify_failure(reason: &str) -> NotificationResult {
    let lower = reason.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not allowed")
    {
        NotificationResult::Denied
    } else if lower.contains("not supported") || lower.contains("not implemented") {
        NotificationResult::Unavailable
    } else {
        NotificationResult::Failed(reason.to_string())
    }
}

/// Prints notifications to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str) -> NotificationResult {
        println!("\n[{}] {}: {}", Local::now().format("%H:%M:%S"), title, message);
        NotificationResult::Ok
    }
}

/// Tries `primary`, and hands the notification to `fallback` when it fails.
pub struct FallbackNotifier<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Notifier, F: Notifier> FallbackNotifier<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: Notifier, F: Notifier> Notifier for FallbackNotifier<P, F> {
    fn notify(&self, title: &str, message: &str) -> NotificationResult {
        match self.primary.notify(title, message) {
            NotificationResult::Ok => NotificationResult::Ok,
            outcome => {
                debug!(?outcome, "primary notifier failed, using fallback");
                self.fallback.notify(title, message)
            }
        }
    }
}

/// Delivers notifications on a worker thread so a slow notification
/// service never holds up the caller.
pub struct BackgroundNotifier {
    tx: Sender<(String, String)>,
}

impl BackgroundNotifier {
    pub fn spawn<N: Notifier + 'static>(inner: N) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<(String, String)>();
        thread::Builder::new()
            .name("notifier".to_string())
            .spawn(move || {
                while let Ok((title, message)) = rx.recv() {
                    let outcome = inner.notify(&title, &message);
                    if !outcome.is_ok() {
                        warn!(?outcome, "Notification not delivered");
                    }
                }
            })?;
        Ok(Self { tx })
    }
}

impl Notifier for BackgroundNotifier {
    fn notify(&self, title: &str, message: &str) -> NotificationResult {
        match self.tx.send((title.to_string(), message.to_string())) {
            Ok(()) => NotificationResult::Ok,
            Err(_) => NotificationResult::Unavailable,
        }
    }
}
