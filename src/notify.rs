//! User-visible notifications.
//!
//! Extraction reports a degraded result (fallback used) to the user. Delivery
//! is fire-and-forget: a notifier cannot fail the extraction and nothing is
//! awaited.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// How the host should present a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; the operation still succeeded.
    Info,
    /// Positive confirmation.
    Success,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    /// The notice sent when no main article was found and visible page text
    /// is saved instead.
    #[must_use]
    pub fn limited_extraction() -> Self {
        Self {
            title: "Limited extraction".to_string(),
            message: "Could not find the main article; saving the page's visible text instead."
                .to_string(),
            severity: Severity::Info,
        }
    }
}

/// Sink for notifications. Implementations must not block for long.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<F> Notifier for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification);
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(
            severity = ?notification.severity,
            title = %notification.title,
            "{}",
            notification.message
        );
    }
}

/// Forwards notifications over an mpsc channel. A dropped receiver is ignored.
#[derive(Debug)]
pub struct ChannelNotifier {
    sender: Mutex<Sender<Notification>>,
}

impl ChannelNotifier {
    #[must_use]
    pub fn new(sender: Sender<Notification>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        let Ok(sender) = self.sender.lock() else {
            tracing::debug!("notification channel lock poisoned");
            return;
        };
        if sender.send(notification).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}

/// Deliver `notification`, containing any panic raised by the notifier.
pub(crate) fn deliver(notifier: &dyn Notifier, notification: Notification) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| notifier.notify(notification))) {
        tracing::warn!(
            error = %crate::panic_message(payload.as_ref()),
            "notifier panicked"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_channel_notifier() {
        let (tx, rx) = mpsc::channel();
        let notifier = ChannelNotifier::new(tx);
        notifier.notify(Notification::limited_extraction());

        let received = rx.try_recv().unwrap();
        assert_eq!(received.severity, Severity::Info);
        assert_eq!(received.title, "Limited extraction");
    }

    #[test]
    fn test_channel_notifier_ignores_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        ChannelNotifier::new(tx).notify(Notification::limited_extraction());
    }

    #[test]
    fn test_closure_notifier() {
        let seen = Mutex::new(Vec::new());
        let notifier = |n: Notification| seen.lock().unwrap().push(n.title);
        deliver(&notifier, Notification::limited_extraction());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_deliver_contains_panic() {
        let notifier = |_: Notification| panic!("host went away");
        deliver(&notifier, Notification::limited_extraction());
    }

    #[test]
    fn test_serializes_lowercase_severity() {
        let json = serde_json::to_value(Notification::limited_extraction()).unwrap();
        assert_eq!(json["severity"], "info");
    }
}
