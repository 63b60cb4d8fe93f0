use std::sync::Mutex;

use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Warning,
    Error,
}

/// A modal alert. `default_button` is one of `buttons`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub buttons: Vec<String>,
    pub default_button: String,
}

impl Alert {
    pub fn new(kind: AlertKind, title: &str, message: impl Into<String>, buttons: &[&str]) -> Self {
        let buttons: Vec<String> = buttons.iter().map(|b| b.to_string()).collect();
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
            default_button: buttons.first().cloned().unwrap_or_default(),
            buttons,
        }
    }
}

/// The two ways the engine reaches the user.
pub trait Notifier: Send + Sync {
    /// Banner notification. Fire-and-forget.
    fn notify(&self, title: &str, message: &str);

    /// Blocks until the user picks a button; `None` if the alert could not be
    /// shown or was dismissed without a choice.
    fn alert(&self, alert: &Alert) -> Option<String>;
}

/// Notifier for hosts without a desktop: everything goes to the log and
/// alerts resolve to their default button.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        info!("[notify] {title}: {message}");
    }

    fn alert(&self, alert: &Alert) -> Option<String> {
        info!("[alert:{:?}] {}: {}", alert.kind, alert.title, alert.message);
        Some(alert.default_button.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Notification { title: String, message: String },
    Alert(Alert),
}

/// Keeps every delivery in order instead of showing it.
#[derive(Default)]
pub struct RecordingNotifier {
    deliveries: Mutex<Vec<Delivery>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        match self.deliveries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, delivery: Delivery) {
        match self.deliveries.lock() {
            Ok(mut guard) => guard.push(delivery),
            Err(poisoned) => poisoned.into_inner().push(delivery),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.record(Delivery::Notification {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn alert(&self, alert: &Alert) -> Option<String> {
        self.record(Delivery::Alert(alert.clone()));
        Some(alert.default_button.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_button_is_the_default() {
        let alert = Alert::new(AlertKind::Warning, "T", "M", &["Training Now", "Ignore Mission"]);
        assert_eq!(alert.default_button, "Training Now");
        assert_eq!(alert.buttons.len(), 2);
    }

    #[test]
    fn recorder_keeps_order_and_answers_default() {
        let recorder = RecordingNotifier::new();
        recorder.notify("A", "first");
        let chosen = recorder.alert(&Alert::new(AlertKind::Info, "B", "second", &["OK"]));
        assert_eq!(chosen.as_deref(), Some("OK"));
        assert_eq!(recorder.deliveries().len(), 2);
        assert!(matches!(recorder.deliveries()[0], Delivery::Notification { .. }));
    }
}
