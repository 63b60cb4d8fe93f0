use std::sync::Arc;

use log::debug;
use tokio::task::JoinHandle;

use crate::notifier::{Alert, AlertKind, Notifier};

pub const FOCUS_CHECK: &str = "ENGRESS: Focus Check";
pub const DISCIPLINE_WARNING: &str = "ENGRESS: Discipline Warning";
pub const TRAINING_HALTED: &str = "ENGRESS: Training Halted";
pub const MISSION_BRIEFING: &str = "ENGRESS: Mission Briefing";

/// What the engine wants shown: an optional banner, then an alert with the
/// same title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intervention {
    pub notice: Option<String>,
    pub alert: Alert,
}

impl Intervention {
    /// Daily target missed at a reminder slot.
    pub fn focus_check(slot: &str, briefing: &str) -> Self {
        Self {
            notice: Some(format!(
                "It is {slot}. Your daily mission is incomplete. {briefing}"
            )),
            alert: Alert::new(
                AlertKind::Warning,
                FOCUS_CHECK,
                format!("It is {slot}.\n\n{briefing}"),
                &["Training Now", "Ignore Mission"],
            ),
        }
    }

    pub fn discipline_warning() -> Self {
        Self {
            notice: Some("You have been paused for 20 minutes. Resume your training.".into()),
            alert: Alert::new(
                AlertKind::Warning,
                DISCIPLINE_WARNING,
                "You have been paused for 20 minutes. Stop making excuses and resume your training.",
                &["Resume Training", "Keep Paused"],
            ),
        }
    }

    pub fn training_halted() -> Self {
        Self {
            notice: None,
            alert: Alert::new(
                AlertKind::Warning,
                TRAINING_HALTED,
                "Mission is paused. Comfort is a slow death for progress. Don't be too long.",
                &["Understood"],
            ),
        }
    }

    pub fn mission_briefing(briefing: &str) -> Self {
        Self {
            notice: None,
            alert: Alert::new(AlertKind::Info, MISSION_BRIEFING, briefing, &["I Understand"]),
        }
    }

    pub fn title(&self) -> &str {
        &self.alert.title
    }

    /// Deliver on the blocking pool so the caller never waits on the user.
    /// The handle resolves to the button pressed.
    pub fn dispatch(self, notifier: Arc<dyn Notifier>) -> JoinHandle<Option<String>> {
        tokio::task::spawn_blocking(move || {
            if let Some(notice) = &self.notice {
                notifier.notify(&self.alert.title, notice);
            }
            let choice = notifier.alert(&self.alert);
            debug!("'{}' answered with {:?}", self.alert.title, choice);
            choice
        })
    }
}
