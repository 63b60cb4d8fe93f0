use serde::Serialize;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Everything the shell is told about. Serialized as
/// `{"event": "<name>", "payload": ...}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum AppEvent {
    PauseStateChanged(bool),
    /// The overlay asked to stop the running session.
    HudStop,
    ShowWindow,
    HudNotesUpdate(String),
    UrlActive(String),
    WindowTitle(String),
}

impl AppEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::PauseStateChanged(_) => "pause-state-changed",
            AppEvent::HudStop => "hud-stop",
            AppEvent::ShowWindow => "show-window",
            AppEvent::HudNotesUpdate(_) => "hud-notes-update",
            AppEvent::UrlActive(_) => "url-active",
            AppEvent::WindowTitle(_) => "window-title",
        }
    }
}

/// Broadcast fan-out of [`AppEvent`]s. Emitting with nobody listening is fine.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn emit(&self, event: AppEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_kebab_names() {
        let json = serde_json::to_string(&AppEvent::PauseStateChanged(true)).unwrap();
        assert_eq!(json, r#"{"event":"pause-state-changed","payload":true}"#);

        let json = serde_json::to_string(&AppEvent::HudStop).unwrap();
        assert_eq!(json, r#"{"event":"hud-stop"}"#);
        assert_eq!(AppEvent::HudStop.name(), "hud-stop");
    }

    #[tokio::test]
    async fn subscribers_see_emitted_events() {
        let bus = EventBus::new();
        bus.emit(AppEvent::ShowWindow);
        let mut rx = bus.subscribe();
        bus.emit(AppEvent::UrlActive("https://example.com".into()));
        assert_eq!(rx.recv().await.unwrap(), AppEvent::UrlActive("https://example.com".into()));
    }
}
