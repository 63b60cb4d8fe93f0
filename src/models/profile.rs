use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub test_date: String,
    pub target_score: f64,
    /// Date the startup briefing was last shown.
    pub last_open_date: String,
    pub is_setup_complete: bool,
    /// Local `HH:MM` slots.
    #[serde(deserialize_with = "null_as_default")]
    pub reminder_times: Vec<String>,
    pub reminder_enabled: bool,
    pub tutorial_seen: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            test_date: "2026-03-01".into(),
            target_score: 7.5,
            last_open_date: String::new(),
            is_setup_complete: false,
            reminder_times: vec!["10:00".into(), "22:00".into()],
            reminder_enabled: true,
            tutorial_seen: false,
        }
    }
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            "Candidate"
        } else {
            name
        }
    }
}
