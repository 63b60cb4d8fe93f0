use serde::{Deserialize, Serialize};

use super::{null_as_default, DailyLog, UserProfile, VocabItem};

/// The whole persisted document. Saved and loaded as one unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppState {
    pub user_profile: UserProfile,
    #[serde(deserialize_with = "null_as_default")]
    pub daily_logs: Vec<DailyLog>,
    #[serde(deserialize_with = "null_as_default")]
    pub vocabulary: Vec<VocabItem>,
}
