pub mod commands;

use anyhow::{Context, Result};
use log::{error, warn};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::models::AppState;

/// Whole-document persistence for [`AppState`].
pub trait StateStore: Send + Sync {
    /// A missing document is not an error: it yields the default state.
    fn load(&self) -> Result<AppState>;

    fn save(&self, state: &AppState) -> Result<()>;
}

/// Background paths never stop on storage trouble: a failed read is
/// replaced by defaults.
pub fn load_or_default(store: &dyn StateStore) -> AppState {
    store.load().unwrap_or_else(|err| {
        warn!("Failed to load state, falling back to defaults: {err:#}");
        AppState::default()
    })
}

/// Background counterpart of [`StateStore::save`]: failures are logged and
/// dropped.
pub fn save_quietly(store: &dyn StateStore, state: &AppState) {
    if let Err(err) = store.save(state) {
        error!("Failed to save state: {err:#}");
    }
}

/// Pretty-printed JSON file, rewritten on every save.
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the document; the next load starts from defaults.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to delete state at {}", self.path.display())),
        }
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<AppState> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppState::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read state from {}", self.path.display()))
            }
        };
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse state at {}", self.path.display()))
    }

    fn save(&self, state: &AppState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create state directory {}", parent.display())
                })?;
            }
        }
        let serialized = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write state to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyLog;
    use tempfile::tempdir;

    #[test]
    fn missing_document_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("data.json"));
        let state = store.load().unwrap();
        assert_eq!(state, AppState::default());
        assert_eq!(state.user_profile.test_date, "2026-03-01");
    }

    #[test]
    fn save_then_load_keeps_log_order() {
        let dir = tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("nested").join("data.json"));
        let mut state = AppState::default();
        for id in ["b", "a", "c"] {
            state.daily_logs.push(DailyLog {
                id: id.into(),
                ..DailyLog::default()
            });
        }
        store.save(&state).unwrap();

        let ids: Vec<_> = store
            .load()
            .unwrap()
            .daily_logs
            .into_iter()
            .map(|log| log.id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn desktop_document_with_null_lists_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{
  "user_profile": {
    "name": "Ayu",
    "test_date": "2026-06-01",
    "target_score": 7.5,
    "last_open_date": "2026-04-14",
    "is_setup_complete": true,
    "reminder_times": ["10:00", "22:00"],
    "reminder_enabled": true,
    "tutorial_seen": true
  },
  "daily_logs": null,
  "vocabulary": null
}"#,
        )
        .unwrap();
        let store = JsonStateStore::new(&path);

        let state = store.load().unwrap();
        assert!(state.daily_logs.is_empty());
        assert!(state.vocabulary.is_empty());
        assert!(state.user_profile.is_setup_complete);

        let background = load_or_default(&store);
        assert!(background.user_profile.is_setup_complete);
        assert_eq!(background.user_profile.name, "Ayu");
    }

    #[test]
    fn corrupt_document_errors_but_background_load_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonStateStore::new(&path);

        assert!(store.load().is_err());
        assert_eq!(load_or_default(&store), AppState::default());
    }

    #[test]
    fn reset_removes_document_and_tolerates_absence() {
        let dir = tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("data.json"));
        store.save(&AppState::default()).unwrap();
        assert!(store.path().exists());

        store.reset().unwrap();
        assert!(!store.path().exists());
        store.reset().unwrap();
    }
}
