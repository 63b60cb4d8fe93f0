//! Document operations behind the `engress` subcommands. Each one loads the
//! document, changes it and writes it back whole.

use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::analysis::{generate_briefing, AnalysisConfig, Assessment, Phase};
use crate::models::{AppState, DailyLog, VocabItem, DATE_FORMAT, TIME_FORMAT};
use crate::store::StateStore;

/// Payload of a finished session.
#[derive(Debug, Clone, Default)]
pub struct NewSession {
    pub module: String,
    pub duration: u32,
    pub score: f64,
    pub reflection: String,
    pub homework: String,
    pub learnings: String,
    pub content: String,
    pub source_url: String,
    pub screenshot: String,
}

/// Fields that may still change after a session was logged.
#[derive(Debug, Clone, Default)]
pub struct Amendment {
    pub reflection: String,
    pub score: f64,
    pub homework: String,
    pub learnings: String,
}

pub fn log_session(store: &dyn StateStore, session: NewSession, now: NaiveDateTime) -> Result<DailyLog> {
    let mut state = store.load()?;
    let log = DailyLog {
        id: Uuid::new_v4().to_string(),
        date: now.format(DATE_FORMAT).to_string(),
        module: session.module,
        duration: session.duration,
        score: session.score,
        reflection: session.reflection,
        homework: session.homework,
        learnings: session.learnings,
        content: session.content,
        source_url: session.source_url,
        screenshot: session.screenshot,
        time: now.format(TIME_FORMAT).to_string(),
    };
    state.daily_logs.push(log.clone());
    store.save(&state)?;
    Ok(log)
}

/// Only the most recent log can be amended. Returns false when there is none.
pub fn amend_last_session(store: &dyn StateStore, amendment: Amendment) -> Result<bool> {
    let mut state = store.load()?;
    let Some(last) = state.daily_logs.last_mut() else {
        return Ok(false);
    };
    last.reflection = amendment.reflection;
    last.score = amendment.score;
    last.homework = amendment.homework;
    last.learnings = amendment.learnings;
    store.save(&state)?;
    Ok(true)
}

/// Removes the first log with `id`; the rest keep their order.
pub fn delete_log(store: &dyn StateStore, id: &str) -> Result<bool> {
    let mut state = store.load()?;
    let Some(index) = state.daily_logs.iter().position(|log| log.id == id) else {
        return Ok(false);
    };
    state.daily_logs.remove(index);
    store.save(&state)?;
    Ok(true)
}

pub fn add_vocabulary(
    store: &dyn StateStore,
    word: &str,
    def: &str,
    sentences: &str,
    now: NaiveDateTime,
) -> Result<VocabItem> {
    let mut state = store.load()?;
    let item = VocabItem {
        id: Uuid::new_v4().to_string(),
        word: word.to_string(),
        def: def.to_string(),
        sentences: sentences.to_string(),
        date_added: now.format(DATE_FORMAT).to_string(),
        time: now.format(TIME_FORMAT).to_string(),
    };
    state.vocabulary.push(item.clone());
    store.save(&state)?;
    Ok(item)
}

pub fn delete_vocabulary(store: &dyn StateStore, id: &str) -> Result<bool> {
    let mut state = store.load()?;
    let Some(index) = state.vocabulary.iter().position(|item| item.id == id) else {
        return Ok(false);
    };
    state.vocabulary.remove(index);
    store.save(&state)?;
    Ok(true)
}

pub fn update_profile_name(store: &dyn StateStore, name: &str) -> Result<()> {
    update(store, |state| state.user_profile.name = name.to_string())
}

pub fn update_test_date(store: &dyn StateStore, date: &str) -> Result<()> {
    let date = validate_date(date)?;
    update(store, |state| state.user_profile.test_date = date)
}

/// Reminder slots are matched as exact `HH:MM` strings, so every entry is
/// normalized before it is stored ("9:05" becomes "09:05").
pub fn update_reminders(store: &dyn StateStore, enabled: bool, times: &[String]) -> Result<()> {
    let times = times
        .iter()
        .map(|time| normalize_reminder_time(time))
        .collect::<Result<Vec<_>>>()?;
    update(store, |state| {
        state.user_profile.reminder_enabled = enabled;
        state.user_profile.reminder_times = times;
    })
}

pub fn complete_setup(store: &dyn StateStore, name: &str, test_date: &str) -> Result<()> {
    let test_date = validate_date(test_date)?;
    update(store, |state| {
        state.user_profile.name = name.to_string();
        state.user_profile.test_date = test_date;
        state.user_profile.is_setup_complete = true;
    })
}

pub fn complete_tutorial(store: &dyn StateStore) -> Result<()> {
    update(store, |state| state.user_profile.tutorial_seen = true)
}

pub fn consistency_phase(store: &dyn StateStore, today: NaiveDate, config: &AnalysisConfig) -> Result<Phase> {
    let state = store.load()?;
    Ok(Assessment::of(&state.daily_logs, today, config).phase)
}

pub fn briefing(store: &dyn StateStore, today: NaiveDate, config: &AnalysisConfig) -> Result<String> {
    let state = store.load()?;
    Ok(generate_briefing(&state, today, config))
}

/// Writes the full document, pretty printed, to `path`.
pub fn export_state(store: &dyn StateStore, path: &Path) -> Result<()> {
    let state = store.load()?;
    let data = serde_json::to_string_pretty(&state).context("Could not format data for export")?;
    fs::write(path, data).with_context(|| format!("Could not save export to {}", path.display()))
}

pub fn normalize_reminder_time(raw: &str) -> Result<String> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .map(|time| time.format(TIME_FORMAT).to_string())
        .map_err(|_| anyhow!("invalid reminder time '{raw}' (expected HH:MM)"))
}

fn validate_date(raw: &str) -> Result<String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .map_err(|_| anyhow!("invalid date '{raw}' (expected YYYY-MM-DD)"))
}

fn update(store: &dyn StateStore, change: impl FnOnce(&mut AppState)) -> Result<()> {
    let mut state = store.load()?;
    change(&mut state);
    store.save(&state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonStateStore;
    use tempfile::{tempdir, TempDir};

    fn store() -> (TempDir, JsonStateStore) {
        let dir = tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("data.json"));
        (dir, store)
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    fn session(module: &str, duration: u32) -> NewSession {
        NewSession {
            module: module.into(),
            duration,
            ..NewSession::default()
        }
    }

    #[test]
    fn logged_sessions_are_stamped_and_appended() {
        let (_dir, store) = store();
        let first = log_session(&store, session("Reading", 45), at("2026-04-15", "09:30")).unwrap();
        let second = log_session(&store, session("Writing", 20), at("2026-04-15", "18:05")).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.date, "2026-04-15");
        assert_eq!(second.time, "18:05");

        let logs = store.load().unwrap().daily_logs;
        assert_eq!(logs, vec![first, second]);
    }

    #[test]
    fn amend_touches_only_the_last_log() {
        let (_dir, store) = store();
        assert!(!amend_last_session(&store, Amendment::default()).unwrap());

        log_session(&store, session("Reading", 45), at("2026-04-15", "09:30")).unwrap();
        log_session(&store, session("Writing", 20), at("2026-04-15", "10:30")).unwrap();
        let amended = amend_last_session(
            &store,
            Amendment {
                reflection: "lost focus after 10 minutes".into(),
                score: 6.5,
                homework: "task 2 outline".into(),
                learnings: "linking words".into(),
            },
        )
        .unwrap();
        assert!(amended);

        let logs = store.load().unwrap().daily_logs;
        assert!(logs[0].reflection.is_empty());
        assert_eq!(logs[1].score, 6.5);
        assert_eq!(logs[1].homework, "task 2 outline");
    }

    #[test]
    fn delete_removes_first_match_and_keeps_order() {
        let (_dir, store) = store();
        let mut state = AppState::default();
        for (id, module) in [("a", "Reading"), ("dup", "Writing"), ("b", "Speaking"), ("dup", "Listening")] {
            state.daily_logs.push(DailyLog {
                id: id.into(),
                module: module.into(),
                ..DailyLog::default()
            });
        }
        store.save(&state).unwrap();

        assert!(delete_log(&store, "dup").unwrap());
        assert!(!delete_log(&store, "missing").unwrap());

        let modules: Vec<_> = store
            .load()
            .unwrap()
            .daily_logs
            .into_iter()
            .map(|log| log.module)
            .collect();
        assert_eq!(modules, vec!["Reading", "Speaking", "Listening"]);
    }

    #[test]
    fn vocabulary_add_and_delete() {
        let (_dir, store) = store();
        let item = add_vocabulary(
            &store,
            "ubiquitous",
            "present everywhere",
            "Phones are ubiquitous.\nSo is coffee.",
            at("2026-04-15", "07:00"),
        )
        .unwrap();
        assert_eq!(item.date_added, "2026-04-15");
        assert_eq!(store.load().unwrap().vocabulary.len(), 1);

        assert!(delete_vocabulary(&store, &item.id).unwrap());
        assert!(!delete_vocabulary(&store, &item.id).unwrap());
        assert!(store.load().unwrap().vocabulary.is_empty());
    }

    #[test]
    fn reminders_are_normalized_and_validated() {
        let (_dir, store) = store();
        update_reminders(&store, true, &["9:05".into(), "21:30".into()]).unwrap();
        assert_eq!(store.load().unwrap().user_profile.reminder_times, vec!["09:05", "21:30"]);

        assert!(update_reminders(&store, true, &["25:00".into()]).is_err());
        assert!(update_reminders(&store, false, &["noon".into()]).is_err());
        // A rejected update leaves the document alone.
        assert!(store.load().unwrap().user_profile.reminder_enabled);
    }

    #[test]
    fn setup_and_profile_updates_persist() {
        let (_dir, store) = store();
        complete_setup(&store, "Ayu", "2026-06-01").unwrap();
        update_profile_name(&store, "Ayu R.").unwrap();
        complete_tutorial(&store).unwrap();
        assert!(update_test_date(&store, "June").is_err());

        let profile = store.load().unwrap().user_profile;
        assert!(profile.is_setup_complete);
        assert!(profile.tutorial_seen);
        assert_eq!(profile.name, "Ayu R.");
        assert_eq!(profile.test_date, "2026-06-01");
    }

    #[test]
    fn phase_and_briefing_read_the_stored_history() {
        let (_dir, store) = store();
        let today = NaiveDate::from_ymd_opt(2026, 4, 15).unwrap();
        let config = AnalysisConfig::default();
        assert_eq!(consistency_phase(&store, today, &config).unwrap(), Phase::Neglect);

        log_session(&store, session("Reading", 45), at("2026-04-15", "09:30")).unwrap();
        update_profile_name(&store, "Ayu").unwrap();
        assert_eq!(consistency_phase(&store, today, &config).unwrap(), Phase::Stable);
        assert!(briefing(&store, today, &config).unwrap().starts_with("Ayu, keep the standard."));
    }

    #[test]
    fn export_writes_the_whole_document() {
        let (dir, store) = store();
        log_session(&store, session("Speaking", 15), at("2026-04-15", "09:30")).unwrap();
        let target = dir.path().join("engress-progress-report.json");

        export_state(&store, &target).unwrap();

        let exported: AppState = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(exported, store.load().unwrap());
    }
}
