use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{AppState, DailyLog, TIME_FORMAT};

/// The reminder slot matching `now` to the minute, if reminders are live.
pub fn due_reminder_slot(state: &AppState, now: NaiveDateTime) -> Option<String> {
    let profile = &state.user_profile;
    if !profile.is_setup_complete || !profile.reminder_enabled {
        return None;
    }
    let current = now.format(TIME_FORMAT).to_string();
    profile
        .reminder_times
        .iter()
        .find(|slot| **slot == current)
        .cloned()
}

/// Total minutes logged on `day`.
pub fn minutes_logged_on(logs: &[DailyLog], day: NaiveDate) -> u32 {
    logs.iter()
        .filter(|log| log.is_on(day))
        .fold(0u32, |total, log| total.saturating_add(log.duration))
}
