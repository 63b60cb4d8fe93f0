use chrono::NaiveDate;

use crate::overlay::HIDDEN;

/// In-memory scheduling state. Lives only as long as the process and is
/// only touched through the controller's lock.
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    pub is_paused: bool,
    /// Scheduler ticks spent paused since the pause began or last warning.
    pub pause_counter: u32,
    pub current_category: String,
    pub current_time_str: String,
    pub scratchpad_visible: bool,
    pub last_hud_notes: String,
    last_reminder: Option<(NaiveDate, String)>,
}

impl RuntimeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A real pause transition restarts the watchdog; repeating the current
    /// value leaves it running.
    pub fn set_paused(&mut self, paused: bool) {
        if self.is_paused != paused {
            self.pause_counter = 0;
        }
        self.is_paused = paused;
    }

    /// Advance the pause watchdog by one tick. Returns true on the tick that
    /// reaches `threshold`, after which counting restarts from zero.
    pub fn advance_pause_watch(&mut self, threshold: u32) -> bool {
        if !self.is_paused {
            self.pause_counter = 0;
            return false;
        }
        self.pause_counter += 1;
        if self.pause_counter >= threshold.max(1) {
            self.pause_counter = 0;
            return true;
        }
        false
    }

    /// Claims a reminder slot for `day`. False if it was already claimed.
    pub fn claim_reminder_slot(&mut self, day: NaiveDate, slot: &str) -> bool {
        let already = self
            .last_reminder
            .as_ref()
            .is_some_and(|(claimed_day, claimed_slot)| *claimed_day == day && claimed_slot == slot);
        if already {
            return false;
        }
        self.last_reminder = Some((day, slot.to_string()));
        true
    }

    /// Remembers overlay notes and reports whether they differ from the last
    /// content seen.
    pub fn observe_hud_notes(&mut self, content: &str) -> bool {
        if self.last_hud_notes == content {
            return false;
        }
        self.last_hud_notes = content.to_string();
        true
    }

    /// What the overlay should display: `time|category|scratchpad` or
    /// [`HIDDEN`].
    pub fn mirror_line(&self) -> String {
        let time = self.current_time_str.trim();
        let hidden = self.is_paused
            || time.is_empty()
            || time.eq_ignore_ascii_case("HIDDEN")
            || time.eq_ignore_ascii_case("HIDE");
        if hidden {
            return HIDDEN.to_string();
        }
        let scratchpad = if self.scratchpad_visible { "1" } else { "0" };
        format!("{time}|{}|{scratchpad}", self.current_category)
    }

    pub fn window_title(&self) -> String {
        let time = self.current_time_str.trim();
        if time.is_empty() {
            "Engress".to_string()
        } else {
            format!("Engress [{time}]")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_warning_fires_once_per_threshold_and_restarts() {
        let mut state = RuntimeState::new();
        state.set_paused(true);

        let fired: Vec<u32> = (1..=85).filter(|_| state.advance_pause_watch(40)).collect();
        assert_eq!(fired.len(), 2);
        assert_eq!(state.pause_counter, 5);
    }

    #[test]
    fn pause_warning_fires_on_exactly_the_fortieth_tick() {
        let mut state = RuntimeState::new();
        state.set_paused(true);
        for _ in 0..39 {
            assert!(!state.advance_pause_watch(40));
        }
        assert_eq!(state.pause_counter, 39);
        assert!(state.advance_pause_watch(40));
        assert_eq!(state.pause_counter, 0);
    }

    #[test]
    fn repeated_pause_does_not_restart_the_watchdog() {
        let mut state = RuntimeState::new();
        state.set_paused(true);
        for _ in 0..39 {
            assert!(!state.advance_pause_watch(40));
        }
        state.set_paused(true);
        assert_eq!(state.pause_counter, 39);
        assert!(state.advance_pause_watch(40));
    }

    #[test]
    fn unpaused_ticks_hold_counter_at_zero() {
        let mut state = RuntimeState::new();
        state.is_paused = true;
        state.pause_counter = 12;
        state.is_paused = false;
        assert!(!state.advance_pause_watch(40));
        assert_eq!(state.pause_counter, 0);
    }

    #[test]
    fn toggling_pause_discards_progress() {
        let mut state = RuntimeState::new();
        state.set_paused(true);
        for _ in 0..30 {
            state.advance_pause_watch(40);
        }
        state.set_paused(false);
        state.set_paused(true);
        assert_eq!(state.pause_counter, 0);
        for _ in 0..39 {
            assert!(!state.advance_pause_watch(40));
        }
        assert!(state.advance_pause_watch(40));
    }

    #[test]
    fn reminder_slots_are_claimed_once_per_day() {
        let mut state = RuntimeState::new();
        let monday = NaiveDate::from_ymd_opt(2026, 4, 13).unwrap();
        let tuesday = monday.succ_opt().unwrap();

        assert!(state.claim_reminder_slot(monday, "10:00"));
        assert!(!state.claim_reminder_slot(monday, "10:00"));
        assert!(state.claim_reminder_slot(monday, "22:00"));
        assert!(state.claim_reminder_slot(tuesday, "22:00"));
    }

    #[test]
    fn mirror_line_formats_and_hides() {
        let mut state = RuntimeState::new();
        assert_eq!(state.mirror_line(), HIDDEN);

        state.current_time_str = "24:59".into();
        state.current_category = "Writing".into();
        assert_eq!(state.mirror_line(), "24:59|Writing|0");

        state.scratchpad_visible = true;
        assert_eq!(state.mirror_line(), "24:59|Writing|1");

        state.current_time_str = "hide".into();
        assert_eq!(state.mirror_line(), HIDDEN);

        state.current_time_str = "10:00".into();
        state.set_paused(true);
        assert_eq!(state.mirror_line(), HIDDEN);
    }

    #[test]
    fn notes_changes_are_reported_once() {
        let mut state = RuntimeState::new();
        assert!(state.observe_hud_notes("draft"));
        assert!(!state.observe_hud_notes("draft"));
        assert!(state.observe_hud_notes("draft v2"));
    }
}
