use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context, Error, Result};

use crate::analysis::AnalysisConfig;

/// How often a reminder slot may fire within its minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderPolicy {
    /// One alert per (date, slot). Default.
    OncePerMinute,
    /// Every matching tick alerts, so a 30s cadence alerts twice per slot.
    EveryTick,
}

impl FromStr for ReminderPolicy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "once-per-minute" | "once" => Ok(ReminderPolicy::OncePerMinute),
            "every-tick" | "every" => Ok(ReminderPolicy::EveryTick),
            other => Err(anyhow!("unknown reminder policy '{other}'")),
        }
    }
}

/// Files shared with the overlay helper.
#[derive(Debug, Clone)]
pub struct OverlayPaths {
    /// Mirrored timer line, written by us.
    pub timer: PathBuf,
    /// One-shot commands, written by the helper and consumed by us.
    pub command: PathBuf,
    /// Scratchpad notes, written by us.
    pub notes_out: PathBuf,
    /// Scratchpad notes edited in the helper.
    pub notes_in: PathBuf,
}

impl OverlayPaths {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            timer: dir.join("sentinel_timer.txt"),
            command: dir.join("engress_cmd.txt"),
            notes_out: dir.join("engress_notes.txt"),
            notes_in: dir.join("engress_notes_hud.txt"),
        }
    }
}

impl Default for OverlayPaths {
    fn default() -> Self {
        Self::in_dir("/tmp")
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Location of the JSON state document.
    pub data_path: PathBuf,

    /// Scheduler cadence.
    pub tick_interval: Duration,

    /// Consecutive paused ticks before the discipline warning.
    pub pause_warning_ticks: u32,

    /// Minutes of practice per day below which reminders fire.
    pub daily_target_minutes: u32,

    pub reminder_policy: ReminderPolicy,

    pub command_poll_interval: Duration,
    pub notes_poll_interval: Duration,
    pub url_poll_interval: Duration,

    pub overlay: OverlayPaths,

    /// Overlay helper executable; launched only if it exists.
    pub hud_binary: PathBuf,

    pub analysis: AnalysisConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            tick_interval: Duration::from_secs(30),
            // 40 ticks of 30s: twenty minutes.
            pause_warning_ticks: 40,
            daily_target_minutes: 120,
            reminder_policy: ReminderPolicy::OncePerMinute,
            command_poll_interval: Duration::from_millis(500),
            notes_poll_interval: Duration::from_millis(500),
            url_poll_interval: Duration::from_secs(10),
            overlay: OverlayPaths::default(),
            hud_binary: PathBuf::from("./engress_hud"),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults, overridden by `ENGRESS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = env_var("ENGRESS_DATA_DIR") {
            config.data_path = PathBuf::from(dir).join("data.json");
        }
        if let Some(dir) = env_var("ENGRESS_RUNTIME_DIR") {
            config.overlay = OverlayPaths::in_dir(dir);
        }
        if let Some(binary) = env_var("ENGRESS_HUD_BINARY") {
            config.hud_binary = PathBuf::from(binary);
        }
        if let Some(secs) = env_var("ENGRESS_TICK_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("ENGRESS_TICK_SECS must be whole seconds, got '{secs}'"))?;
            if secs == 0 {
                return Err(anyhow!("ENGRESS_TICK_SECS must be greater than zero"));
            }
            config.tick_interval = Duration::from_secs(secs);
        }
        if let Some(policy) = env_var("ENGRESS_REMINDER_POLICY") {
            config.reminder_policy = policy.parse()?;
        }

        Ok(config)
    }
}

/// `ENGRESS_DEBUG=1` or `true` turns on debug logging.
pub fn debug_mode() -> bool {
    env::var("ENGRESS_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Engress")
        .join("data.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_cadence() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(30));
        assert_eq!(config.pause_warning_ticks, 40);
        assert_eq!(config.daily_target_minutes, 120);
        assert_eq!(config.reminder_policy, ReminderPolicy::OncePerMinute);
        assert_eq!(config.overlay.timer, PathBuf::from("/tmp/sentinel_timer.txt"));
        assert!(config.data_path.ends_with("Engress/data.json"));
    }

    #[test]
    fn parses_reminder_policies() {
        assert_eq!("every-tick".parse::<ReminderPolicy>().unwrap(), ReminderPolicy::EveryTick);
        assert_eq!(" ONCE ".parse::<ReminderPolicy>().unwrap(), ReminderPolicy::OncePerMinute);
        assert!("hourly".parse::<ReminderPolicy>().is_err());
    }
}
