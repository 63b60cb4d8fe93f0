use chrono::NaiveDate;

use crate::analysis::{
    config::AnalysisConfig,
    consistency::{analyze_consistency, check_comfort_zone, detect_drift, find_weakest_module, Phase},
};
use crate::models::{AppState, DailyLog, Module};

/// Everything the briefing needs to know about the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub phase: Phase,
    pub weakest: Module,
    pub drifting: bool,
    pub comfort_zone: bool,
}

impl Assessment {
    pub fn of(logs: &[DailyLog], today: NaiveDate, config: &AnalysisConfig) -> Self {
        Self {
            phase: analyze_consistency(logs, today, config),
            weakest: find_weakest_module(logs),
            drifting: detect_drift(logs, config),
            comfort_zone: check_comfort_zone(logs, config),
        }
    }
}

/// Fixed message per phase. No variation: the same assessment and name always
/// produce the same text.
pub fn compose_briefing(assessment: &Assessment, name: &str) -> String {
    let weakest = assessment.weakest;
    match assessment.phase {
        Phase::Neglect => format!(
            "{name}, this is not preparation. This is self-sabotage. Your discipline broke. Don't pretend it didn't."
        ),
        Phase::Avoiding => format!(
            "{name}, you're practicing what's easy. Not what you need. Stop avoiding {weakest}."
        ),
        Phase::Slipping if assessment.drifting => format!(
            "{name}, you're drifting. Your sessions are getting shorter and your focus is fading. This is how discipline dies."
        ),
        Phase::Slipping => format!("{name}, your standards are dropping. Reset your standard now."),
        Phase::Stable if assessment.comfort_zone => format!(
            "{name}, stable execution, but you're hiding in your comfort zone. Confront {weakest} today."
        ),
        Phase::Stable => format!(
            "{name}, keep the standard. Your discipline is being tested every day. Don't let it break."
        ),
    }
}

pub fn generate_briefing(state: &AppState, today: NaiveDate, config: &AnalysisConfig) -> String {
    let assessment = Assessment::of(&state.daily_logs, today, config);
    compose_briefing(&assessment, state.user_profile.display_name())
}
