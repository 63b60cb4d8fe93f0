use std::{collections::HashMap, fmt};

use chrono::NaiveDate;

use crate::analysis::config::AnalysisConfig;
use crate::models::{DailyLog, Module};

/// Behavioral phase of the recent history, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Neglect,
    Avoiding,
    Slipping,
    Stable,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Neglect => "Neglect",
            Phase::Avoiding => "Avoiding",
            Phase::Slipping => "Slipping",
            Phase::Stable => "Stable",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the history relative to `today`. First matching rule wins:
/// nothing today or yesterday is Neglect, a never-practiced module (once the
/// history is long enough) is Avoiding, nothing today is Slipping.
pub fn analyze_consistency(logs: &[DailyLog], today: NaiveDate, config: &AnalysisConfig) -> Phase {
    if logs.is_empty() {
        return Phase::Neglect;
    }

    let yesterday = today.pred_opt();
    let has_today = logs.iter().any(|log| log.is_on(today));
    let has_yesterday = yesterday.is_some_and(|day| logs.iter().any(|log| log.is_on(day)));

    if !has_today && !has_yesterday {
        return Phase::Neglect;
    }

    let counts = module_counts(logs);
    let skips_a_module = Module::PRIORITY
        .iter()
        .any(|module| counts.get(module).copied().unwrap_or(0) == 0);
    if logs.len() > config.avoidance_min_logs && skips_a_module {
        return Phase::Avoiding;
    }

    if !has_today {
        return Phase::Slipping;
    }

    Phase::Stable
}

/// Module with the fewest logs. Ties go to the earlier module in
/// [`Module::PRIORITY`].
pub fn find_weakest_module(logs: &[DailyLog]) -> Module {
    let counts = module_counts(logs);
    let mut weakest = Module::PRIORITY[0];
    let mut fewest = usize::MAX;
    for module in Module::PRIORITY {
        let count = counts.get(&module).copied().unwrap_or(0);
        if count < fewest {
            fewest = count;
            weakest = module;
        }
    }
    weakest
}

/// True when the last two appended sessions average strictly less time than
/// the two appended before them.
///
/// Defined over insertion order, not `date`: a log amended or imported out of
/// sequence shifts which sessions are compared.
pub fn detect_drift(logs: &[DailyLog], config: &AnalysisConfig) -> bool {
    if logs.len() < config.drift_min_logs.max(4) {
        return false;
    }
    let n = logs.len();
    // Equal pair sizes, so comparing sums compares means without truncation.
    let recent = u64::from(logs[n - 1].duration) + u64::from(logs[n - 2].duration);
    let prior = u64::from(logs[n - 3].duration) + u64::from(logs[n - 4].duration);
    recent < prior
}

/// True when one module takes more than the configured share of all logs.
pub fn check_comfort_zone(logs: &[DailyLog], config: &AnalysisConfig) -> bool {
    if logs.is_empty() || logs.len() < config.comfort_min_logs {
        return false;
    }
    let total = logs.len() as f64;
    module_counts(logs)
        .values()
        .any(|&count| count as f64 / total > config.comfort_max_share)
}

fn module_counts(logs: &[DailyLog]) -> HashMap<Module, usize> {
    let mut counts = HashMap::new();
    for module in logs.iter().filter_map(DailyLog::module) {
        *counts.entry(module).or_insert(0) += 1;
    }
    counts
}
