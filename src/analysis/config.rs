/// Thresholds for consistency analysis.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// "Avoiding" only applies once the history has more logs than this.
    pub avoidance_min_logs: usize,

    /// Drift compares the last pair of sessions against the pair before it.
    pub drift_min_logs: usize,

    /// Comfort zone needs at least this many logs to say anything.
    pub comfort_min_logs: usize,

    /// Share of all logs a single module may hold before it counts as hiding.
    pub comfort_max_share: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            avoidance_min_logs: 3,
            drift_min_logs: 4,
            comfort_min_logs: 5,
            comfort_max_share: 0.6,
        }
    }
}
