pub mod briefing;
pub mod config;
pub mod consistency;

pub use briefing::{compose_briefing, generate_briefing, Assessment};
pub use config::AnalysisConfig;
pub use consistency::{
    analyze_consistency, check_comfort_zone, detect_drift, find_weakest_module, Phase,
};
