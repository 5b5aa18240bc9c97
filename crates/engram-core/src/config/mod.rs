pub mod consolidation_config;
pub mod defaults;
pub mod scoring_config;

pub use consolidation_config::ConsolidationConfig;
pub use scoring_config::ScoringConfig;
