//! Session and training statistics

pub mod game_metrics;
pub mod training_stats;

pub use game_metrics::GameMetrics;
pub use training_stats::TrainingStats;
