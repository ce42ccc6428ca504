//! Autoplay and learning for 2048
//!
//! Provides:
//! - Tabular Q-learning keyed on the full grid
//! - A scripted corner heuristic
//! - A headless environment for training
//! - Model persistence (MessagePack table + TOML stats)

pub mod agent;
pub mod config;
pub mod environment;
pub mod heuristic;
pub mod persistence;
pub mod q_table;

pub use agent::{autoplay_step, Agent, ModelStats, QLearningAgent, Transition};
pub use config::{QLearningConfig, RewardMode};
pub use environment::{Game2048Environment, StepResult};
pub use heuristic::HeuristicPolicy;
pub use persistence::{
    load_model, load_model_with_rng, read_model, read_stats, read_table, save_model,
};
pub use q_table::{ActionValues, QTable};
