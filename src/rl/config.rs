//! Q-learning hyperparameters

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which signal is fed to the update rule as the reward `r`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    /// The game's total score after the move
    #[default]
    CumulativeScore,
    /// Only the points earned by the move itself
    MoveScore,
}

/// Tabular Q-learning configuration
///
/// Defaults follow the classic autoplay setup: fast initial exploration
/// decaying toward a small floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Step size α
    pub learning_rate: f64,

    /// Discount γ applied to the best next-state value
    pub discount_factor: f64,

    /// Initial ε for ε-greedy selection
    pub exploration_rate: f64,

    /// Multiplier applied to ε after each applied move
    pub exploration_decay: f64,

    /// Floor for ε
    pub min_exploration_rate: f64,

    pub reward: RewardMode,
}

impl QLearningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every hyperparameter is in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }

        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(ConfigError::Validation(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }

        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(ConfigError::Validation(format!(
                "exploration_rate must be in [0, 1], got {}",
                self.exploration_rate
            )));
        }

        if !(self.exploration_decay > 0.0 && self.exploration_decay <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "exploration_decay must be in (0, 1], got {}",
                self.exploration_decay
            )));
        }

        if !(0.0..=1.0).contains(&self.min_exploration_rate) {
            return Err(ConfigError::Validation(format!(
                "min_exploration_rate must be in [0, 1], got {}",
                self.min_exploration_rate
            )));
        }

        if self.min_exploration_rate > self.exploration_rate {
            return Err(ConfigError::Validation(format!(
                "min_exploration_rate ({}) cannot exceed exploration_rate ({})",
                self.min_exploration_rate, self.exploration_rate
            )));
        }

        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            exploration_rate: 1.0,
            exploration_decay: 0.995,
            min_exploration_rate: 0.01,
            reward: RewardMode::CumulativeScore,
        }
    }
}
