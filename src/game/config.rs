use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the game
///
/// Built once at startup and handed to every component that needs rules or
/// timing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tile value that wins the game
    pub win_tile: u32,
    /// Probability that a spawned tile is a 4 instead of a 2
    pub spawn_four_probability: f64,

    // Animation timing (seconds)
    /// Duration of the tile slide after a move
    pub move_animation_secs: f32,
    /// Duration of each half (grow, shrink) of the merge pulse
    pub merge_animation_secs: f32,
    /// Duration of the spawn highlight on a new tile
    pub spawn_animation_secs: f32,
    /// Peak scale reached by merged tiles during the pulse
    pub merge_pulse_scale: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_tile: 2048,
            spawn_four_probability: 0.1,
            move_animation_secs: 0.15,
            merge_animation_secs: 0.1,
            spawn_animation_secs: 0.2,
            merge_pulse_scale: 1.3,
        }
    }
}

impl GameConfig {
    /// Configuration with a custom winning tile
    pub fn with_win_tile(win_tile: u32) -> Self {
        Self {
            win_tile,
            ..Default::default()
        }
    }

    /// Configuration with all animations disabled
    pub fn instant() -> Self {
        Self {
            move_animation_secs: 0.0,
            merge_animation_secs: 0.0,
            spawn_animation_secs: 0.0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_tile < 4 || !self.win_tile.is_power_of_two() {
            return Err(ConfigError::Validation(format!(
                "win_tile must be a power of two >= 4, got {}",
                self.win_tile
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_four_probability) {
            return Err(ConfigError::Validation(format!(
                "spawn_four_probability must be in [0, 1], got {}",
                self.spawn_four_probability
            )));
        }
        let durations = [
            ("move_animation_secs", self.move_animation_secs),
            ("merge_animation_secs", self.merge_animation_secs),
            ("spawn_animation_secs", self.spawn_animation_secs),
        ];
        for (name, secs) in durations {
            if !secs.is_finite() || secs < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a finite non-negative duration, got {secs}"
                )));
            }
        }
        if self.merge_pulse_scale.is_nan() || self.merge_pulse_scale < 1.0 {
            return Err(ConfigError::Validation(format!(
                "merge_pulse_scale must be >= 1, got {}",
                self.merge_pulse_scale
            )));
        }
        Ok(())
    }
}
