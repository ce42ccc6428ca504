//! Headless Q-learning training
//!
//! Plays full games with the learning agent, prints rolling statistics and
//! saves the model after every finished game.
//!
//! # Example
//!
//! ```rust,no_run
//! use ml_2048::config::AppConfig;
//! use ml_2048::modes::TrainMode;
//!
//! let config = AppConfig::default();
//! let mut train_mode = TrainMode::new(&config, None);
//! train_mode.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::game::{GameConfig, HighScoreStore};
use crate::metrics::TrainingStats;
use crate::rl::{load_model_with_rng, save_model, Agent, Game2048Environment, QLearningAgent};

/// Training schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Number of games to play
    pub episodes: usize,

    /// Cap on attempted moves per game, rejected moves included
    pub max_steps_per_episode: usize,

    /// Print progress every N games
    pub log_frequency: usize,

    /// Rolling window for averages
    pub stats_window: usize,
}

impl TrainConfig {
    pub fn new(episodes: usize) -> Self {
        Self {
            episodes,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps_per_episode == 0 {
            return Err(ConfigError::Validation(
                "max_steps_per_episode must be at least 1".to_string(),
            ));
        }
        if self.log_frequency == 0 {
            return Err(ConfigError::Validation(
                "log_frequency must be at least 1".to_string(),
            ));
        }
        if self.stats_window == 0 {
            return Err(ConfigError::Validation(
                "stats_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            max_steps_per_episode: 20_000,
            log_frequency: 100,
            stats_window: 100,
        }
    }
}

/// Result of one training game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub score: u32,
    pub best_tile: u32,
    pub moves: u32,
    /// False when the step cap ended the game early
    pub finished: bool,
}

pub struct TrainMode {
    agent: QLearningAgent,
    env: Game2048Environment,
    stats: TrainingStats,
    config: TrainConfig,
    game_config: GameConfig,
    data_dir: PathBuf,
    capped_episodes: usize,
}

impl TrainMode {
    /// Resume the model stored in the configured data directory. `seed`
    /// makes both the agent and tile spawns deterministic.
    pub fn new(app: &AppConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let agent = load_model_with_rng(app.q_learning.clone(), &app.data_dir, rng);

        // Training games never touch the player's high score file
        let high_scores = HighScoreStore::in_memory();
        let env = match seed {
            Some(seed) => Game2048Environment::with_seed(
                app.game.clone(),
                high_scores,
                seed.wrapping_add(1),
            ),
            None => Game2048Environment::new(app.game.clone(), high_scores),
        };

        Self {
            agent,
            env,
            stats: TrainingStats::new(app.train.stats_window),
            config: app.train.clone(),
            game_config: app.game.clone(),
            data_dir: app.data_dir.clone(),
            capped_episodes: 0,
        }
    }

    /// Run the full training schedule
    ///
    /// Plays `episodes` games with the learning agent. Every completed game
    /// is recorded in the rolling statistics and the model stats, then the
    /// model is saved. A game cut off by `max_steps_per_episode` keeps the
    /// Q-values it learned but is otherwise only counted as capped.
    ///
    /// Save failures are reported on stderr and training continues.
    ///
    /// # Returns
    ///
    /// `Ok(())` when all episodes have been played
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        for episode in 0..self.config.episodes {
            let summary = self.run_episode();
            if summary.finished {
                self.stats
                    .record_episode(summary.score, summary.best_tile, summary.moves as usize);
                self.agent.end_game(summary.score, summary.best_tile);
                self.save();
            } else {
                self.capped_episodes += 1;
            }

            if (episode + 1) % self.config.log_frequency == 0 {
                self.print_progress(episode + 1);
            }
        }

        println!("\nTraining complete!");
        println!("Model saved to: {:?}", self.data_dir);
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());
        if self.capped_episodes > 0 {
            println!(
                "Capped games (hit {} steps, not saved): {}",
                self.config.max_steps_per_episode, self.capped_episodes
            );
        }
        println!(
            "Model version: {} | Games played: {} | States: {}",
            self.agent.stats().version,
            self.agent.stats().games_played,
            self.agent.table().len()
        );

        Ok(())
    }

    /// Play one game to the end or to the step cap
    pub fn run_episode(&mut self) -> EpisodeSummary {
        self.env.reset();
        let mut steps = 0;
        while !self.env.is_done() && steps < self.config.max_steps_per_episode {
            self.env.step_agent(&mut self.agent);
            steps += 1;
        }

        let state = self.env.state();
        EpisodeSummary {
            score: state.score,
            best_tile: state.best_tile,
            moves: state.moves,
            finished: self.env.is_done(),
        }
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Games that hit the step cap before ending
    pub fn capped_episodes(&self) -> usize {
        self.capped_episodes
    }

    /// Save failures are reported and training goes on
    fn save(&mut self) {
        if let Err(e) = save_model(&mut self.agent, &self.data_dir) {
            eprintln!("Warning: failed to save model to {:?}: {}", self.data_dir, e);
        }
    }

    fn print_header(&self) {
        let q = self.agent.config();
        println!("{}", "=".repeat(70));
        println!("Q-Learning Training - 2048");
        println!("{}", "=".repeat(70));
        println!("Episodes: {}", self.config.episodes);
        println!("Winning tile: {}", self.game_config.win_tile);
        println!("Q-Learning Config:");
        println!("  Learning rate: {}", q.learning_rate);
        println!("  Discount factor: {}", q.discount_factor);
        println!(
            "  Exploration: {} (decay {}, min {})",
            q.exploration_rate, q.exploration_decay, q.min_exploration_rate
        );
        println!("  Reward: {:?}", q.reward);
        println!(
            "Resuming model version {} ({} states, {} games played)",
            self.agent.stats().version,
            self.agent.table().len(),
            self.agent.stats().games_played
        );
        println!("Logging: Every {} episodes", self.config.log_frequency);
        println!("Data dir: {:?}", self.data_dir);
        println!("{}", "=".repeat(70));
        println!();
    }

    fn print_progress(&self, episode: usize) {
        println!(
            "[Episode {}/{}] {} | 2048 rate: {:.1}% | Epsilon: {:.3} | States: {}",
            episode,
            self.config.episodes,
            self.stats.format_summary(),
            self.stats.reach_rate(self.game_config.win_tile) * 100.0,
            self.agent.exploration_rate(),
            self.agent.table().len()
        );
    }
}
