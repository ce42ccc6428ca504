//! Autoplay agents
//!
//! Provides:
//! - The [`Agent`] trait shared by learning and scripted players
//! - [`QLearningAgent`], a tabular ε-greedy learner
//! - [`autoplay_step`], one observe-act-learn cycle against a live game

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{
    config::{QLearningConfig, RewardMode},
    q_table::QTable,
};
use crate::game::{Direction, GameState, Grid};

/// One applied move, as seen by a learner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: Grid,
    pub action: Direction,
    /// Points earned by this move alone
    pub move_score: u32,
    /// Total game score after the move
    pub score: u32,
    /// Grid after the move, before the follow-up spawn
    pub next_state: Grid,
}

/// Something that can pick moves for a game
pub trait Agent {
    /// Pick a direction for `grid`. The direction may turn out to be a no-op.
    fn choose_action(&mut self, grid: &Grid) -> Direction;

    /// Learn from a move that changed the grid
    fn observe(&mut self, _transition: &Transition) {}

    /// Called once per finished game
    fn end_game(&mut self, _score: u32, _best_tile: u32) {}

    fn name(&self) -> &'static str;
}

/// Summary statistics persisted with the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelStats {
    /// Incremented on every save
    pub version: u32,
    pub best_score: u32,
    pub best_tile: u32,
    pub games_played: u32,
}

impl Default for ModelStats {
    fn default() -> Self {
        Self {
            version: 1,
            best_score: 0,
            best_tile: 0,
            games_played: 0,
        }
    }
}

/// Tabular Q-learning agent keyed on the full grid
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    table: QTable,
    config: QLearningConfig,
    exploration_rate: f64,
    stats: ModelStats,
    rng: StdRng,
}

impl QLearningAgent {
    /// Fresh agent with an empty table
    pub fn new(config: QLearningConfig) -> Self {
        Self::from_parts(config, QTable::new(), ModelStats::default(), StdRng::from_entropy())
    }

    pub fn with_seed(config: QLearningConfig, seed: u64) -> Self {
        Self::from_parts(
            config,
            QTable::new(),
            ModelStats::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Agent resuming from a loaded table. Exploration restarts from the
    /// configured initial rate.
    pub fn from_parts(config: QLearningConfig, table: QTable, stats: ModelStats, rng: StdRng) -> Self {
        Self {
            table,
            exploration_rate: config.exploration_rate,
            config,
            stats,
            rng,
        }
    }

    /// ε-greedy selection. Unseen states fall back to a random direction.
    pub fn select_action(&mut self, grid: &Grid) -> Direction {
        if self.rng.gen::<f64>() < self.exploration_rate {
            return self.random_direction();
        }
        match self.table.best_action(grid) {
            Some(direction) => direction,
            None => self.random_direction(),
        }
    }

    /// Reward for a transition under the configured [`RewardMode`]
    pub fn reward_for(&self, transition: &Transition) -> f64 {
        match self.config.reward {
            RewardMode::CumulativeScore => f64::from(transition.score),
            RewardMode::MoveScore => f64::from(transition.move_score),
        }
    }

    /// Learn from one applied move
    ///
    /// Performs the one-step update
    /// `Q[s,a] <- Q[s,a] + alpha * (r + gamma * max_a' Q[s',a'] - Q[s,a])`
    /// with the configured learning rate and discount factor, then decays
    /// the exploration rate toward its floor.
    ///
    /// # Arguments
    ///
    /// * `state` - Grid the move was chosen on
    /// * `action` - Direction that was applied
    /// * `reward` - Reward for the move, see [`QLearningAgent::reward_for`]
    /// * `next_state` - Committed grid after the move, before the spawn
    ///
    /// # Returns
    ///
    /// The updated `Q[state, action]`
    pub fn learn(&mut self, state: &Grid, action: Direction, reward: f64, next_state: &Grid) -> f64 {
        let value = self.table.update(
            state,
            action,
            reward,
            next_state,
            self.config.learning_rate,
            self.config.discount_factor,
        );
        self.decay_exploration();
        value
    }

    /// `ε <- max(ε_min, ε * decay)`
    pub fn decay_exploration(&mut self) {
        self.exploration_rate = (self.exploration_rate * self.config.exploration_decay)
            .max(self.config.min_exploration_rate);
    }

    /// Fold a finished game into the stats
    pub fn record_game(&mut self, score: u32, best_tile: u32) {
        self.stats.games_played += 1;
        self.stats.best_score = self.stats.best_score.max(score);
        self.stats.best_tile = self.stats.best_tile.max(best_tile);
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn stats(&self) -> &ModelStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ModelStats {
        &mut self.stats
    }

    fn random_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]
    }
}

impl Agent for QLearningAgent {
    fn choose_action(&mut self, grid: &Grid) -> Direction {
        self.select_action(grid)
    }

    fn observe(&mut self, transition: &Transition) {
        let reward = self.reward_for(transition);
        self.learn(&transition.state, transition.action, reward, &transition.next_state);
    }

    fn end_game(&mut self, score: u32, best_tile: u32) {
        self.record_game(score, best_tile);
    }

    fn name(&self) -> &'static str {
        "q-learning"
    }
}

/// Let `agent` play one move of `game`.
///
/// Snapshots the grid, asks the agent for a direction and applies it. When
/// the grid changed, the agent observes the transition to the committed
/// (pre-spawn) grid. Returns the applied direction, or `None` when the move
/// was rejected.
pub fn autoplay_step<A: Agent + ?Sized>(game: &mut GameState, agent: &mut A) -> Option<Direction> {
    let state = game.grid;
    let score_before = game.score;
    let action = agent.choose_action(&state);
    if !game.apply_move(action) {
        return None;
    }

    agent.observe(&Transition {
        state,
        action,
        move_score: game.score - score_before,
        score: game.score,
        next_state: game.grid,
    });
    Some(action)
}
