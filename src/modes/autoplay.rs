use std::path::PathBuf;

use crate::game::{Direction, GameState};
use crate::render::AgentPanel;
use crate::rl::{
    autoplay_step, load_model, save_model, Agent, HeuristicPolicy, QLearningAgent, QLearningConfig,
};

/// The policy driving autoplay in the TUI modes
pub enum AutoplayPolicy {
    /// Learns while it plays and saves the model after every game
    QLearning {
        agent: QLearningAgent,
        data_dir: PathBuf,
    },
    Heuristic(HeuristicPolicy),
}

impl AutoplayPolicy {
    /// Q-learning agent resumed from `data_dir`
    pub fn q_learning(config: QLearningConfig, data_dir: PathBuf) -> Self {
        let agent = load_model(config, &data_dir);
        Self::QLearning { agent, data_dir }
    }

    pub fn heuristic() -> Self {
        Self::Heuristic(HeuristicPolicy::new())
    }

    pub fn name(&self) -> &'static str {
        self.agent().name()
    }

    /// Play one move. Returns the applied direction, `None` if rejected.
    pub fn step(&mut self, game: &mut GameState) -> Option<Direction> {
        autoplay_step(game, self.agent_mut())
    }

    /// Record a finished game. Returns a warning when the model could not
    /// be saved.
    pub fn finish_game(&mut self, score: u32, best_tile: u32) -> Option<String> {
        self.agent_mut().end_game(score, best_tile);
        match self {
            Self::QLearning { agent, data_dir } => save_model(agent, data_dir)
                .err()
                .map(|e| format!("model not saved: {e}")),
            Self::Heuristic(_) => None,
        }
    }

    /// Side panel contents for the renderer
    pub fn panel(&self) -> AgentPanel {
        let panel = AgentPanel::new(self.name());
        match self {
            Self::QLearning { agent, .. } => panel
                .entry("Model version", agent.stats().version)
                .entry("Games played", agent.stats().games_played)
                .entry("Best score", agent.stats().best_score)
                .entry("Best tile", agent.stats().best_tile)
                .entry("States", agent.table().len())
                .entry("Epsilon", format!("{:.3}", agent.exploration_rate())),
            Self::Heuristic(_) => panel.entry("Strategy", "right, down, up, left"),
        }
    }

    fn agent(&self) -> &dyn Agent {
        match self {
            Self::QLearning { agent, .. } => agent,
            Self::Heuristic(policy) => policy,
        }
    }

    fn agent_mut(&mut self) -> &mut dyn Agent {
        match self {
            Self::QLearning { agent, .. } => agent,
            Self::Heuristic(policy) => policy,
        }
    }
}
