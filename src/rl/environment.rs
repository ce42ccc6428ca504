use super::agent::{autoplay_step, Agent};
use crate::game::{Direction, GameConfig, GameState, Grid, HighScoreStore};

/// Outcome of one environment step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the direction changed the grid
    pub moved: bool,
    /// Points earned by this step
    pub move_score: u32,
    /// Total score after the step
    pub score: u32,
    /// True once no move can change the grid
    pub done: bool,
}

/// Headless 2048 for training
///
/// Wraps a [`GameState`] and settles every animation immediately, so each
/// step leaves a fully spawned grid. A win never pauses the game: training
/// keeps playing past the winning tile.
pub struct Game2048Environment {
    game: GameState,
}

impl Game2048Environment {
    pub fn new(config: GameConfig, high_scores: HighScoreStore) -> Self {
        Self {
            game: GameState::new(config, high_scores),
        }
    }

    pub fn with_seed(config: GameConfig, high_scores: HighScoreStore, seed: u64) -> Self {
        Self {
            game: GameState::with_seed(config, high_scores, seed),
        }
    }

    /// Start a new game and return its grid
    pub fn reset(&mut self) -> Grid {
        self.game.reset();
        self.game.grid
    }

    /// Apply `direction`, spawn the follow-up tile and report the result
    pub fn step(&mut self, direction: Direction) -> StepResult {
        let before = self.game.score;
        let moved = self.game.apply_move(direction);
        self.finish_step(before, moved)
    }

    /// Let `agent` pick and learn from one move, then settle like [`step`]
    ///
    /// [`step`]: Game2048Environment::step
    pub fn step_agent<A: Agent + ?Sized>(&mut self, agent: &mut A) -> StepResult {
        let before = self.game.score;
        let moved = autoplay_step(&mut self.game, agent).is_some();
        self.finish_step(before, moved)
    }

    fn finish_step(&mut self, before: u32, moved: bool) -> StepResult {
        self.game.settle();
        if self.game.awaiting_continue() {
            self.game.continue_game();
        }

        StepResult {
            moved,
            move_score: self.game.score - before,
            score: self.game.score,
            done: self.is_done(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.game.game_over
    }

    pub fn grid(&self) -> &Grid {
        &self.game.grid
    }

    /// Underlying game, for agents that drive it directly
    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn state(&self) -> &GameState {
        &self.game
    }
}
