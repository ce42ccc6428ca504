use rand::{rngs::StdRng, SeedableRng};

use super::{
    action::Direction,
    animation::{MergePulse, MoveAnimation, SpawnHighlights},
    config::GameConfig,
    engine::compute_move,
    grid::{Cell, Grid},
    highscore::HighScoreStore,
};

/// Complete game state
///
/// Owns the grid and score, drives the move engine, and keeps the animation
/// bookkeeping that gates input. A successful move commits the new grid at
/// once; the follow-up tile spawn waits until the slide (and merge pulse, if
/// any) has finished, either through [`GameState::update`] or
/// [`GameState::settle`].
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: Grid,
    pub score: u32,
    pub high_score: u32,
    pub best_tile: u32,
    pub moves: u32,
    pub game_over: bool,
    pub game_won: bool,
    pub continue_after_win: bool,
    config: GameConfig,
    rng: StdRng,
    high_scores: HighScoreStore,
    last_save_error: Option<String>,
    move_animation: Option<MoveAnimation>,
    pending_merges: Vec<Cell>,
    merge_pulse: Option<MergePulse>,
    spawns: SpawnHighlights,
}

impl GameState {
    /// Start a new game with an entropy-seeded RNG
    pub fn new(config: GameConfig, high_scores: HighScoreStore) -> Self {
        Self::with_rng(config, high_scores, StdRng::from_entropy())
    }

    /// Start a new game with a deterministic RNG
    pub fn with_seed(config: GameConfig, high_scores: HighScoreStore, seed: u64) -> Self {
        Self::with_rng(config, high_scores, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: GameConfig, high_scores: HighScoreStore, rng: StdRng) -> Self {
        // Unreadable high score files count as "no prior score"
        let high_score = high_scores.load_or_default();
        let mut state = Self {
            grid: Grid::EMPTY,
            score: 0,
            high_score,
            best_tile: 0,
            moves: 0,
            game_over: false,
            game_won: false,
            continue_after_win: false,
            config,
            rng,
            high_scores,
            last_save_error: None,
            move_animation: None,
            pending_merges: Vec::new(),
            merge_pulse: None,
            spawns: SpawnHighlights::default(),
        };
        state.spawn_tile();
        state.spawn_tile();
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Slide tiles in `direction`.
    ///
    /// Returns false without touching the state while an animation is
    /// pending, after game over, while a win awaits [`continue_game`], or
    /// when the move would not change the grid.
    ///
    /// [`continue_game`]: GameState::continue_game
    pub fn apply_move(&mut self, direction: Direction) -> bool {
        if self.is_animating() || !self.accepts_moves() {
            return false;
        }

        let outcome = compute_move(&self.grid, direction);
        if !outcome.moved {
            return false;
        }

        self.grid = outcome.grid;
        self.score += outcome.score;
        self.moves += 1;
        for &cell in &outcome.merges {
            self.best_tile = self.best_tile.max(self.grid.get(cell));
        }
        if self.score > self.high_score {
            self.high_score = self.score;
            self.save_high_score();
        }

        self.move_animation = Some(MoveAnimation::new(outcome.slides));
        self.pending_merges = outcome.merges;
        true
    }

    /// Advance animations by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if let Some(anim) = self.move_animation.as_mut() {
            anim.elapsed += dt;
            if anim.elapsed >= self.config.move_animation_secs {
                self.move_animation = None;
                let merges = std::mem::take(&mut self.pending_merges);
                if merges.is_empty() {
                    self.finish_turn();
                } else {
                    self.merge_pulse = Some(MergePulse::new(merges));
                }
            }
        }

        let pulse_done = self
            .merge_pulse
            .as_mut()
            .is_some_and(|pulse| pulse.advance(dt, &self.config));
        if pulse_done {
            self.merge_pulse = None;
            self.finish_turn();
        }

        self.spawns.advance(dt, self.config.spawn_animation_secs);
    }

    /// Finish any pending animation immediately, including the tile spawn
    /// it was holding back
    pub fn settle(&mut self) {
        let pending = self.move_animation.take().is_some() | self.merge_pulse.take().is_some();
        self.pending_merges.clear();
        if pending {
            self.finish_turn();
        }
    }

    /// True while a slide or merge pulse is running
    pub fn is_animating(&self) -> bool {
        self.move_animation.is_some() || self.merge_pulse.is_some()
    }

    /// False after game over, or while a win waits for [`continue_game`]
    ///
    /// [`continue_game`]: GameState::continue_game
    pub fn accepts_moves(&self) -> bool {
        !(self.game_over && !self.game_won) && !self.awaiting_continue()
    }

    /// True when the game is won and the player has not chosen to continue
    pub fn awaiting_continue(&self) -> bool {
        self.game_won && !self.continue_after_win
    }

    /// Place a 2 or 4 on a random empty cell. No-op on a full grid.
    pub fn spawn_tile(&mut self) -> Option<(Cell, u32)> {
        let spawned = self
            .grid
            .spawn_tile(&mut self.rng, self.config.spawn_four_probability)?;
        let (cell, value) = spawned;
        self.spawns.start(cell);
        self.best_tile = self.best_tile.max(value);
        Some(spawned)
    }

    /// True when no move can change the grid
    pub fn is_terminal(&self) -> bool {
        self.grid.is_terminal()
    }

    /// Set `game_won` the first time a tile reaches the winning value.
    /// Returns true only on that first time.
    pub fn check_win(&mut self) -> bool {
        if !self.game_won && self.grid.max_tile() >= self.config.win_tile {
            self.game_won = true;
            return true;
        }
        false
    }

    /// Keep playing after a win
    pub fn continue_game(&mut self) {
        if self.game_won {
            self.continue_after_win = true;
        }
    }

    /// Start over with two fresh tiles. The high score is kept.
    pub fn reset(&mut self) {
        self.grid = Grid::EMPTY;
        self.score = 0;
        self.best_tile = 0;
        self.moves = 0;
        self.game_over = false;
        self.game_won = false;
        self.continue_after_win = false;
        self.move_animation = None;
        self.pending_merges.clear();
        self.merge_pulse = None;
        self.spawns.clear();
        self.spawn_tile();
        self.spawn_tile();
    }

    pub fn move_animation(&self) -> Option<&MoveAnimation> {
        self.move_animation.as_ref()
    }

    pub fn merge_pulse(&self) -> Option<&MergePulse> {
        self.merge_pulse.as_ref()
    }

    /// Growth factor of a freshly spawned tile, `None` if it is not spawning
    pub fn spawn_scale(&self, cell: Cell) -> Option<f32> {
        self.spawns.scale(cell, self.config.spawn_animation_secs)
    }

    /// Most recent high score write failure, if any
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    fn finish_turn(&mut self) {
        self.spawn_tile();
        self.check_win();
        if self.is_terminal() {
            self.game_over = true;
        }
    }

    /// Persistence failures never interrupt play
    fn save_high_score(&mut self) {
        self.last_save_error = self
            .high_scores
            .save(self.high_score)
            .err()
            .map(|e| e.to_string());
    }
}
