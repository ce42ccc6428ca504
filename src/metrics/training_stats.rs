//! Training statistics for Q-learning runs
//!
//! Rolling windows over the most recent games plus all-time bests.

use std::collections::VecDeque;

/// Training statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use ml_2048::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// stats.record_episode(1024, 128, 140);
///
/// assert_eq!(stats.best_score(), 1024);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Final scores (rolling window)
    episode_scores: VecDeque<u32>,

    /// Largest tile reached per game (rolling window)
    episode_max_tiles: VecDeque<u32>,

    /// Applied moves per game (rolling window)
    episode_moves: VecDeque<usize>,

    total_episodes: usize,
    total_moves: usize,
    best_score: u32,
    best_tile: u32,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_scores: VecDeque::with_capacity(window_size),
            episode_max_tiles: VecDeque::with_capacity(window_size),
            episode_moves: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_moves: 0,
            best_score: 0,
            best_tile: 0,
            window_size,
        }
    }

    /// Record a finished game
    pub fn record_episode(&mut self, score: u32, max_tile: u32, moves: usize) {
        Self::push_deque(&mut self.episode_scores, score, self.window_size);
        Self::push_deque(&mut self.episode_max_tiles, max_tile, self.window_size);
        Self::push_deque(&mut self.episode_moves, moves, self.window_size);
        self.total_episodes += 1;
        self.total_moves += moves;
        self.best_score = self.best_score.max(score);
        self.best_tile = self.best_tile.max(max_tile);
    }

    /// Mean final score over the window, 0.0 when empty
    pub fn mean_score(&self) -> f64 {
        Self::mean(self.episode_scores.iter().map(|&s| f64::from(s)))
    }

    pub fn mean_max_tile(&self) -> f64 {
        Self::mean(self.episode_max_tiles.iter().map(|&t| f64::from(t)))
    }

    pub fn mean_moves(&self) -> f64 {
        Self::mean(self.episode_moves.iter().map(|&m| m as f64))
    }

    /// Fraction of windowed games whose largest tile reached `tile`
    pub fn reach_rate(&self, tile: u32) -> f64 {
        Self::mean(
            self.episode_max_tiles
                .iter()
                .map(|&t| if t >= tile { 1.0 } else { 0.0 }),
        )
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_moves(&self) -> usize {
        self.total_moves
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn best_tile(&self) -> u32 {
        self.best_tile
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary for progress output
    ///
    /// `Episodes: 1 | Moves: 140 | Score: 1024.0 | Best: 1024 | Tile: 128.0 | Top tile: 128`
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Moves: {} | Score: {:.1} | Best: {} | Tile: {:.1} | Top tile: {}",
            self.total_episodes,
            self.total_moves,
            self.mean_score(),
            self.best_score,
            self.mean_max_tile(),
            self.best_tile,
        )
    }

    fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
        let len = values.len();
        if len == 0 {
            0.0
        } else {
            values.sum::<f64>() / len as f64
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
