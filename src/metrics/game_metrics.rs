use std::time::{Duration, Instant};

/// Per-session numbers shown in the TUI header
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub games_played: u32,
    /// Best final score this session (the persisted high score lives in
    /// `GameState`)
    pub session_best: u32,
    pub session_best_tile: u32,
    total_score: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            games_played: 0,
            session_best: 0,
            session_best_tile: 0,
            total_score: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// Restart the game clock
    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32, best_tile: u32) {
        self.games_played += 1;
        self.total_score += u64::from(final_score);
        self.session_best = self.session_best.max(final_score);
        self.session_best_tile = self.session_best_tile.max(best_tile);
    }

    /// Mean final score of the games finished this session
    pub fn average_score(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_score as f64 / f64::from(self.games_played)
    }

    /// Elapsed game time as `MM:SS`
    pub fn format_time(&self) -> String {
        let secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
