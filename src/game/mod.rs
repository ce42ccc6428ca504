//! Core game logic module for 2048
//!
//! This module contains all the game logic without any terminal or rendering
//! dependencies. It is shared by the human front ends and the learning agent.

pub mod action;
pub mod animation;
pub mod config;
pub mod engine;
pub mod grid;
pub mod highscore;
pub mod line;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use animation::{MergePulse, MoveAnimation, PulsePhase};
pub use config::GameConfig;
pub use engine::{compute_move, legal_moves, MoveOutcome, TileSlide};
pub use grid::{Cell, Grid, Line, GRID_SIZE};
pub use highscore::HighScoreStore;
pub use line::{resolve_line, LineResolution, TileMove};
pub use state::GameState;
