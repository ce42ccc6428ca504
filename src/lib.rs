//! ML 2048 - the 2048 sliding tile game with a Q-learning player
//!
//! This library provides:
//! - Core game logic: line resolution, moves, spawning, win and game over (game module)
//! - Tabular Q-learning, a heuristic policy and model persistence (rl module)
//! - TUI rendering with slide, merge and spawn animations (render module)
//! - Execution modes: human, console, train and watch (modes module)

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
