//! Front ends: TUI play, console play, headless training and watching an agent

pub mod autoplay;
pub mod console;
pub mod human;
pub mod train;
pub mod watch;

pub use autoplay::AutoplayPolicy;
pub use console::ConsoleMode;
pub use human::HumanMode;
pub use train::{EpisodeSummary, TrainConfig, TrainMode};
pub use watch::{WatchMode, WatchSpeed};
