use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseDirectionError;

/// Direction tiles slide in
///
/// The discriminants are the action indices used by the Q-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in action-index order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Action index of this direction (0..4)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Direction for an action index, `None` when out of range
    pub fn from_index(index: usize) -> Option<Direction> {
        Self::ALL.get(index).copied()
    }

    /// True for Left/Right, which operate on rows
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True for Right/Down, which are resolved on reversed lines
    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Parses the console commands `w`/`a`/`s`/`d` (either case) or a full name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "up" => Ok(Direction::Up),
            "d" | "right" => Ok(Direction::Right),
            "s" | "down" => Ok(Direction::Down),
            "a" | "left" => Ok(Direction::Left),
            _ => Err(ParseDirectionError(s.trim().to_string())),
        }
    }
}
