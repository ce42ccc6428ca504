use super::agent::Agent;
use crate::game::{compute_move, Direction, Grid, GRID_SIZE};

/// Scripted corner strategy: keep big tiles in the right column.
///
/// Tries Right first, Down only once the right column is full, then Up, and
/// Left as a last resort.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self
    }

    /// First legal direction in preference order, `None` on a stuck grid
    pub fn pick(&self, grid: &Grid) -> Option<Direction> {
        let right_column_full = grid.column(GRID_SIZE - 1).iter().all(|&v| v != 0);
        let moves = |direction| compute_move(grid, direction).moved;

        if moves(Direction::Right) {
            Some(Direction::Right)
        } else if right_column_full && moves(Direction::Down) {
            Some(Direction::Down)
        } else if moves(Direction::Up) {
            Some(Direction::Up)
        } else if moves(Direction::Left) {
            Some(Direction::Left)
        } else {
            None
        }
    }
}

impl Agent for HeuristicPolicy {
    fn choose_action(&mut self, grid: &Grid) -> Direction {
        self.pick(grid).unwrap_or(Direction::Left)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
