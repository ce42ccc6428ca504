//! State-keyed action-value table
//!
//! Each full grid is its own key; there is no generalization across
//! rotated or otherwise equivalent boards, and no eviction. The table grows
//! with every new state visited.

use std::collections::HashMap;

use crate::game::{Direction, Grid};

/// One value per direction, indexed by [`Direction::index`]
pub type ActionValues = [f64; 4];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    values: HashMap<Grid, ActionValues>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from persisted `(state, values)` pairs
    pub fn from_entries(entries: impl IntoIterator<Item = (Grid, ActionValues)>) -> Self {
        Self {
            values: entries.into_iter().collect(),
        }
    }

    /// Action values for `state`. Unseen states read as all zeros.
    pub fn values(&self, state: &Grid) -> ActionValues {
        self.values.get(state).copied().unwrap_or_default()
    }

    pub fn get(&self, state: &Grid, action: Direction) -> f64 {
        self.values(state)[action.index()]
    }

    /// `max_a Q[state, a]`, 0.0 for unseen states
    pub fn max_q(&self, state: &Grid) -> f64 {
        self.values(state)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action for `state`, or `None` if the state was never seen.
    /// Ties go to the lowest direction index.
    pub fn best_action(&self, state: &Grid) -> Option<Direction> {
        let values = self.values.get(state)?;
        let mut best = 0;
        for (index, &value) in values.iter().enumerate().skip(1) {
            if value > values[best] {
                best = index;
            }
        }
        Direction::from_index(best)
    }

    /// One-step Q-learning update:
    ///
    /// `Q[s,a] <- Q[s,a] + alpha * (r + gamma * max_a' Q[s',a'] - Q[s,a])`
    ///
    /// Returns the new `Q[s,a]`.
    pub fn update(
        &mut self,
        state: &Grid,
        action: Direction,
        reward: f64,
        next_state: &Grid,
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let target = reward + discount_factor * self.max_q(next_state);
        let entry = self.values.entry(*state).or_default();
        let current = &mut entry[action.index()];
        *current += learning_rate * (target - *current);
        *current
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Grid, &ActionValues)> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_a() -> Grid {
        Grid::from_rows([
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 2],
        ])
    }

    fn state_b() -> Grid {
        Grid::from_rows([
            [0, 0, 0, 2],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 2, 2],
        ])
    }

    #[test]
    fn test_unseen_state_reads_zero() {
        let table = QTable::new();
        assert_eq!(table.values(&state_a()), [0.0; 4]);
        assert_eq!(table.max_q(&state_a()), 0.0);
        assert_eq!(table.best_action(&state_a()), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_single_update() {
        let mut table = QTable::new();
        let value = table.update(&state_a(), Direction::Right, 10.0, &state_b(), 0.1, 0.9);
        // 0 + 0.1 * (10 + 0.9 * 0 - 0)
        assert!((value - 1.0).abs() < 1e-12);
        assert_eq!(table.get(&state_a(), Direction::Right), value);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_update_recurrence() {
        let (alpha, gamma, reward) = (0.1, 0.9, 4.0);
        let mut table = QTable::new();
        let first = table.update(&state_a(), Direction::Left, reward, &state_b(), alpha, gamma);
        let second = table.update(&state_a(), Direction::Left, reward, &state_b(), alpha, gamma);

        let next_max = table.max_q(&state_b());
        let expected = first + alpha * (reward + gamma * next_max - first);
        assert!((second - expected).abs() < 1e-12);
        assert!(second > first);
    }

    #[test]
    fn test_update_bootstraps_from_next_state() {
        let mut table = QTable::new();
        table.update(&state_b(), Direction::Down, 20.0, &state_a(), 0.5, 0.9);
        assert_eq!(table.max_q(&state_b()), 10.0);

        let value = table.update(&state_a(), Direction::Up, 0.0, &state_b(), 0.5, 0.9);
        // 0.5 * (0 + 0.9 * 10)
        assert!((value - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_best_action() {
        let mut table = QTable::new();
        table.update(&state_a(), Direction::Down, 10.0, &state_b(), 1.0, 0.0);
        assert_eq!(table.best_action(&state_a()), Some(Direction::Down));

        table.update(&state_a(), Direction::Left, 50.0, &state_b(), 1.0, 0.0);
        assert_eq!(table.best_action(&state_a()), Some(Direction::Left));
    }

    #[test]
    fn test_best_action_ties_pick_lowest_index() {
        let table = QTable::from_entries([(state_a(), [3.0, 5.0, 5.0, 1.0])]);
        assert_eq!(table.best_action(&state_a()), Some(Direction::Right));

        let flat = QTable::from_entries([(state_a(), [0.0; 4])]);
        assert_eq!(flat.best_action(&state_a()), Some(Direction::Up));
    }

    #[test]
    fn test_max_q_with_negative_values() {
        let table = QTable::from_entries([(state_a(), [-3.0, -1.0, -2.0, -5.0])]);
        assert_eq!(table.max_q(&state_a()), -1.0);
    }
}
