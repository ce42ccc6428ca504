//! Animation bookkeeping for a move: the slide, the merge pulse and spawn
//! highlights. Pure timing state; nothing here touches the grid.

use std::collections::HashMap;

use super::{config::GameConfig, engine::TileSlide, grid::Cell};

/// Tiles sliding from their old to their new cells
#[derive(Debug, Clone, PartialEq)]
pub struct MoveAnimation {
    pub slides: Vec<TileSlide>,
    /// Seconds elapsed since the move started
    pub elapsed: f32,
}

impl MoveAnimation {
    pub fn new(slides: Vec<TileSlide>) -> Self {
        Self {
            slides,
            elapsed: 0.0,
        }
    }

    /// Interpolation factor in [0, 1]
    pub fn progress(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / duration).min(1.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulsePhase {
    Grow,
    Shrink,
}

/// Scale pulse on freshly merged tiles: grows to the peak scale, then
/// shrinks back to 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct MergePulse {
    pub cells: Vec<Cell>,
    pub phase: PulsePhase,
    pub scale: f32,
}

impl MergePulse {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            phase: PulsePhase::Grow,
            scale: 1.0,
        }
    }

    /// Advance by `dt` seconds. Returns true once the pulse has finished.
    pub fn advance(&mut self, dt: f32, config: &GameConfig) -> bool {
        let peak = config.merge_pulse_scale;
        let step = if config.merge_animation_secs <= 0.0 {
            f32::INFINITY
        } else {
            dt / config.merge_animation_secs * (peak - 1.0)
        };

        if self.phase == PulsePhase::Grow {
            self.scale += step;
            if self.scale < peak {
                return false;
            }
            self.scale = peak;
            self.phase = PulsePhase::Shrink;
            if step.is_finite() {
                return false;
            }
        }

        self.scale -= step;
        if self.scale > 1.0 {
            return false;
        }
        self.scale = 1.0;
        true
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }
}

/// Age of every spawn highlight, in seconds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnHighlights {
    ages: HashMap<Cell, f32>,
}

impl SpawnHighlights {
    pub fn start(&mut self, cell: Cell) {
        self.ages.insert(cell, 0.0);
    }

    /// Age all highlights and drop the ones older than `duration`
    pub fn advance(&mut self, dt: f32, duration: f32) {
        for age in self.ages.values_mut() {
            *age += dt;
        }
        self.ages.retain(|_, age| *age < duration);
    }

    /// Growth factor in [0, 1] for the tile at `cell`, `None` if not spawning
    pub fn scale(&self, cell: Cell, duration: f32) -> Option<f32> {
        self.ages.get(&cell).map(|age| {
            if duration <= 0.0 {
                1.0
            } else {
                (age / duration).min(1.0)
            }
        })
    }

    pub fn clear(&mut self) {
        self.ages.clear();
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_progress() {
        let mut anim = MoveAnimation::new(Vec::new());
        assert_eq!(anim.progress(0.15), 0.0);
        anim.elapsed = 0.075;
        assert!((anim.progress(0.15) - 0.5).abs() < 1e-6);
        anim.elapsed = 1.0;
        assert_eq!(anim.progress(0.15), 1.0);
        assert_eq!(MoveAnimation::new(Vec::new()).progress(0.0), 1.0);
    }

    #[test]
    fn test_merge_pulse_grows_then_shrinks() {
        let config = GameConfig::default();
        let mut pulse = MergePulse::new(vec![(0, 0)]);

        // 0.05s is half of the grow phase: +0.15 scale
        assert!(!pulse.advance(0.05, &config));
        assert_eq!(pulse.phase, PulsePhase::Grow);
        assert!((pulse.scale - 1.15).abs() < 1e-5);

        assert!(!pulse.advance(0.06, &config));
        assert_eq!(pulse.phase, PulsePhase::Shrink);
        assert!((pulse.scale - 1.3).abs() < 1e-5);

        assert!(!pulse.advance(0.05, &config));
        assert!(pulse.advance(0.06, &config));
        assert_eq!(pulse.scale, 1.0);
    }

    #[test]
    fn test_merge_pulse_instant() {
        let config = GameConfig::instant();
        let mut pulse = MergePulse::new(vec![(1, 1)]);
        assert!(pulse.advance(0.0, &config));
        assert!(pulse.contains((1, 1)));
        assert!(!pulse.contains((0, 1)));
    }

    #[test]
    fn test_spawn_highlights_expire() {
        let mut spawns = SpawnHighlights::default();
        spawns.start((2, 3));
        assert_eq!(spawns.scale((2, 3), 0.2), Some(0.0));

        spawns.advance(0.1, 0.2);
        let scale = spawns.scale((2, 3), 0.2).unwrap();
        assert!((scale - 0.5).abs() < 1e-5);

        spawns.advance(0.1, 0.2);
        assert!(spawns.is_empty());
        assert_eq!(spawns.scale((2, 3), 0.2), None);
    }
}
