//! Line resolution: slides and merges a single row or column toward index 0.

use super::grid::{Line, GRID_SIZE};

/// Where one source tile ends up after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMove {
    /// Value of the source tile (before any merge)
    pub value: u32,
    /// Index the tile started at
    pub from: usize,
    /// Index the tile (or its merge product) ends at
    pub to: usize,
    /// Whether this tile was consumed by a merge
    pub merged: bool,
}

/// Result of resolving one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineResolution {
    /// The line after sliding and merging, zero-padded on the right
    pub line: Line,
    /// Sum of the values of all newly merged tiles
    pub score: u32,
    /// One record per non-zero source tile, in scan order
    pub moves: Vec<TileMove>,
    /// Indices of newly merged tiles
    pub merges: Vec<usize>,
}

impl LineResolution {
    /// True if the resolved line differs from `original`
    pub fn changed(&self, original: &Line) -> bool {
        self.line != *original
    }
}

/// Resolve a line toward index 0.
///
/// Each pair of equal neighbours (ignoring zeros) merges once; a merged tile
/// never merges again in the same pass, so `[2, 2, 2, 2]` becomes
/// `[4, 4, 0, 0]` rather than `[8, 0, 0, 0]`.
pub fn resolve_line(line: &Line) -> LineResolution {
    let tiles: Vec<(usize, u32)> = line
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, value)| value != 0)
        .collect();

    let mut resolved = [0u32; GRID_SIZE];
    let mut len = 0;
    let mut score = 0;
    let mut moves = Vec::with_capacity(tiles.len());
    let mut merges = Vec::new();

    let mut i = 0;
    while i < tiles.len() {
        let (from, value) = tiles[i];
        match tiles.get(i + 1) {
            Some(&(next_from, next_value)) if next_value == value => {
                let merged = value * 2;
                resolved[len] = merged;
                score += merged;
                moves.push(TileMove { value, from, to: len, merged: true });
                moves.push(TileMove {
                    value: next_value,
                    from: next_from,
                    to: len,
                    merged: true,
                });
                merges.push(len);
                i += 2;
            }
            _ => {
                resolved[len] = value;
                moves.push(TileMove { value, from, to: len, merged: false });
                i += 1;
            }
        }
        len += 1;
    }

    LineResolution {
        line: resolved,
        score,
        moves,
        merges,
    }
}
