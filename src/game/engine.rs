use super::{
    action::Direction,
    grid::{Cell, Grid, Line, GRID_SIZE},
    line::resolve_line,
};

/// Movement of one source tile across the grid, for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSlide {
    /// Value of the tile before any merge
    pub value: u32,
    /// Cell the tile started in
    pub from: Cell,
    /// Cell the tile (or its merge product) ends in
    pub to: Cell,
    /// Whether the tile took part in a merge
    pub merged: bool,
}

/// Result of applying a move to a grid
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    /// Grid after the move (no tile spawned yet)
    pub grid: Grid,
    /// Sum of newly merged tile values across all lines
    pub score: u32,
    /// Whether any cell changed
    pub moved: bool,
    /// One record per tile of the original grid
    pub slides: Vec<TileSlide>,
    /// Cells holding newly merged tiles
    pub merges: Vec<Cell>,
}

/// Apply `direction` to every row or column of `grid`.
///
/// Pure: the input grid is not modified and no tile is spawned. Right and
/// Down are resolved on reversed lines and mapped back with `N - 1 - index`.
pub fn compute_move(grid: &Grid, direction: Direction) -> MoveOutcome {
    let mut next = *grid;
    let mut score = 0;
    let mut moved = false;
    let mut slides = Vec::new();
    let mut merges = Vec::new();

    for lane in 0..GRID_SIZE {
        let original = extract_line(grid, direction, lane);
        let oriented = orient(original, direction);
        let resolution = resolve_line(&oriented);
        let resolved = orient(resolution.line, direction);

        score += resolution.score;
        moved |= resolved != original;
        store_line(&mut next, direction, lane, resolved);

        let to_cell = |index: usize| lane_cell(direction, lane, unorient_index(index, direction));
        slides.extend(resolution.moves.iter().map(|m| TileSlide {
            value: m.value,
            from: to_cell(m.from),
            to: to_cell(m.to),
            merged: m.merged,
        }));
        merges.extend(resolution.merges.iter().map(|&index| to_cell(index)));
    }

    MoveOutcome {
        grid: next,
        score,
        moved,
        slides,
        merges,
    }
}

/// Directions that would change `grid`
pub fn legal_moves(grid: &Grid) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&direction| compute_move(grid, direction).moved)
        .collect()
}

fn extract_line(grid: &Grid, direction: Direction, lane: usize) -> Line {
    if direction.is_horizontal() {
        grid.row(lane)
    } else {
        grid.column(lane)
    }
}

fn store_line(grid: &mut Grid, direction: Direction, lane: usize, line: Line) {
    if direction.is_horizontal() {
        grid.set_row(lane, line);
    } else {
        grid.set_column(lane, line);
    }
}

/// Reverse the line for Right/Down so merging always runs toward index 0
fn orient(mut line: Line, direction: Direction) -> Line {
    if direction.is_reversed() {
        line.reverse();
    }
    line
}

fn unorient_index(index: usize, direction: Direction) -> usize {
    if direction.is_reversed() {
        GRID_SIZE - 1 - index
    } else {
        index
    }
}

fn lane_cell(direction: Direction, lane: usize, index: usize) -> Cell {
    if direction.is_horizontal() {
        (lane, index)
    } else {
        (index, lane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_rows([
            [2, 2, 0, 4],
            [0, 0, 0, 0],
            [4, 0, 4, 8],
            [2, 0, 0, 2],
        ])
    }

    #[test]
    fn test_move_left() {
        let outcome = compute_move(&sample(), Direction::Left);
        assert_eq!(
            outcome.grid,
            Grid::from_rows([
                [4, 4, 0, 0],
                [0, 0, 0, 0],
                [8, 8, 0, 0],
                [4, 0, 0, 0],
            ])
        );
        assert_eq!(outcome.score, 4 + 8 + 4);
        assert!(outcome.moved);
        assert_eq!(outcome.merges, vec![(0, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn test_move_right() {
        let outcome = compute_move(&sample(), Direction::Right);
        assert_eq!(
            outcome.grid,
            Grid::from_rows([
                [0, 0, 4, 4],
                [0, 0, 0, 0],
                [0, 0, 8, 8],
                [0, 0, 0, 4],
            ])
        );
        assert_eq!(outcome.score, 16);
        assert_eq!(outcome.merges, vec![(0, 2), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_move_up() {
        let outcome = compute_move(&sample(), Direction::Up);
        assert_eq!(
            outcome.grid,
            Grid::from_rows([
                [2, 2, 4, 4],
                [4, 0, 0, 8],
                [2, 0, 0, 2],
                [0, 0, 0, 0],
            ])
        );
        assert_eq!(outcome.score, 0);
        assert!(outcome.moved);
        assert!(outcome.merges.is_empty());
    }

    #[test]
    fn test_move_down_merges_toward_bottom() {
        let grid = Grid::from_rows([
            [2, 0, 0, 0],
            [2, 0, 0, 0],
            [2, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let outcome = compute_move(&grid, Direction::Down);
        assert_eq!(outcome.grid.column(0), [0, 0, 2, 4]);
        assert_eq!(outcome.score, 4);
        assert_eq!(outcome.merges, vec![(3, 0)]);
    }

    #[test]
    fn test_slides_remapped_for_reversed_lines() {
        let grid = Grid::from_rows([
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let outcome = compute_move(&grid, Direction::Right);
        assert_eq!(
            outcome.slides,
            vec![TileSlide { value: 2, from: (0, 0), to: (0, 3), merged: false }]
        );

        let outcome = compute_move(&grid, Direction::Down);
        assert_eq!(
            outcome.slides,
            vec![TileSlide { value: 2, from: (0, 0), to: (3, 0), merged: false }]
        );
    }

    #[test]
    fn test_no_move_when_blocked() {
        let grid = Grid::from_rows([
            [2, 4, 0, 0],
            [8, 16, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let outcome = compute_move(&grid, Direction::Left);
        assert!(!outcome.moved);
        assert_eq!(outcome.grid, grid);
        assert_eq!(outcome.score, 0);

        let outcome = compute_move(&grid, Direction::Up);
        assert!(!outcome.moved);
    }

    #[test]
    fn test_compute_move_is_pure() {
        let grid = sample();
        let first = compute_move(&grid, Direction::Left);
        let second = compute_move(&grid, Direction::Left);
        assert_eq!(first, second);
        assert_eq!(grid, sample());
    }

    #[test]
    fn test_legal_moves() {
        let grid = Grid::from_rows([
            [2, 4, 0, 0],
            [8, 16, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        assert_eq!(legal_moves(&grid), vec![Direction::Right, Direction::Down]);

        let terminal = Grid::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(legal_moves(&terminal).is_empty());
    }

    #[test]
    fn test_value_conservation() {
        let grid = sample();
        for direction in Direction::ALL {
            let outcome = compute_move(&grid, direction);
            assert_eq!(outcome.grid.tile_sum(), grid.tile_sum(), "direction {}", direction);
            let merged_value: u32 = outcome.merges.iter().map(|&cell| outcome.grid.get(cell)).sum();
            assert_eq!(merged_value, outcome.score);
            assert_eq!(
                grid.tile_count() - outcome.grid.tile_count(),
                outcome.merges.len()
            );
        }
    }
}
