//! Game of Life rules: neighbor counting, generation stepping and extinction

use super::Grid;
use crate::error::GridError;
use itertools::iproduct;
use rayon::prelude::*;

/// Grids with at least this many cells are stepped in parallel
const PARALLEL_THRESHOLD: usize = 64 * 64;

/// Count living neighbors of an in-bounds cell.
///
/// Off-grid positions contribute nothing; there is no wraparound.
pub fn count_neighbors(grid: &Grid, row: usize, col: usize) -> Result<u8, GridError> {
    if !grid.contains(row, col) {
        return Err(GridError::OutOfRange {
            row,
            col,
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }
    Ok(neighbors_in_bounds(grid, row, col))
}

fn neighbors_in_bounds(grid: &Grid, row: usize, col: usize) -> u8 {
    let row_range = row.saturating_sub(1)..=(row + 1).min(grid.rows() - 1);
    let col_range = col.saturating_sub(1)..=(col + 1).min(grid.cols() - 1);

    iproduct!(row_range, col_range)
        .filter(|&(r, c)| (r, c) != (row, col) && grid.get(r, c))
        .count() as u8
}

/// Whether a cell is alive in the next generation (B3/S23)
pub fn should_be_alive(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Compute the next generation as a new grid.
///
/// Every decision reads only from `current`, so no cell of the new
/// generation is visible while it is being built.
pub fn step(current: &Grid) -> Grid {
    let (rows, cols) = (current.rows(), current.cols());
    let next_cell = |idx: usize| {
        let (row, col) = (idx / cols, idx % cols);
        should_be_alive(current.cells()[idx], neighbors_in_bounds(current, row, col))
    };

    let cells: Vec<bool> = if current.area() >= PARALLEL_THRESHOLD {
        (0..current.area()).into_par_iter().map(next_cell).collect()
    } else {
        (0..current.area()).map(next_cell).collect()
    };

    Grid::from_parts(rows, cols, cells)
}

/// Advance the grid by several generations
pub fn step_n(mut grid: Grid, generations: usize) -> Grid {
    for _ in 0..generations {
        grid = step(&grid);
    }
    grid
}

/// True when no cell in the grid is alive; vacuously true for 0x0
pub fn is_extinct(grid: &Grid) -> bool {
    !grid.cells().iter().any(|&cell| cell)
}
