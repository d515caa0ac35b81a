//! Grid representation and construction for Game of Life

use crate::error::GridError;
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Probability that a cell starts alive in a randomized grid
pub const ALIVE_PROBABILITY: f64 = 0.2;

/// Fixed-size, edge-bounded Game of Life grid.
///
/// Dimensions are set at construction and never change. Cells are stored
/// row-major in a flat buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Create an empty or randomized grid using the thread-local RNG
    pub fn create(rows: usize, cols: usize, randomize: bool) -> Self {
        Self::create_with_rng(rows, cols, randomize, &mut rand::thread_rng())
    }

    /// Create an empty or randomized grid from the given random source.
    ///
    /// Each cell is an independent trial: alive when a uniform draw in
    /// [0, 1) falls below [`ALIVE_PROBABILITY`].
    pub fn create_with_rng<R: Rng>(
        rows: usize,
        cols: usize,
        randomize: bool,
        rng: &mut R,
    ) -> Self {
        if !randomize {
            return Self::new(rows, cols);
        }
        Self::fill(rows, cols, ALIVE_PROBABILITY, rng)
    }

    /// Create a randomized grid with a custom alive probability
    pub fn random_with_density<R: Rng>(
        rows: usize,
        cols: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(GridError::InvalidDensity(density));
        }
        Ok(Self::fill(rows, cols, density, rng))
    }

    /// Fill with independent trials at `density`; callers check the range
    pub(crate) fn fill<R: Rng>(rows: usize, cols: usize, density: f64, rng: &mut R) -> Self {
        let cells = (0..rows * cols)
            .map(|_| rng.gen::<f64>() < density)
            .collect();
        Self { rows, cols, cells }
    }

    /// Create a grid from a 2D boolean array.
    ///
    /// An empty outer vector yields a 0x0 grid.
    pub fn from_rows(cells: Vec<Vec<bool>>) -> Result<Self, GridError> {
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);

        for (i, row) in cells.iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::RaggedRows {
                    row: i,
                    len: row.len(),
                    expected: cols,
                });
            }
        }

        Ok(Self {
            rows,
            cols,
            cells: cells.into_iter().flatten().collect(),
        })
    }

    /// Create a grid with the listed cells alive
    pub fn from_living(
        rows: usize,
        cols: usize,
        living: &[(usize, usize)],
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(rows, cols);
        for &(row, col) in living {
            grid.set(row, col, true)?;
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells in the grid
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Get cell value at coordinates; off-grid cells read as dead
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.contains(row, col) && self.cells[self.index(row, col)]
    }

    /// Set cell value at coordinates
    pub fn set(&mut self, row: usize, col: usize, value: bool) -> Result<(), GridError> {
        if !self.contains(row, col) {
            return Err(GridError::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    /// Iterate over rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
        // chunks() rejects a zero chunk size; a 0-column grid has no cells anyway
        self.cells.chunks(self.cols.max(1))
    }

    /// Get all living cell coordinates in row-major order
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(idx, _)| (idx / self.cols, idx % self.cols))
            .collect()
    }

    /// Count total living cells
    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Fraction of living cells, 0.0 for an empty grid
    pub fn density(&self) -> f64 {
        if self.cells.is_empty() {
            0.0
        } else {
            self.living_count() as f64 / self.cells.len() as f64
        }
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    pub(crate) fn cells(&self) -> &[bool] {
        &self.cells
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for &cell in row {
                write!(f, "{}", if cell { '1' } else { '0' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
