//! Grid representation and neighbor counting for Game of Life

use super::error::{GridError, GridResult};
use super::patterns::SeedPattern;
use crate::config::BoundaryCondition;
use itertools::Itertools;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

const OFFSETS: [isize; 3] = [-1, 0, 1];

/// Represents a Game of Life grid
///
/// Cells are stored row-major and are always 0 (dead) or 1 (alive). Every
/// constructor validates its input, so a `Grid` value upholds that invariant
/// for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridRepr", into = "GridRepr")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
    boundary_condition: BoundaryCondition,
}

/// Serialized form: nested rows, validated on the way back in
#[derive(Serialize, Deserialize)]
struct GridRepr {
    #[serde(default)]
    boundary_condition: BoundaryCondition,
    cells: Vec<Vec<u8>>,
}

impl TryFrom<GridRepr> for Grid {
    type Error = GridError;

    fn try_from(repr: GridRepr) -> GridResult<Self> {
        Grid::from_rows(repr.cells, repr.boundary_condition)
    }
}

impl From<Grid> for GridRepr {
    fn from(grid: Grid) -> Self {
        GridRepr {
            boundary_condition: grid.boundary_condition,
            cells: grid.to_rows(),
        }
    }
}

impl Grid {
    /// Create a new grid with every cell dead
    pub fn new(rows: usize, cols: usize, boundary_condition: BoundaryCondition) -> GridResult<Self> {
        check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
            boundary_condition,
        })
    }

    /// Create a grid from nested rows of 0/1 values
    pub fn from_rows(rows: Vec<Vec<u8>>, boundary_condition: BoundaryCondition) -> GridResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        check_dimensions(height, width)?;

        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::RaggedRow { row: i, len: row.len(), expected: width });
            }
        }

        let cells: Vec<u8> = rows.into_iter().flatten().collect();
        Self::from_cells(height, width, cells, boundary_condition)
    }

    /// Create a grid from a flat row-major buffer
    pub fn from_cells(
        rows: usize,
        cols: usize,
        cells: Vec<u8>,
        boundary_condition: BoundaryCondition,
    ) -> GridResult<Self> {
        check_dimensions(rows, cols)?;

        if cells.len() != rows * cols {
            return Err(GridError::CellCountMismatch { len: cells.len(), expected: rows * cols });
        }

        if let Some(idx) = cells.iter().position(|&v| v > 1) {
            return Err(GridError::NonBinaryCell {
                row: idx / cols,
                col: idx % cols,
                value: cells[idx],
            });
        }

        Ok(Self { rows, cols, cells, boundary_condition })
    }

    /// Create a grid where each cell is alive with the given probability
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        probability: f64,
        boundary_condition: BoundaryCondition,
        rng: &mut R,
    ) -> GridResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(GridError::InvalidProbability(probability));
        }

        let mut grid = Self::new(rows, cols, boundary_condition)?;
        for cell in grid.cells.iter_mut() {
            *cell = u8::from(rng.gen_bool(probability));
        }
        Ok(grid)
    }

    /// Create an empty grid with a seed pattern placed at `offset` (row, col)
    pub fn with_pattern(
        rows: usize,
        cols: usize,
        pattern: &SeedPattern,
        offset: (usize, usize),
        boundary_condition: BoundaryCondition,
    ) -> GridResult<Self> {
        let mut grid = Self::new(rows, cols, boundary_condition)?;
        grid.place_pattern(pattern, offset)?;
        Ok(grid)
    }

    /// Copy a seed pattern into the grid with its top-left corner at `offset`
    ///
    /// The pattern overwrites the covered region, dead cells included.
    pub fn place_pattern(&mut self, pattern: &SeedPattern, offset: (usize, usize)) -> GridResult<()> {
        let (row0, col0) = offset;
        let fits = row0.checked_add(pattern.rows()).is_some_and(|end| end <= self.rows)
            && col0.checked_add(pattern.cols()).is_some_and(|end| end <= self.cols);

        if !fits {
            return Err(GridError::PatternOutOfBounds {
                name: pattern.name().to_string(),
                pattern_rows: pattern.rows(),
                pattern_cols: pattern.cols(),
                row: row0,
                col: col0,
                rows: self.rows,
                cols: self.cols,
            });
        }

        for (r, c) in (0..pattern.rows()).cartesian_product(0..pattern.cols()) {
            let idx = self.index(row0 + r, col0 + c);
            self.cells[idx] = pattern.get(r, c);
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn boundary_condition(&self) -> BoundaryCondition {
        self.boundary_condition
    }

    /// Row-major view of the cell values
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Get cell value at coordinates; out of bounds cells read as dead
    pub fn get(&self, row: usize, col: usize) -> u8 {
        if row < self.rows && col < self.cols {
            self.cells[self.index(row, col)]
        } else {
            0
        }
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == 1
    }

    /// Set cell value at coordinates
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> GridResult<()> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds { row, col, rows: self.rows, cols: self.cols });
        }
        if value > 1 {
            return Err(GridError::NonBinaryCell { row, col, value });
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    /// Count living neighbors in the Moore neighborhood of a cell
    ///
    /// Computed as the sum of the 3x3 block centered on the cell minus the
    /// cell itself. Under `Wrap` each coordinate is reduced modulo the grid
    /// size, so on grids one row or column wide the block can visit the same
    /// cell more than once and every visit counts.
    ///
    /// `(row, col)` must lie inside the grid; debug builds panic otherwise.
    pub fn count_neighbors(&self, row: usize, col: usize) -> u8 {
        debug_assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        let block: u8 = OFFSETS
            .iter()
            .cartesian_product(OFFSETS.iter())
            .map(|(&dr, &dc)| self.neighbor_value(row as isize + dr, col as isize + dc))
            .sum();

        block - self.get(row, col)
    }

    /// Neighbor counts for every cell, taken from this snapshot
    pub fn neighbor_counts(&self) -> NeighborCounts {
        let counts: Vec<u8> = (0..self.rows)
            .into_par_iter()
            .flat_map_iter(|row| (0..self.cols).map(move |col| self.count_neighbors(row, col)))
            .collect();

        NeighborCounts { rows: self.rows, cols: self.cols, counts }
    }

    /// Value at possibly out-of-range coordinates, resolved by the boundary condition
    fn neighbor_value(&self, row: isize, col: isize) -> u8 {
        match self.boundary_condition {
            BoundaryCondition::Wrap => {
                let wrapped_row = row.rem_euclid(self.rows as isize) as usize;
                let wrapped_col = col.rem_euclid(self.cols as isize) as usize;
                self.cells[self.index(wrapped_row, wrapped_col)]
            }
            BoundaryCondition::Dead => {
                if row >= 0 && row < self.rows as isize && col >= 0 && col < self.cols as isize {
                    self.cells[self.index(row as usize, col as usize)]
                } else {
                    0
                }
            }
        }
    }

    /// Get all living cell coordinates
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .positions(|&cell| cell == 1)
            .map(|idx| (idx / self.cols, idx % self.cols))
            .collect()
    }

    /// Count total living cells
    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == 1).count()
    }

    /// Check if the grid is empty (no living cells)
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == 0)
    }

    /// Fraction of living cells
    pub fn density(&self) -> f64 {
        self.living_count() as f64 / self.cells.len() as f64
    }

    /// Copy of the grid translated by (dr, dc) with toroidal wrap
    pub fn shifted(&self, dr: isize, dc: isize) -> Self {
        let mut cells = vec![0; self.cells.len()];
        for (row, col) in self.living_cells() {
            let r = (row as isize + dr).rem_euclid(self.rows as isize) as usize;
            let c = (col as isize + dc).rem_euclid(self.cols as isize) as usize;
            cells[r * self.cols + c] = 1;
        }
        Self { cells, ..self.clone() }
    }

    /// Nested rows of cell values
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.cols).map(<[u8]>::to_vec).collect()
    }

    /// Build a grid of the same shape from cells produced by the rules engine
    pub(crate) fn successor(&self, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), self.cells.len());
        Self {
            rows: self.rows,
            cols: self.cols,
            cells,
            boundary_condition: self.boundary_condition,
        }
    }
}

fn check_dimensions(rows: usize, cols: usize) -> GridResult<()> {
    if rows == 0 || cols == 0 {
        return Err(GridError::ZeroDimension { rows, cols });
    }
    Ok(())
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for &cell in row {
                let symbol = if cell == 1 { "⬛" } else { "⬜" };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-cell live neighbor counts for one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborCounts {
    rows: usize,
    cols: usize,
    counts: Vec<u8>,
}

impl NeighborCounts {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Count for an in-range cell; debug builds panic otherwise
    pub fn get(&self, row: usize, col: usize) -> u8 {
        debug_assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside {}x{} counts",
            self.rows,
            self.cols
        );
        self.counts[row * self.cols + col]
    }

    /// Row-major view of the counts
    pub fn as_slice(&self) -> &[u8] {
        &self.counts
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.counts.chunks(self.cols).map(<[u8]>::to_vec).collect()
    }
}
