//! Seed patterns and the name-keyed pattern library

use super::error::{GridError, GridResult};
use super::Grid;
use crate::config::BoundaryCondition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named, fixed-size binary template used to seed a region of a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPattern {
    name: String,
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl SeedPattern {
    /// Build a pattern from nested rows; validated like any grid
    pub fn from_rows(name: impl Into<String>, rows: &[&[u8]]) -> GridResult<Self> {
        let owned: Vec<Vec<u8>> = rows.iter().map(|row| row.to_vec()).collect();
        let grid = Grid::from_rows(owned, BoundaryCondition::Dead)?;
        Ok(Self::from_grid(name, &grid))
    }

    /// Take the contents of a grid as a pattern
    pub fn from_grid(name: impl Into<String>, grid: &Grid) -> Self {
        Self {
            name: name.into(),
            rows: grid.rows(),
            cols: grid.cols(),
            cells: grid.cells().to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.cols + col]
    }

    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == 1).count()
    }

    /// The pattern as a standalone grid of its own size
    pub fn to_grid(&self, boundary_condition: BoundaryCondition) -> GridResult<Grid> {
        Grid::with_pattern(self.rows, self.cols, self, (0, 0), boundary_condition)
    }

    /// Built-in tables are rectangular and binary; checked by the library tests
    fn from_static(name: &str, rows: &[&[u8]]) -> Self {
        Self {
            name: name.to_string(),
            rows: rows.len(),
            cols: rows.first().map_or(0, |row| row.len()),
            cells: rows.iter().flat_map(|row| row.iter().copied()).collect(),
        }
    }
}

/// Immutable lookup of seed patterns by name
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    patterns: BTreeMap<String, SeedPattern>,
}

impl PatternLibrary {
    /// A library with no patterns
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in pattern collection
    pub fn standard() -> Self {
        Self::empty().with_patterns(
            STANDARD_PATTERNS
                .iter()
                .map(|(name, rows)| SeedPattern::from_static(name, rows)),
        )
    }

    /// Add a pattern, replacing any existing pattern with the same name
    pub fn insert(&mut self, pattern: SeedPattern) {
        self.patterns.insert(pattern.name.clone(), pattern);
    }

    /// Return a library extended with the given patterns
    pub fn with_patterns(mut self, patterns: impl IntoIterator<Item = SeedPattern>) -> Self {
        for pattern in patterns {
            self.insert(pattern);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&SeedPattern> {
        self.patterns.get(name)
    }

    /// Look up a pattern, failing with `UnknownPattern` if it is missing
    pub fn require(&self, name: &str) -> GridResult<&SeedPattern> {
        self.get(name).ok_or_else(|| GridError::UnknownPattern(name.to_string()))
    }

    /// Pattern names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeedPattern> {
        self.patterns.values()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

const STANDARD_PATTERNS: &[(&str, &[&[u8]])] = &[
    ("glider", &[
        &[0, 1, 0],
        &[0, 0, 1],
        &[1, 1, 1],
    ]),
    // Glider on the right, eater on the left
    ("eater_with_glider", &[
        &[0, 0, 0, 0, 0, 1, 0],
        &[0, 0, 0, 0, 0, 0, 1],
        &[0, 0, 0, 0, 1, 1, 1],
        &[0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0],
        &[1, 1, 0, 0, 0, 0, 0],
        &[0, 1, 1, 0, 0, 0, 0],
    ]),
    ("diehard", &[
        &[0, 0, 0, 0, 0, 0, 1, 0],
        &[1, 1, 0, 0, 0, 0, 0, 0],
        &[0, 1, 0, 0, 0, 1, 1, 1],
    ]),
    ("boat", &[
        &[1, 1, 0],
        &[1, 0, 1],
        &[0, 1, 0],
    ]),
    ("r_pentomino", &[
        &[0, 1, 1],
        &[1, 1, 0],
        &[0, 1, 0],
    ]),
    ("pentadecathlon", &[
        &[1, 1, 1, 1, 1, 1, 1, 1],
        &[1, 0, 1, 1, 1, 1, 0, 1],
        &[1, 1, 1, 1, 1, 1, 1, 1],
    ]),
    ("beacon", &[
        &[1, 1, 0, 0],
        &[1, 1, 0, 0],
        &[0, 0, 1, 1],
        &[0, 0, 1, 1],
    ]),
    ("acorn", &[
        &[0, 1, 0, 0, 0, 0, 0],
        &[0, 0, 0, 1, 0, 0, 0],
        &[1, 1, 0, 0, 1, 1, 1],
    ]),
    ("spaceship", &[
        &[0, 0, 1, 1, 0],
        &[1, 1, 0, 1, 1],
        &[1, 1, 1, 1, 0],
        &[0, 1, 1, 0, 0],
    ]),
    ("block_switch_engine", &[
        &[0, 0, 0, 0, 0, 0, 1, 0],
        &[0, 0, 0, 0, 1, 0, 1, 1],
        &[0, 0, 0, 0, 1, 0, 1, 0],
        &[0, 0, 0, 0, 1, 0, 0, 0],
        &[0, 0, 1, 0, 0, 0, 0, 0],
        &[1, 0, 1, 0, 0, 0, 0, 0],
    ]),
    ("infinite", &[
        &[1, 1, 1, 0, 1],
        &[1, 0, 0, 0, 0],
        &[0, 0, 0, 1, 1],
        &[0, 1, 1, 0, 1],
        &[1, 0, 1, 0, 1],
    ]),
    ("glider_gun", &[
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0],
        &[0, 0, 1, 1, 0, 0, 0, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 1, 1, 0, 0, 0, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ]),
    ("toad", &[
        &[0, 0, 0, 0, 0],
        &[0, 0, 1, 1, 1],
        &[0, 1, 1, 1, 0],
        &[0, 0, 0, 0, 0],
    ]),
    ("thunderbird", &[
        &[1, 1, 1],
        &[0, 0, 0],
        &[0, 1, 0],
        &[0, 1, 0],
        &[0, 1, 0],
    ]),
];
