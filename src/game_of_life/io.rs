//! File I/O operations for Game of Life grids

use super::{Grid, PatternLibrary, SeedPattern};
use crate::config::BoundaryCondition;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

/// Load a grid from a text file
/// Format: Each line represents a row, with '1' for alive cells and '0' for dead cells
pub fn load_grid_from_file<P: AsRef<Path>>(
    path: P,
    boundary_condition: BoundaryCondition
) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content, boundary_condition)
        .with_context(|| format!("Failed to parse grid from file: {}", path.as_ref().display()))
}

/// Parse a grid from a string representation
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_grid_from_string(content: &str, boundary_condition: BoundaryCondition) -> Result<Grid> {
    let lines: Vec<&str> = content.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Grid file is empty or contains no valid rows");
    }

    let mut rows = Vec::with_capacity(lines.len());

    for (row_idx, line) in lines.iter().enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (col_idx, ch) in line.chars().enumerate() {
            match ch {
                '0' => row.push(0),
                '1' => row.push(1),
                _ => anyhow::bail!("Invalid character '{}' at position ({}, {}). Only '0' and '1' are allowed",
                                 ch, row_idx, col_idx),
            }
        }
        rows.push(row);
    }

    Ok(Grid::from_rows(rows, boundary_condition)?)
}

/// Save a grid to a text file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let content = grid_to_string(grid);

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Convert a grid to string representation
pub fn grid_to_string(grid: &Grid) -> String {
    let mut result = String::with_capacity(grid.rows() * (grid.cols() + 1));

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            result.push(if grid.is_alive(row, col) { '1' } else { '0' });
        }
        result.push('\n');
    }

    result
}

/// Load multiple grids from a directory, keyed by file stem
///
/// Files that fail to parse are skipped with a warning.
pub fn load_grids_from_directory<P: AsRef<Path>>(
    dir_path: P,
    boundary_condition: BoundaryCondition
) -> Result<Vec<(String, Grid)>> {
    let dir = std::fs::read_dir(&dir_path)
        .with_context(|| format!("Failed to read directory: {}", dir_path.as_ref().display()))?;

    let mut grids = Vec::new();

    for entry in dir {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            let filename = path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            match load_grid_from_file(&path, boundary_condition) {
                Ok(grid) => grids.push((filename, grid)),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable grid file"),
            }
        }
    }

    grids.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(grids)
}

/// The standard library extended with every pattern file in `dir_path`
pub fn load_pattern_library<P: AsRef<Path>>(dir_path: Option<P>) -> Result<PatternLibrary> {
    let library = PatternLibrary::standard();
    let Some(dir_path) = dir_path else {
        return Ok(library);
    };

    let custom = load_grids_from_directory(&dir_path, BoundaryCondition::Dead)
        .context("Failed to load pattern directory")?;

    Ok(library.with_patterns(
        custom.into_iter().map(|(name, grid)| SeedPattern::from_grid(name, &grid)),
    ))
}

/// Write every pattern in the library as `<name>.txt`
pub fn write_pattern_files<P: AsRef<Path>>(library: &PatternLibrary, output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    for pattern in library.iter() {
        let grid = pattern.to_grid(BoundaryCondition::Dead)?;
        save_grid_to_file(&grid, dir.join(format!("{}.txt", pattern.name())))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_grid_from_string() {
        let content = "# blinker\n010\n010\n010\n";
        let grid = parse_grid_from_string(content, BoundaryCondition::Wrap).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.living_count(), 3);
        assert!(grid.is_alive(0, 1));
        assert!(grid.is_alive(2, 1));
        assert_eq!(grid.boundary_condition(), BoundaryCondition::Wrap);
    }

    #[test]
    fn test_grid_to_string() {
        let grid = Grid::from_rows(
            vec![
                vec![0, 1, 0],
                vec![1, 0, 1],
            ],
            BoundaryCondition::Dead,
        )
        .unwrap();

        assert_eq!(grid_to_string(&grid), "010\n101\n");
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("nested/test_grid.txt");

        let original_grid = Grid::from_rows(
            vec![
                vec![1, 0, 1],
                vec![0, 1, 0],
            ],
            BoundaryCondition::Dead,
        )
        .unwrap();

        save_grid_to_file(&original_grid, &file_path).unwrap();
        let loaded_grid = load_grid_from_file(&file_path, BoundaryCondition::Dead).unwrap();

        assert_eq!(original_grid, loaded_grid);
    }

    #[test]
    fn test_invalid_input() {
        assert!(parse_grid_from_string("010\n1X1\n010\n", BoundaryCondition::Wrap).is_err());
        assert!(parse_grid_from_string("010\n11\n010\n", BoundaryCondition::Wrap).is_err());
        assert!(parse_grid_from_string("", BoundaryCondition::Wrap).is_err());
        assert!(parse_grid_from_string("# only a comment\n", BoundaryCondition::Wrap).is_err());
    }

    #[test]
    fn test_pattern_files_extend_library() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("blinker.txt"), "111\n").unwrap();
        std::fs::write(temp_dir.path().join("broken.txt"), "1a1\n").unwrap();
        std::fs::write(temp_dir.path().join("notes.md"), "ignored").unwrap();

        let library = load_pattern_library(Some(temp_dir.path())).unwrap();
        assert_eq!(library.len(), 15);
        assert_eq!(library.get("blinker").unwrap().living_count(), 3);
        assert!(library.get("broken").is_none());

        let standard = load_pattern_library(None::<&Path>).unwrap();
        assert_eq!(standard.len(), 14);
    }

    #[test]
    fn test_write_pattern_files() {
        let temp_dir = tempdir().unwrap();
        let library = PatternLibrary::standard();
        write_pattern_files(&library, temp_dir.path()).unwrap();

        assert!(temp_dir.path().join("glider.txt").exists());
        assert!(temp_dir.path().join("glider_gun.txt").exists());

        let glider = load_grid_from_file(temp_dir.path().join("glider.txt"), BoundaryCondition::Dead).unwrap();
        assert_eq!((glider.rows(), glider.cols()), (3, 3));
        assert_eq!(glider.living_count(), 5);

        let reloaded = load_pattern_library(Some(temp_dir.path())).unwrap();
        assert_eq!(reloaded.len(), 14);
        assert_eq!(reloaded.get("toad"), library.get("toad"));
    }
}
