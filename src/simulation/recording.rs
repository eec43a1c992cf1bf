//! Recorded simulation runs and their analysis

use crate::game_of_life::Grid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

fn default_frames_per_second() -> u32 {
    5
}

/// Every generation of one simulation run, initial state first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Generation 0 is the initial grid
    pub generations: Vec<Grid>,
    /// Playback rate for consumers that turn the recording into an animation
    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: u32,
    /// Wall-clock time spent simulating
    #[serde(skip)]
    pub elapsed: Duration,
    pub metadata: RecordingMetadata,
}

/// Metadata about a recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingMetadata {
    /// Identifier derived from the initial grid
    pub id: String,
    pub rows: usize,
    pub cols: usize,
    pub initial_living_cells: usize,
    pub final_living_cells: usize,
    pub peak_living_cells: usize,
    pub peak_generation: usize,
    /// Density of living cells in the initial grid (0.0 to 1.0)
    pub initial_density: f64,
    pub stability: StabilityAnalysis,
}

/// Long-run behavior observed in a recording
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityAnalysis {
    /// Every cell is dead in the final generation
    pub is_extinct: bool,
    /// A generation repeats its immediate predecessor
    pub is_still_life: bool,
    /// A generation repeats an earlier one after more than one step
    pub is_oscillator: bool,
    pub oscillation_period: Option<usize>,
    /// First generation that is part of the repeating cycle
    pub cycle_start: Option<usize>,
    /// The same live-cell shape reappears at a different position
    pub has_moving_patterns: bool,
}

impl Recording {
    /// Create a recording from consecutive generations
    pub fn new(generations: Vec<Grid>, elapsed: Duration) -> Self {
        let metadata = RecordingMetadata::analyze(&generations);

        Self {
            generations,
            frames_per_second: default_frames_per_second(),
            elapsed,
            metadata,
        }
    }

    pub fn with_frame_rate(mut self, frames_per_second: u32) -> Self {
        self.frames_per_second = frames_per_second;
        self
    }

    /// Get the initial state
    pub fn initial(&self) -> &Grid {
        &self.generations[0]
    }

    /// Get the last recorded state
    pub fn final_state(&self) -> &Grid {
        &self.generations[self.generations.len() - 1]
    }

    /// Get a specific state in the recording
    pub fn state_at_generation(&self, generation: usize) -> Option<&Grid> {
        self.generations.get(generation)
    }

    /// Number of transitions captured
    pub fn iterations(&self) -> usize {
        self.generations.len().saturating_sub(1)
    }

    /// Living cell count per generation
    pub fn population_history(&self) -> Vec<usize> {
        self.generations.iter().map(Grid::living_count).collect()
    }

    /// Get a summary of the recording
    pub fn summary(&self) -> RecordingSummary {
        RecordingSummary {
            id: self.metadata.id.clone(),
            rows: self.metadata.rows,
            cols: self.metadata.cols,
            iterations: self.iterations(),
            initial_living_cells: self.metadata.initial_living_cells,
            final_living_cells: self.metadata.final_living_cells,
            behavior: self.metadata.stability.label(),
            elapsed_ms: self.elapsed.as_millis() as u64,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    ///
    /// Stored metadata is ignored and recomputed from the generations.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut recording: Self = serde_json::from_str(json)?;
        recording.metadata = RecordingMetadata::analyze(&recording.generations);
        Ok(recording)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let recording = Self::from_json(&content)?;
        if recording.generations.is_empty() {
            anyhow::bail!("Recording contains no generations");
        }
        Ok(recording)
    }
}

impl RecordingMetadata {
    /// Analyze a sequence of generations and create metadata
    pub fn analyze(generations: &[Grid]) -> Self {
        let populations: Vec<usize> = generations.iter().map(Grid::living_count).collect();
        let (peak_generation, peak_living_cells) = populations
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0), |best, (i, count)| if count > best.1 { (i, count) } else { best });

        let (rows, cols, initial_density) = generations
            .first()
            .map_or((0, 0, 0.0), |grid| (grid.rows(), grid.cols(), grid.density()));

        Self {
            id: generations.first().map_or_else(String::new, Self::generate_id),
            rows,
            cols,
            initial_living_cells: populations.first().copied().unwrap_or(0),
            final_living_cells: populations.last().copied().unwrap_or(0),
            peak_living_cells,
            peak_generation,
            initial_density,
            stability: StabilityAnalysis::analyze(generations),
        }
    }

    /// Generate an ID for the recording based on the initial state
    fn generate_id(initial: &Grid) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        initial.hash(&mut hasher);

        format!("rec_{:x}", hasher.finish())
    }
}

impl StabilityAnalysis {
    /// Analyze the stability of a sequence of generations
    pub fn analyze(generations: &[Grid]) -> Self {
        let is_extinct = generations.last().is_some_and(Grid::is_empty);
        let cycle = Self::find_cycle(generations);
        let period = cycle.map(|(_, period)| period);

        Self {
            is_extinct,
            is_still_life: period == Some(1),
            is_oscillator: period.is_some_and(|p| p > 1),
            oscillation_period: period.filter(|&p| p > 1),
            cycle_start: cycle.map(|(start, _)| start),
            has_moving_patterns: Self::check_moving_patterns(generations),
        }
    }

    /// First repeated generation as (cycle start, period)
    fn find_cycle(generations: &[Grid]) -> Option<(usize, usize)> {
        let mut seen: HashMap<&Grid, usize> = HashMap::with_capacity(generations.len());

        for (i, grid) in generations.iter().enumerate() {
            if let Some(&first) = seen.get(grid) {
                return Some((first, i - first));
            }
            seen.insert(grid, i);
        }

        None
    }

    /// Whether a live-cell shape reappears translated
    fn check_moving_patterns(generations: &[Grid]) -> bool {
        let mut origins: HashMap<Vec<(usize, usize)>, (usize, usize)> = HashMap::new();

        for grid in generations {
            let Some((origin, shape)) = Self::normalized_shape(grid) else {
                continue;
            };
            match origins.get(&shape) {
                Some(&first_origin) if first_origin != origin => return true,
                Some(_) => {}
                None => {
                    origins.insert(shape, origin);
                }
            }
        }

        false
    }

    /// Living cells relative to their bounding box corner, plus that corner
    fn normalized_shape(grid: &Grid) -> Option<((usize, usize), Vec<(usize, usize)>)> {
        let cells = grid.living_cells();
        let min_row = cells.iter().map(|&(r, _)| r).min()?;
        let min_col = cells.iter().map(|&(_, c)| c).min()?;

        let shape = cells.into_iter().map(|(r, c)| (r - min_row, c - min_col)).collect();
        Some(((min_row, min_col), shape))
    }

    /// Short human-readable description
    pub fn label(&self) -> String {
        if self.is_extinct {
            "Extinct".to_string()
        } else if self.is_still_life {
            "Still Life".to_string()
        } else if let Some(period) = self.oscillation_period {
            format!("Oscillator (period {})", period)
        } else if self.has_moving_patterns {
            "Moving Pattern".to_string()
        } else {
            "Other".to_string()
        }
    }
}

/// Summary of a recording for display purposes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSummary {
    pub id: String,
    pub rows: usize,
    pub cols: usize,
    pub iterations: usize,
    pub initial_living_cells: usize,
    pub final_living_cells: usize,
    pub behavior: String,
    pub elapsed_ms: u64,
}

impl std::fmt::Display for RecordingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Recording {}: {}x{}, {} gen, {} → {} cells, {}, {}ms",
               self.id,
               self.rows,
               self.cols,
               self.iterations,
               self.initial_living_cells,
               self.final_living_cells,
               self.behavior,
               self.elapsed_ms)
    }
}
