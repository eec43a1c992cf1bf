//! Configuration settings for the Game of Life simulator

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub grid: GridConfig,
    pub initial: InitialState,
    #[serde(default)]
    pub patterns: PatternConfig,
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub boundary_condition: BoundaryCondition,
}

/// How neighbor lookups treat coordinates past the grid edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCondition {
    /// Opposite edges are adjacent (toroidal)
    #[default]
    Wrap,
    /// Cells past the edge are permanently dead
    Dead,
}

/// How the first generation is populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InitialState {
    Empty,
    Random {
        probability: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
    Pattern {
        name: String,
        offset: PatternOffset,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternOffset {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Directory of extra `.txt` patterns added to the standard library
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub iterations: usize,
    pub interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub save_recording: bool,
    pub output_directory: PathBuf,
    pub frames_per_second: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Visual,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridConfig {
                rows: 128,
                cols: 128,
                boundary_condition: BoundaryCondition::Wrap,
            },
            initial: InitialState::Random {
                probability: 0.5,
                seed: None,
            },
            patterns: PatternConfig::default(),
            simulation: SimulationConfig {
                iterations: 100,
                interval_ms: 10,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                save_recording: false,
                output_directory: PathBuf::from("output/recordings"),
                frames_per_second: 5,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            anyhow::bail!(
                "Grid dimensions must be positive, got {}x{}",
                self.grid.rows,
                self.grid.cols
            );
        }

        if self.simulation.iterations == 0 {
            anyhow::bail!("Number of iterations must be positive");
        }

        if let InitialState::Random { probability, .. } = self.initial {
            if !(0.0..=1.0).contains(&probability) {
                anyhow::bail!("Fill probability must be within [0, 1], got {}", probability);
            }
        }

        if self.output.frames_per_second == 0 {
            anyhow::bail!("Frames per second must be positive");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    ///
    /// A pattern offset without a pattern to place, from either the command
    /// line or the file, is rejected.
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) -> Result<()> {
        if let Some(rows) = cli_overrides.rows {
            self.grid.rows = rows;
        }
        if let Some(cols) = cli_overrides.cols {
            self.grid.cols = cols;
        }
        if let Some(iterations) = cli_overrides.iterations {
            self.simulation.iterations = iterations;
        }
        if let Some(interval_ms) = cli_overrides.interval_ms {
            self.simulation.interval_ms = interval_ms;
        }
        if let Some(ref name) = cli_overrides.pattern {
            self.initial = InitialState::Pattern {
                name: name.clone(),
                offset: cli_overrides.pattern_offset(PatternOffset::default()),
            };
        } else if cli_overrides.seed.is_some() || cli_overrides.probability.is_some() {
            let (mut probability, mut seed) = match self.initial {
                InitialState::Random { probability, seed } => (probability, seed),
                _ => (0.5, None),
            };
            if let Some(p) = cli_overrides.probability {
                probability = p;
            }
            if cli_overrides.seed.is_some() {
                seed = cli_overrides.seed;
            }
            self.initial = InitialState::Random { probability, seed };
        }
        if cli_overrides.has_offset() {
            match self.initial {
                InitialState::Pattern { ref mut offset, .. } => {
                    *offset = cli_overrides.pattern_offset(*offset);
                }
                _ => anyhow::bail!("Pattern offset given but no pattern is selected"),
            }
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
            self.output.save_recording = true;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        Ok(())
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub iterations: Option<usize>,
    pub interval_ms: Option<u64>,
    pub pattern: Option<String>,
    pub offset_row: Option<usize>,
    pub offset_col: Option<usize>,
    pub probability: Option<f64>,
    pub seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl CliOverrides {
    fn has_offset(&self) -> bool {
        self.offset_row.is_some() || self.offset_col.is_some()
    }

    /// `base` with whichever offset components were given replaced
    fn pattern_offset(&self, base: PatternOffset) -> PatternOffset {
        PatternOffset {
            row: self.offset_row.unwrap_or(base.row),
            col: self.offset_col.unwrap_or(base.col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.grid.rows, 128);
        assert_eq!(settings.simulation.iterations, 100);
        assert_eq!(settings.grid.boundary_condition, BoundaryCondition::Wrap);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.grid.cols = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.simulation.iterations = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.initial = InitialState::Random { probability: 1.5, seed: None };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.initial = InitialState::Pattern {
            name: "glider_gun".to_string(),
            offset: PatternOffset { row: 50, col: 10 },
        };
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_parse_pattern_mode_yaml() {
        let yaml = r#"
grid:
  rows: 20
  cols: 30
initial:
  mode: pattern
  name: toad
  offset:
    row: 5
    col: 6
simulation:
  iterations: 10
  interval_ms: 50
output:
  format: json
  save_recording: true
  output_directory: out
  frames_per_second: 5
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.grid.boundary_condition, BoundaryCondition::Wrap);
        assert_eq!(settings.patterns.directory, None);
        assert_eq!(
            settings.initial,
            InitialState::Pattern {
                name: "toad".to_string(),
                offset: PatternOffset { row: 5, col: 6 },
            }
        );
        assert_eq!(settings.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            rows: Some(40),
            iterations: Some(7),
            seed: Some(42),
            ..Default::default()
        };
        settings.merge_with_cli(&overrides).unwrap();

        assert_eq!(settings.grid.rows, 40);
        assert_eq!(settings.grid.cols, 128);
        assert_eq!(settings.simulation.iterations, 7);
        assert_eq!(
            settings.initial,
            InitialState::Random { probability: 0.5, seed: Some(42) }
        );

        let overrides = CliOverrides {
            pattern: Some("glider".to_string()),
            output_dir: Some(PathBuf::from("frames")),
            ..Default::default()
        };
        settings.merge_with_cli(&overrides).unwrap();
        assert!(matches!(settings.initial, InitialState::Pattern { ref name, .. } if name == "glider"));
        assert!(settings.output.save_recording);
    }

    #[test]
    fn test_offset_overrides_file_pattern() {
        let mut settings = Settings::default();
        settings.initial = InitialState::Pattern {
            name: "glider_gun".to_string(),
            offset: PatternOffset { row: 50, col: 10 },
        };

        let overrides = CliOverrides { offset_col: Some(3), ..Default::default() };
        settings.merge_with_cli(&overrides).unwrap();
        assert_eq!(
            settings.initial,
            InitialState::Pattern {
                name: "glider_gun".to_string(),
                offset: PatternOffset { row: 50, col: 3 },
            }
        );

        let overrides = CliOverrides {
            pattern: Some("toad".to_string()),
            offset_row: Some(4),
            ..Default::default()
        };
        settings.merge_with_cli(&overrides).unwrap();
        assert_eq!(
            settings.initial,
            InitialState::Pattern {
                name: "toad".to_string(),
                offset: PatternOffset { row: 4, col: 0 },
            }
        );
    }

    #[test]
    fn test_offset_without_pattern_is_rejected() {
        let mut settings = Settings::default();
        let overrides = CliOverrides { offset_row: Some(2), ..Default::default() };
        assert!(settings.merge_with_cli(&overrides).is_err());

        let overrides = CliOverrides {
            seed: Some(1),
            offset_col: Some(2),
            ..Default::default()
        };
        assert!(Settings::default().merge_with_cli(&overrides).is_err());
    }
}
