//! Replay validation for recorded simulations

use super::Recording;
use crate::game_of_life::{GameOfLifeRules, Grid};
use rayon::prelude::*;
use std::time::Instant;

/// Checks that every transition in a recording follows the Game of Life rules
#[derive(Debug, Default)]
pub struct RecordingValidator;

/// Result of recording validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub validation_details: ValidationDetails,
}

/// Detailed validation information
#[derive(Debug, Clone, Default)]
pub struct ValidationDetails {
    pub generations_checked: usize,
    pub rule_violations: Vec<RuleViolation>,
    pub performance_metrics: ValidationMetrics,
}

/// A cell whose recorded next state disagrees with the rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    /// Generation the faulty cell belongs to
    pub generation: usize,
    pub cell_position: (usize, usize),
    pub expected_state: u8,
    pub actual_state: u8,
    pub neighbor_count: u8,
}

/// Performance metrics for validation
#[derive(Debug, Clone, Default)]
pub struct ValidationMetrics {
    pub validation_time_ms: u64,
    pub cells_checked: usize,
}

impl RecordingValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate every consecutive pair of generations in the recording
    pub fn validate(&self, recording: &Recording) -> ValidationResult {
        let start_time = Instant::now();
        let generations = &recording.generations;

        let Some(first) = generations.first() else {
            return ValidationResult {
                is_valid: false,
                error_message: Some("Recording contains no generations".to_string()),
                validation_details: ValidationDetails::default(),
            };
        };

        if let Some((i, grid)) = generations
            .iter()
            .enumerate()
            .find(|(_, g)| g.rows() != first.rows() || g.cols() != first.cols())
        {
            return ValidationResult {
                is_valid: false,
                error_message: Some(format!(
                    "Grid dimension mismatch at generation {}: {}x{}, expected {}x{}",
                    i, grid.rows(), grid.cols(), first.rows(), first.cols()
                )),
                validation_details: ValidationDetails::default(),
            };
        }

        let rule_violations: Vec<RuleViolation> = generations
            .par_windows(2)
            .enumerate()
            .flat_map_iter(|(i, pair)| self.validate_transition(&pair[0], &pair[1], i + 1))
            .collect();

        let is_valid = rule_violations.is_empty();
        let validation_details = ValidationDetails {
            generations_checked: generations.len() - 1,
            rule_violations,
            performance_metrics: ValidationMetrics {
                validation_time_ms: start_time.elapsed().as_millis() as u64,
                cells_checked: (generations.len() - 1) * first.rows() * first.cols(),
            },
        };

        let error_message = if is_valid {
            None
        } else {
            Some(self.generate_error_message(&validation_details))
        };

        ValidationResult {
            is_valid,
            error_message,
            validation_details,
        }
    }

    /// Compare `next` against the rules applied to `current`
    pub fn validate_transition(&self, current: &Grid, next: &Grid, generation: usize) -> Vec<RuleViolation> {
        let counts = current.neighbor_counts();
        let mut violations = Vec::new();

        for row in 0..current.rows() {
            for col in 0..current.cols() {
                let neighbor_count = counts.get(row, col);
                let expected_state = GameOfLifeRules::next_state(current.get(row, col), neighbor_count);
                let actual_state = next.get(row, col);

                if actual_state != expected_state {
                    violations.push(RuleViolation {
                        generation,
                        cell_position: (row, col),
                        expected_state,
                        actual_state,
                        neighbor_count,
                    });
                }
            }
        }

        violations
    }

    fn generate_error_message(&self, details: &ValidationDetails) -> String {
        let mut message = format!(
            "Found {} rule violations. ",
            details.rule_violations.len()
        );

        for (i, violation) in details.rule_violations.iter().take(3).enumerate() {
            if i == 0 {
                message.push_str("Examples: ");
            }
            message.push_str(&format!("{}; ", violation));
        }

        if details.rule_violations.len() > 3 {
            message.push_str(&format!("... and {} more", details.rule_violations.len() - 3));
        }

        message
    }
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = |v: u8| if v == 1 { "alive" } else { "dead" };
        write!(
            f,
            "cell ({}, {}) at generation {} should be {} but is {} ({} neighbors)",
            self.cell_position.0,
            self.cell_position.1,
            self.generation,
            state(self.expected_state),
            state(self.actual_state),
            self.neighbor_count
        )
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result: {}", if self.is_valid { "VALID" } else { "INVALID" })?;

        if let Some(ref error) = self.error_message {
            writeln!(f, "Error: {}", error)?;
        }

        let details = &self.validation_details;
        writeln!(f, "Generations checked: {}", details.generations_checked)?;
        writeln!(f, "Rule violations: {}", details.rule_violations.len())?;
        writeln!(f, "Cells checked: {}", details.performance_metrics.cells_checked)?;
        writeln!(f, "Validation time: {}ms", details.performance_metrics.validation_time_ms)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundaryCondition;
    use crate::simulation::Simulation;
    use std::time::Duration;

    fn blinker() -> Grid {
        Grid::from_rows(
            vec![
                vec![0, 0, 0, 0, 0],
                vec![0, 0, 1, 0, 0],
                vec![0, 0, 1, 0, 0],
                vec![0, 0, 1, 0, 0],
                vec![0, 0, 0, 0, 0],
            ],
            BoundaryCondition::Wrap,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_recording() {
        let recording = Simulation::new(blinker(), 4).record();
        let result = RecordingValidator::new().validate(&recording);

        assert!(result.is_valid);
        assert!(result.error_message.is_none());
        assert_eq!(result.validation_details.generations_checked, 4);
        assert_eq!(result.validation_details.performance_metrics.cells_checked, 100);
    }

    #[test]
    fn test_tampered_recording() {
        let mut recording = Simulation::new(blinker(), 3).record();
        recording.generations[2].set(0, 0, 1).unwrap();

        let result = RecordingValidator::new().validate(&recording);
        assert!(!result.is_valid);

        let violations = &result.validation_details.rule_violations;
        // The bad cell is wrong in generation 2 and makes generation 3 diverge too
        assert_eq!(violations[0].generation, 2);
        assert_eq!(violations[0].cell_position, (0, 0));
        assert_eq!(violations[0].expected_state, 0);
        assert_eq!(violations[0].actual_state, 1);
        assert!(violations.iter().any(|v| v.generation == 3));
        assert!(result.error_message.unwrap().contains("rule violations"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let small = Grid::new(3, 3, BoundaryCondition::Wrap).unwrap();
        let large = Grid::new(4, 4, BoundaryCondition::Wrap).unwrap();
        let recording = Recording::new(vec![small, large], Duration::ZERO);

        let result = RecordingValidator::new().validate(&recording);
        assert!(!result.is_valid);
        assert!(result.error_message.unwrap().contains("dimension mismatch"));
    }

    #[test]
    fn test_rule_violation_detection() {
        let current = Grid::from_rows(
            vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]],
            BoundaryCondition::Dead,
        )
        .unwrap();

        let violations = RecordingValidator::new().validate_transition(&current, &current, 1);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].cell_position, (1, 1));
        assert_eq!(violations[0].neighbor_count, 0);
        assert_eq!(
            violations[0].to_string(),
            "cell (1, 1) at generation 1 should be dead but is alive (0 neighbors)"
        );
    }
}
