//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::game_of_life::{io::grid_to_string, Grid, NeighborCounts};
use crate::simulation::{Recording, Simulation};
use anyhow::{Context, Result};
use itertools::Itertools;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Text renderings of grids
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid in compact form
    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = String::with_capacity(grid.rows() * (grid.cols() * 3 + 1));
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                output.push(if grid.is_alive(row, col) { '█' } else { '·' });
            }
            output.push('\n');
        }
        output
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..grid.cols() {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        for row in 0..grid.rows() {
            output.push_str(&format!("{:2} ", row));
            for col in 0..grid.cols() {
                output.push_str(if grid.is_alive(row, col) { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// Format neighbor counts as a digit matrix
    pub fn format_neighbor_counts(counts: &NeighborCounts) -> String {
        counts
            .to_rows()
            .iter()
            .map(|row| row.iter().join(" "))
            .join("\n")
            + "\n"
    }
}

/// Summaries and exports of recordings
pub struct RecordingFormatter;

impl RecordingFormatter {
    /// Format a recording for console output
    pub fn format_recording(recording: &Recording, show_evolution: bool) -> String {
        let metadata = &recording.metadata;
        let mut output = String::new();

        output.push_str(&format!("=== Recording {} ===\n", metadata.id));
        output.push_str(&format!("Grid: {}x{}\n", metadata.rows, metadata.cols));
        output.push_str(&format!("Generations: {}\n", recording.iterations()));
        output.push_str(&format!("Simulation Time: {:.3}s\n", recording.elapsed.as_secs_f64()));
        output.push_str(&format!("Living Cells: {} → {} (peak {} at generation {})\n",
                                metadata.initial_living_cells,
                                metadata.final_living_cells,
                                metadata.peak_living_cells,
                                metadata.peak_generation));
        output.push_str(&format!("Behavior: {}\n", metadata.stability.label()));
        if let Some(start) = metadata.stability.cycle_start {
            output.push_str(&format!("Cycle starts at generation {}\n", start));
        }
        output.push('\n');

        if show_evolution {
            output.push_str("Evolution:\n");
            for (i, grid) in recording.generations.iter().enumerate() {
                output.push_str(&format!("Generation {}:\n", i));
                output.push_str(&GridFormatter::format_grid_compact(grid));
                output.push('\n');
            }
        } else {
            output.push_str("Initial State:\n");
            output.push_str(&GridFormatter::format_grid_compact(recording.initial()));
            output.push('\n');
            output.push_str(&format!("Final State (after {} generations):\n", recording.iterations()));
            output.push_str(&GridFormatter::format_grid_compact(recording.final_state()));
        }

        output
    }

    /// Save a recording in the requested format, returning the files written
    pub fn save_recording<P: AsRef<Path>>(
        recording: &Recording,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let mut written = Vec::new();

        match format {
            OutputFormat::Text => {
                let filepath = output_dir.join(format!("{}.txt", recording.metadata.id));
                std::fs::write(&filepath, Self::create_text_frames(recording))?;
                written.push(filepath);
            }
            OutputFormat::Json => {
                let filepath = output_dir.join(format!("{}.json", recording.metadata.id));
                recording.save_to_file(&filepath)?;
                written.push(filepath);

                let summary_path = output_dir.join("recording_summary.json");
                let summary_json = serde_json::to_string_pretty(&recording.summary())?;
                std::fs::write(&summary_path, summary_json)?;
                written.push(summary_path);
            }
            OutputFormat::Visual => {
                let filepath = output_dir.join(format!("{}_visual.txt", recording.metadata.id));
                std::fs::write(&filepath, Self::create_visual_evolution(recording))?;
                written.push(filepath);
            }
        }

        Ok(written)
    }

    /// Every generation in grid-file format, separated by comment headers
    fn create_text_frames(recording: &Recording) -> String {
        let mut output = String::new();

        for (i, grid) in recording.generations.iter().enumerate() {
            output.push_str(&format!("# generation {}\n", i));
            output.push_str(&grid_to_string(grid));
            output.push('\n');
        }

        output
    }

    /// Create a visual representation of the evolution
    fn create_visual_evolution(recording: &Recording) -> String {
        let mut output = String::new();

        output.push_str(&format!("Visual Evolution - Recording {}\n", recording.metadata.id));
        output.push_str(&"=".repeat(50));
        output.push('\n');

        for (i, grid) in recording.generations.iter().enumerate() {
            output.push_str(&format!("\nGeneration {} (Living: {}):\n", i, grid.living_count()));
            output.push_str(&GridFormatter::format_grid_with_coords(grid));
        }

        output.push_str("\nRecording Statistics:\n");
        output.push_str(&format!("Behavior: {}\n", recording.metadata.stability.label()));
        output.push_str(&format!("Frames per second: {}\n", recording.frames_per_second));
        output.push_str(&format!("Simulation Time: {:.3}s\n", recording.elapsed.as_secs_f64()));

        output
    }
}

/// Redraws a simulation in the terminal, one frame per generation
pub struct TerminalAnimation<W: Write> {
    out: W,
    interval: Duration,
}

impl TerminalAnimation<std::io::Stdout> {
    /// Animate on stdout with the given delay between frames
    pub fn stdout(interval: Duration) -> Self {
        Self::new(std::io::stdout(), interval)
    }
}

impl<W: Write> TerminalAnimation<W> {
    pub fn new(out: W, interval: Duration) -> Self {
        Self { out, interval }
    }

    /// Draw one frame, clearing the screen first
    pub fn draw(&mut self, generation: usize, grid: &Grid) -> std::io::Result<()> {
        write!(self.out, "\x1b[2J\x1b[H")?;
        writeln!(self.out, "Generation {} (Living: {})", generation, grid.living_count())?;
        write!(self.out, "{}", GridFormatter::format_grid_compact(grid))?;
        self.out.flush()
    }

    /// Play the simulation's remaining generations, returning every frame shown
    ///
    /// Frames are labeled with the simulation's own generation counter, so a
    /// simulation that has already advanced keeps its numbering.
    pub fn play(&mut self, simulation: &mut Simulation) -> Result<Vec<Grid>> {
        let mut frames = vec![simulation.grid().clone()];
        self.draw(simulation.generation(), simulation.grid())?;

        while let Some(grid) = simulation.step() {
            frames.push(grid.clone());
            if !self.interval.is_zero() {
                std::thread::sleep(self.interval);
            }
            let last = frames.len() - 1;
            self.draw(simulation.generation(), &frames[last])?;
        }

        Ok(frames)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

const REDRAW_EVERY: Duration = Duration::from_millis(100);

/// Single-line generation counter for runs without animation
pub struct ProgressIndicator {
    total: usize,
    generation: usize,
    started: Instant,
    last_draw: Instant,
}

impl ProgressIndicator {
    pub fn new(total: usize) -> Self {
        let now = Instant::now();
        Self {
            total,
            generation: 0,
            started: now,
            last_draw: now,
        }
    }

    /// Record the latest generation; redraws at most every 100ms
    pub fn update(&mut self, generation: usize) {
        self.generation = generation;
        if self.last_draw.elapsed() >= REDRAW_EVERY {
            self.last_draw = Instant::now();
            self.draw();
        }
    }

    fn line(&self) -> String {
        let secs = self.started.elapsed().as_secs_f64();
        let rate = if secs > 0.0 { self.generation as f64 / secs } else { 0.0 };
        format!("Generation {}/{} ({:.0} gen/s)", self.generation, self.total, rate)
    }

    fn draw(&self) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\r{}", self.line());
        let _ = out.flush();
    }

    /// Overwrite the counter with the final tally
    pub fn finish(&self) {
        println!("\r{} generations in {:.3}s", self.generation, self.started.elapsed().as_secs_f64());
    }
}

/// Status line colors, as ANSI foreground codes
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum Color {
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
}

/// Colored status lines; plain text under `NO_COLOR` or a dumb terminal
pub struct ColorOutput;

impl ColorOutput {
    pub fn paint(text: &str, color: Color) -> String {
        if Self::enabled() {
            format!("\x1b[{}m{}\x1b[0m", color as u8, text)
        } else {
            text.to_owned()
        }
    }

    fn enabled() -> bool {
        std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").map_or(true, |term| term != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::paint(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::paint(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::paint(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::paint(text, Color::Blue)
    }
}
