//! Main CLI application for the Game of Life simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use game_of_life_sim::{
    config::{BoundaryCondition, CliOverrides, InitialState, OutputFormat, PatternOffset, Settings},
    game_of_life::{load_grid_from_file, load_pattern_library, transition, write_pattern_files, PatternLibrary},
    simulation::{Recording, RecordingValidator, Simulation},
    utils::{ColorOutput, GridFormatter, ProgressIndicator, RecordingFormatter, TerminalAnimation},
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "game_of_life_sim")]
#[command(about = "Conway's Game of Life on a toroidal grid")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run(RunArgs),

    /// Create example configuration and pattern files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// List the available seed patterns, or print one
    Patterns {
        /// Pattern to print
        #[arg(short, long)]
        show: Option<String>,

        /// Directory of extra pattern files
        #[arg(short, long)]
        patterns_dir: Option<PathBuf>,
    },

    /// Show a grid file with its neighbor counts and next generations
    Inspect {
        /// Grid file (rows of 0 and 1)
        grid: PathBuf,

        /// Edge handling for neighbor counts
        #[arg(short, long, value_enum, default_value_t = BoundaryCondition::Wrap)]
        boundary: BoundaryCondition,

        /// Generations to step after the initial grid
        #[arg(short, long, default_value_t = 1)]
        generations: usize,
    },

    /// Check that a saved JSON recording follows the rules
    Verify {
        /// Recording file
        recording: PathBuf,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Grid rows (overrides config)
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns (overrides config)
    #[arg(long)]
    cols: Option<usize>,

    /// Number of generations (overrides config)
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Delay between animation frames in milliseconds (overrides config)
    #[arg(long)]
    interval: Option<u64>,

    /// Seed pattern name (overrides config)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Row of the pattern's top-left corner (overrides config)
    #[arg(long)]
    offset_row: Option<usize>,

    /// Column of the pattern's top-left corner (overrides config)
    #[arg(long)]
    offset_col: Option<usize>,

    /// Random fill seed (overrides config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Random fill probability (overrides config)
    #[arg(long)]
    probability: Option<f64>,

    /// Output directory; saves the recording when given
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Recording format (overrides config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Draw each generation in the terminal
    #[arg(short, long)]
    animate: bool,

    /// Show every generation in the summary
    #[arg(long)]
    show_evolution: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Commands::Run(args) if args.verbose);
    init_tracing(verbose);

    match cli.command {
        Commands::Run(args) => run_command(args),
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Patterns { show, patterns_dir } => patterns_command(show, patterns_dir),
        Commands::Inspect { grid, boundary, generations } => {
            inspect_command(grid, boundary, generations)
        }
        Commands::Verify { recording } => verify_command(recording),
    }
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flag
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Ok(Settings::default())
    }
}

fn run_command(args: RunArgs) -> Result<()> {
    println!("{}", ColorOutput::info("🔄 Starting Game of Life simulation"));

    let mut settings = load_settings(&args.config)?;

    let cli_overrides = CliOverrides {
        rows: args.rows,
        cols: args.cols,
        iterations: args.iterations,
        interval_ms: args.interval,
        pattern: args.pattern.clone(),
        offset_row: args.offset_row,
        offset_col: args.offset_col,
        probability: args.probability,
        seed: args.seed,
        output_dir: args.output.clone(),
        format: args.format,
    };
    settings.merge_with_cli(&cli_overrides)
        .context("Invalid command line overrides")?;

    if args.verbose {
        println!("Configuration:");
        println!("  Grid: {}x{} ({:?} edges)", settings.grid.rows, settings.grid.cols,
                 settings.grid.boundary_condition);
        println!("  Initial state: {:?}", settings.initial);
        println!("  Iterations: {}", settings.simulation.iterations);
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    settings.validate()
        .context("Configuration validation failed")?;

    let library = load_pattern_library(settings.patterns.directory.as_ref())?;
    let mut simulation = Simulation::from_settings(&settings, &library)
        .context("Failed to build initial grid")?;

    let start_time = Instant::now();
    let generations = if args.animate {
        let interval = Duration::from_millis(settings.simulation.interval_ms);
        TerminalAnimation::stdout(interval).play(&mut simulation)?
    } else {
        let mut generations = vec![simulation.grid().clone()];
        let mut progress = ProgressIndicator::new(simulation.iterations());
        simulation.run(|generation, grid| {
            generations.push(grid.clone());
            progress.update(generation);
        });
        progress.finish();
        generations
    };
    let recording = Recording::new(generations, start_time.elapsed())
        .with_frame_rate(settings.output.frames_per_second);

    println!("{}", ColorOutput::success(&format!(
        "✅ Simulated {} generation(s) in {:.3}s",
        recording.iterations(),
        recording.elapsed.as_secs_f64()
    )));
    println!("\n{}", RecordingFormatter::format_recording(&recording, args.show_evolution));

    if settings.output.save_recording {
        println!("{}", ColorOutput::info("💾 Saving recording..."));
        let written = RecordingFormatter::save_recording(
            &recording,
            &settings.output.output_directory,
            settings.output.format,
        )
        .context("Failed to save recording")?;

        for path in written {
            println!("Created: {}", path.display());
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let patterns_dir = directory.join("patterns");
    let output_dir = directory.join("output/recordings");

    for dir in [&config_dir, &patterns_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default().to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    let library = PatternLibrary::standard();
    write_pattern_files(&library, &patterns_dir)
        .context("Failed to write pattern files")?;
    println!("Created {} pattern files in: {}", library.len(), patterns_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut glider = Settings::default();
    glider.grid.rows = 32;
    glider.grid.cols = 32;
    glider.initial = InitialState::Pattern {
        name: "glider".to_string(),
        offset: PatternOffset { row: 1, col: 1 },
    };
    glider.simulation.iterations = 128;
    glider.to_file(&examples_dir.join("glider.yaml"))?;

    let mut gun = Settings::default();
    gun.initial = InitialState::Pattern {
        name: "glider_gun".to_string(),
        offset: PatternOffset { row: 50, col: 10 },
    };
    gun.simulation.iterations = 300;
    gun.to_file(&examples_dir.join("glider_gun.yaml"))?;

    let mut random = Settings::default();
    random.initial = InitialState::Random { probability: 0.3, seed: Some(42) };
    random.output.save_recording = true;
    random.output.format = OutputFormat::Json;
    random.to_file(&examples_dir.join("random.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your own patterns to {}", patterns_dir.display());
    println!("3. Run: cargo run -- run --config config/examples/glider.yaml --animate");

    Ok(())
}

fn patterns_command(show: Option<String>, patterns_dir: Option<PathBuf>) -> Result<()> {
    let library = load_pattern_library(patterns_dir.as_ref())?;

    if let Some(name) = show {
        let pattern = library.require(&name)?;
        println!("{} ({}x{}, {} living cells):", pattern.name(), pattern.rows(),
                 pattern.cols(), pattern.living_count());
        let grid = pattern.to_grid(BoundaryCondition::Dead)?;
        println!("{}", GridFormatter::format_grid_compact(&grid));
        return Ok(());
    }

    println!("{}", ColorOutput::info(&format!("{} patterns available:", library.len())));
    for pattern in library.iter() {
        println!("  {:<20} {:>3}x{:<3} {:>3} cells",
                 pattern.name(), pattern.rows(), pattern.cols(), pattern.living_count());
    }

    Ok(())
}

fn inspect_command(grid_path: PathBuf, boundary: BoundaryCondition, generations: usize) -> Result<()> {
    println!("{}", ColorOutput::info("🔬 Inspecting grid..."));

    let mut grid = load_grid_from_file(&grid_path, boundary)
        .with_context(|| format!("Failed to load grid from {}", grid_path.display()))?;

    println!("Grid ({}x{}):", grid.rows(), grid.cols());
    println!("{}", GridFormatter::format_grid_with_coords(&grid));

    println!("Grid Statistics:");
    println!("  Living cells: {}", grid.living_count());
    println!("  Density: {:.1}%", grid.density() * 100.0);

    println!("\nNeighbor counts:");
    println!("{}", GridFormatter::format_neighbor_counts(&grid.neighbor_counts()));

    for generation in 1..=generations {
        grid = transition(&grid);
        println!("Generation {} (Living: {}):", generation, grid.living_count());
        println!("{}", GridFormatter::format_grid_compact(&grid));
    }

    Ok(())
}

fn verify_command(recording_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("🔍 Verifying recording..."));

    let recording = Recording::load_from_file(&recording_path)
        .with_context(|| format!("Failed to load recording from {}", recording_path.display()))?;

    println!("{}", recording.summary());
    let result = RecordingValidator::new().validate(&recording);
    println!("{}", result);

    if result.is_valid {
        println!("{}", ColorOutput::success("✅ Recording follows the rules"));
    } else {
        println!("{}", ColorOutput::error("❌ Recording is invalid"));
        if let Some(error) = result.error_message {
            println!("Error: {}", error);
        }
    }

    Ok(())
}
