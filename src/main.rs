//! Terminal front end for the Game of Life simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use game_of_life_reseed::{
    config::{CliOverrides, OutputFormat, Settings},
    game_of_life::{rules, Grid, Runner, Simulation, SystemClock},
    utils::{ColorOutput, GridFormatter, TerminalSink},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "game_of_life_reseed")]
#[command(about = "Conway's Game of Life with automatic reseeding")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation in the terminal
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Grid rows (overrides config)
        #[arg(long)]
        rows: Option<usize>,

        /// Grid columns (overrides config)
        #[arg(long)]
        cols: Option<usize>,

        /// Speed from 1 to 10 (overrides config)
        #[arg(short, long)]
        speed: Option<u32>,

        /// RNG seed for reproducible runs (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many generations (overrides config)
        #[arg(short, long)]
        generations: Option<u64>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create a default configuration file
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Print a few generations of a random grid without delays
    Step {
        #[arg(long, default_value_t = 10)]
        rows: usize,

        #[arg(long, default_value_t = 10)]
        cols: usize,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long, default_value_t = 3)]
        generations: usize,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config, rows, cols, speed, seed, generations, format, verbose
        } => {
            init_logging(verbose);
            let overrides = CliOverrides { rows, cols, seed, speed, generations, format };
            run_command(config, overrides)
        }
        Commands::Setup { directory, force } => {
            init_logging(false);
            setup_command(directory, force)
        }
        Commands::Step { rows, cols, seed, generations } => {
            init_logging(false);
            step_command(rows, cols, seed, generations)
        }
    }
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        log::info!("Config file {} not found, using defaults", config_path.display());
        Ok(Settings::default())
    }
}

fn run_command(config_path: PathBuf, overrides: CliOverrides) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate()
        .context("Configuration validation failed")?;

    log::info!(
        "Starting {}x{} grid at speed {}",
        settings.grid.rows, settings.grid.cols, settings.driver.speed
    );

    let sim = Simulation::new(&settings)
        .context("Failed to create simulation")?;
    let mut runner = Runner::new(sim, settings.driver.max_generations);

    let stdout = std::io::stdout();
    let mut sink = TerminalSink::new(stdout.lock(), settings.output.format, settings.output.show_stats);

    let start_time = Instant::now();
    let summary = runner.run(&mut SystemClock, &mut sink)?;

    if settings.output.format == OutputFormat::Json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("{}", ColorOutput::success(&format!(
            "Ran {} generations ({} reseeds) in {:.1}s, {} cells alive",
            summary.generations,
            summary.reseeds,
            start_time.elapsed().as_secs_f64(),
            summary.living_cells
        )));
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    let config_dir = directory.join("config");
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default().to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    println!("{}", ColorOutput::success("✅ Setup complete!"));
    println!("Run: cargo run -- run --config {}", config_path.display());

    Ok(())
}

fn step_command(rows: usize, cols: usize, seed: Option<u64>, generations: usize) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut grid = Grid::create_with_rng(rows, cols, true, &mut rng);

    for generation in 0..=generations {
        println!("{}", ColorOutput::info(&format!(
            "Generation {} (Living: {}):", generation, grid.living_count()
        )));
        println!("{}", GridFormatter::format_grid_with_coords(&grid));

        if rules::is_extinct(&grid) {
            println!("{}", ColorOutput::warning("All cells are dead."));
            break;
        }
        grid = rules::step(&grid);
    }

    Ok(())
}
