//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::game_of_life::{rules, FrameSink, Grid, Simulation};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// Format grids for console output
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid in compact form
    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = String::with_capacity(grid.rows() * (grid.cols() + 1));
        for row in grid.iter_rows() {
            for &cell in row {
                output.push(if cell { '█' } else { '·' });
            }
            output.push('\n');
        }
        output
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for x in 0..grid.cols() {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        for (y, row) in grid.iter_rows().enumerate() {
            output.push_str(&format!("{:2} ", y));
            for &cell in row {
                output.push_str(if cell { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// One-line status for a running simulation
    pub fn format_status(sim: &Simulation) -> String {
        let grid = sim.grid();
        let mut status = format!(
            "Generation {} | Living: {} ({:.1}%) | Speed: {}% | Reseeds: {}",
            sim.generation(),
            grid.living_count(),
            grid.density() * 100.0,
            sim.speed_percent(),
            sim.reseeds(),
        );
        if sim.is_paused() {
            status.push_str(" | Paused");
        }
        status
    }
}

/// Machine-readable snapshot of one generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport<'a> {
    pub generation: u64,
    pub total_generations: u64,
    pub living_cells: usize,
    pub density: f64,
    pub extinct: bool,
    pub reseeds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
    pub grid: &'a Grid,
}

impl<'a> GenerationReport<'a> {
    pub fn from_simulation(sim: &'a Simulation) -> Self {
        let grid = sim.grid();
        Self {
            generation: sim.generation(),
            total_generations: sim.total_generations(),
            living_cells: grid.living_count(),
            density: grid.density(),
            extinct: rules::is_extinct(grid),
            reseeds: sim.reseeds(),
            message: sim.message(),
            grid,
        }
    }
}

/// Renders each generation to a writer in the configured format
pub struct TerminalSink<W: Write> {
    out: W,
    format: OutputFormat,
    show_stats: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, format: OutputFormat, show_stats: bool) -> Self {
        Self { out, format, show_stats }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn frame(&mut self, sim: &Simulation) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let line = serde_json::to_string(&GenerationReport::from_simulation(sim))
                    .context("Failed to serialize generation report")?;
                writeln!(self.out, "{}", line)?;
            }
            OutputFormat::Visual => {
                // clear screen and home the cursor
                write!(self.out, "\x1b[2J\x1b[H")?;
                write!(self.out, "{}", GridFormatter::format_grid_with_coords(sim.grid()))?;
            }
            OutputFormat::Compact => {
                write!(self.out, "{}", GridFormatter::format_grid_compact(sim.grid()))?;
            }
        }

        if self.format != OutputFormat::Json {
            if self.show_stats {
                writeln!(self.out, "{}", GridFormatter::format_status(sim))?;
            }
            if let Some(message) = sim.message() {
                writeln!(self.out, "{}", ColorOutput::warning(message))?;
            }
        }

        self.out.flush().context("Failed to flush output")?;
        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
