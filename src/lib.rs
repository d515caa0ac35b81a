//! Conway's Game of Life on a fixed, edge-bounded grid
//!
//! The engine steps a grid one generation at a time and detects extinction;
//! the driver wraps it in a pausable tick loop that reseeds extinct grids.

pub mod config;
pub mod error;
pub mod game_of_life;
pub mod utils;

pub use config::Settings;
pub use error::GridError;
pub use game_of_life::{Grid, Runner, Simulation};
