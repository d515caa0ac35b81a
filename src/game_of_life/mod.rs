//! Game of Life core functionality

pub mod grid;
pub mod rules;
pub mod driver;

pub use grid::{Grid, ALIVE_PROBABILITY};
pub use rules::{count_neighbors, is_extinct, should_be_alive, step, step_n};
pub use driver::{
    Clock, ControlHandle, FrameSink, RunSummary, Runner, Simulation, SystemClock, TickOutcome,
};
