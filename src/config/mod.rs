//! Configuration management for the Game of Life simulator

pub mod settings;

pub use settings::{
    Settings, GridConfig, DriverConfig, OutputConfig, OutputFormat, CliOverrides,
    MIN_SPEED, MAX_SPEED,
};
