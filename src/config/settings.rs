//! Configuration settings for the Game of Life simulator

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Slowest selectable speed
pub const MIN_SPEED: u32 = 1;
/// Fastest selectable speed
pub const MAX_SPEED: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub grid: GridConfig,
    pub driver: DriverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub density: f64,
    /// Fixed RNG seed; random entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    pub speed: u32,
    pub reseed_delay_ms: u64,
    #[serde(default)]
    pub max_generations: Option<u64>,
    #[serde(default)]
    pub start_paused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Visual,
    Compact,
    Json,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 50,
            cols: 50,
            density: crate::game_of_life::ALIVE_PROBABILITY,
            seed: None,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            speed: 5,
            reseed_delay_ms: 3000,
            max_generations: None,
            start_paused: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Visual,
            show_stats: true,
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
        log::debug!("Loaded configuration from {}", path.display());
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
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.driver.speed) {
            anyhow::bail!(
                "Speed must be between {} and {}, got {}",
                MIN_SPEED, MAX_SPEED, self.driver.speed
            );
        }

        if !(0.0..=1.0).contains(&self.grid.density) {
            anyhow::bail!("Density must be within [0, 1], got {}", self.grid.density);
        }

        if self.grid.rows == 0 || self.grid.cols == 0 {
            log::warn!(
                "Grid is {}x{}; every generation will be extinct",
                self.grid.rows, self.grid.cols
            );
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(rows) = cli_overrides.rows {
            self.grid.rows = rows;
        }
        if let Some(cols) = cli_overrides.cols {
            self.grid.cols = cols;
        }
        if let Some(seed) = cli_overrides.seed {
            self.grid.seed = Some(seed);
        }
        if let Some(speed) = cli_overrides.speed {
            self.driver.speed = speed;
        }
        if let Some(generations) = cli_overrides.generations {
            self.driver.max_generations = Some(generations);
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub seed: Option<u64>,
    pub speed: Option<u32>,
    pub generations: Option<u64>,
    pub format: Option<OutputFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_reference_driver() {
        let settings = Settings::default();
        assert_eq!(settings.grid.rows, 50);
        assert_eq!(settings.grid.cols, 50);
        assert_eq!(settings.driver.speed, 5);
        assert_eq!(settings.driver.reseed_delay_ms, 3000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.grid.seed = Some(99);
        settings.output.format = OutputFormat::Json;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_optional_fields_default() {
        let yaml = "\
grid:
  rows: 10
  cols: 12
  density: 0.3
driver:
  speed: 2
  reseed_delay_ms: 500
output:
  format: compact
  show_stats: false
";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.grid.seed, None);
        assert_eq!(settings.driver.max_generations, None);
        assert!(!settings.driver.start_paused);
        assert_eq!(settings.output.format, OutputFormat::Compact);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.driver.speed = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.driver.speed = 11;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.grid.density = -0.1;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.grid.rows = 0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            rows: Some(8),
            speed: Some(10),
            generations: Some(25),
            ..Default::default()
        });

        assert_eq!(settings.grid.rows, 8);
        assert_eq!(settings.grid.cols, 50);
        assert_eq!(settings.driver.speed, 10);
        assert_eq!(settings.driver.max_generations, Some(25));
    }
}
