//! JSON configuration for solver runs

use crate::direct::{DEFAULT_ZERO_THRESHOLD, GesppConfig, GesppError};
use crate::io::DEFAULT_PRECISION;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid solver configuration: {0}")]
    Solver(#[from] GesppError),
}

/// Complete run configuration loaded from JSON
///
/// Every section and field is optional:
///
/// ```json
/// {
///   "solver": { "zero_threshold": 1e-12, "print_interval": 0 },
///   "output": { "precision": 6, "print_system": true }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Solver configuration
    #[serde(default)]
    pub solver: SolverConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Solver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Scaled pivot magnitude at or below which the system is singular
    #[serde(default = "default_zero_threshold")]
    pub zero_threshold: f64,
    /// Log progress every N elimination stages (0 = no output)
    #[serde(default)]
    pub print_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            zero_threshold: default_zero_threshold(),
            print_interval: 0,
        }
    }
}

fn default_zero_threshold() -> f64 {
    DEFAULT_ZERO_THRESHOLD
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Digits after the decimal point in the written solution
    #[serde(default = "default_precision")]
    pub precision: usize,
    /// Print the augmented system before solving
    #[serde(default = "default_print_system")]
    pub print_system: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            print_system: default_print_system(),
        }
    }
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}

fn default_print_system() -> bool {
    true
}

impl RunConfig {
    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Save configuration to JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Convert to a validated solver configuration
    pub fn to_gespp_config(&self) -> Result<GesppConfig<f64>, ConfigError> {
        let config = GesppConfig {
            zero_threshold: self.solver.zero_threshold,
            print_interval: self.solver.print_interval,
        };
        config.validate()?;
        Ok(config)
    }
}
