//! Simulation configuration
//!
//! Read from a TOML file; every table and key is optional and falls back to
//! the defaults below. Command line flags are applied on top by the binary.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::simulation::{SimError, DEFAULT_CAPACITY, DEFAULT_TRAVEL_TIME_MS};

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SimConfig {
    pub building: BuildingConfig,
    pub elevator: ElevatorConfig,
    pub driver: DriverConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BuildingConfig {
    pub floors: usize,
    pub elevators: usize,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            floors: 10,
            elevators: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub capacity: usize,
    pub travel_time_ms: u64,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            travel_time_ms: DEFAULT_TRAVEL_TIME_MS,
        }
    }
}

impl ElevatorConfig {
    pub fn travel_time(&self) -> Duration {
        Duration::from_millis(self.travel_time_ms)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DriverConfig {
    /// Pause between two ticks of the background driver
    pub tick_interval_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 250,
        }
    }
}

impl DriverConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl SimConfig {
    /// Reject configurations the simulation cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.building.floors == 0 {
            return Err(SimError::Configuration("floor count must be positive".to_string()).into());
        }
        if self.building.elevators == 0 {
            return Err(
                SimError::Configuration("elevator count must be positive".to_string()).into(),
            );
        }
        if self.elevator.capacity == 0 {
            return Err(
                SimError::Configuration("elevator capacity must be positive".to_string()).into(),
            );
        }
        Ok(())
    }
}

pub fn parse_config(config_str: &str) -> Result<SimConfig> {
    toml::from_str(config_str).context("Failed to parse configuration")
}

pub fn load_config(path: &Path) -> Result<SimConfig> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    parse_config(&config_str)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}
