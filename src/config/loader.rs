use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::sensor::SensorConfig;
use crate::cli::{CliArgs, Command};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sensor: SensorConfig,
    pub header: HeaderConfig,
    pub timestamp: TimestampConfig,
    pub output: OutputConfig,
}

/// Constant fields stamped into every container frame header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub magic: u32,
    pub flags: u32,
    pub camera_id: u16,
    pub hardware_id: u16,
    pub exposure: u32,
    pub tag: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            magic: 0x5243_4446,
            flags: 0,
            camera_id: 1,
            hardware_id: 0,
            exposure: 0,
            tag: String::from("ALLSKY1"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampConfig {
    /// Frames captured before this hour belong to the day after the directory date.
    pub rollover_hour: u32,
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self { rollover_hour: 16 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceOrder {
    /// Sort by derived capture time, ties broken by filename.
    Chronological,
    /// Keep whatever order the file system lists entries in.
    Listing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub raw_extension: String,
    pub container_extension: String,
    pub order: SequenceOrder,
    pub atomic: bool,
    pub write_index: bool,
    pub rotate_180: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            raw_extension: String::from("raw"),
            container_extension: String::from("rcd"),
            order: SequenceOrder::Chronological,
            atomic: true,
            write_index: false,
            rotate_180: false,
        }
    }
}

impl Config {
    pub fn load(cli_args: &CliArgs) -> Result<Self> {
        let mut config = match cli_args.config.as_deref() {
            Some(path) => Self::from_file(Path::new(path))?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => {
                info!("No configuration file found, using built-in defaults");
                Self::default()
            }
        };

        config.override_with_cli_args(cli_args);

        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());

        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    fn override_with_cli_args(&mut self, args: &CliArgs) {
        if let Some(bit_depth) = args.bit_depth {
            self.sensor.bit_depth = bit_depth;
        }
        if let Some(rollover_hour) = args.rollover_hour {
            self.timestamp.rollover_hour = rollover_hour;
        }
        if args.listing_order {
            warn!("Using directory listing order; sequence indices may not be chronological");
            self.output.order = SequenceOrder::Listing;
        }
        if args.no_atomic {
            self.output.atomic = false;
        }

        match &args.command {
            Command::Container { index: true, .. } => self.output.write_index = true,
            Command::Convert { rotate: true, .. } => self.output.rotate_180 = true,
            _ => {}
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.sensor
            .validate()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid sensor configuration")?;

        if self.header.tag.len() != 7 || !self.header.tag.is_ascii() {
            return Err(anyhow::anyhow!(
                "Header tag must be exactly 7 ASCII characters, got {:?}",
                self.header.tag
            ));
        }

        if self.timestamp.rollover_hour > 24 {
            return Err(anyhow::anyhow!(
                "Rollover hour must be between 0 and 24, got {}",
                self.timestamp.rollover_hour
            ));
        }

        if self.output.raw_extension.is_empty() || self.output.container_extension.is_empty() {
            return Err(anyhow::anyhow!("File extensions cannot be empty"));
        }

        Ok(())
    }
}
