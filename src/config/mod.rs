pub mod path;

use std::{io, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    constants::{DEFAULT_DATA_PINS, DEFAULT_POLL_INTERVAL_MS},
    drivers::n64::{driver::Timing, tty::DEFAULT_BAUD_RATE},
    input::target::SinkKind,
};

/// Upper bound for every timing value. Transfers busy-wait, so each wait
/// has to stay short.
pub const MAX_TIMING_US: u64 = 10_000;

/// Represents all possible errors loading an [AdapterConfig]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where the transceiver channels come from
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Serial bridge per data pin
    #[default]
    Tty,
    /// Software controllers, no hardware required
    Emulated,
}

/// Adapter configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct AdapterConfig {
    pub version: u32,
    pub kind: String,
    pub name: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default)]
    pub sink: SinkKind,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default = "default_lanes")]
    pub lanes: Vec<LaneConfig>,
    /// Instruction memory used by one copy of the transceiver program
    #[serde(default = "default_program_length")]
    pub program_length: u8,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Sysfs LED directory used for the adapter status
    pub status_led: Option<String>,
    #[serde(default = "default_ports")]
    pub ports: Vec<PortConfig>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            kind: "AdapterConfig".to_string(),
            name: "N64 Controller Adapter".to_string(),
            poll_interval_ms: default_poll_interval_ms(),
            backend: BackendKind::default(),
            sink: SinkKind::default(),
            timing: TimingConfig::default(),
            lanes: default_lanes(),
            program_length: default_program_length(),
            baud_rate: default_baud_rate(),
            status_led: None,
            ports: default_ports(),
        }
    }
}

impl AdapterConfig {
    /// Load an [AdapterConfig] from the given YAML string
    pub fn from_yaml(content: String) -> Result<AdapterConfig, LoadError> {
        let config: AdapterConfig = serde_yaml::from_str(content.as_str())?;
        config.validate()?;
        Ok(config)
    }

    /// Load an [AdapterConfig] from the given YAML file
    pub fn from_yaml_file(path: String) -> Result<AdapterConfig, LoadError> {
        let file = std::fs::File::open(path)?;
        let config: AdapterConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config from the given path, or from the first config file
    /// found in the config search paths. Falls back to the defaults.
    pub fn load(path: Option<PathBuf>) -> Result<AdapterConfig, LoadError> {
        if let Some(path) = path {
            return Self::from_yaml_file(path.to_string_lossy().to_string());
        }
        let Some(path) = path::find_config_file() else {
            log::info!("No config file found. Using defaults.");
            return Ok(Self::default());
        };
        log::info!("Loading config from {path:?}");
        Self::from_yaml_file(path.to_string_lossy().to_string())
    }

    /// Checks values serde cannot check on its own
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.poll_interval_ms == 0 {
            return Err(LoadError::Invalid("poll_interval_ms must be at least 1".into()));
        }
        if self.program_length == 0 {
            return Err(LoadError::Invalid("program_length must be at least 1".into()));
        }
        let timing = [
            ("byte_timeout_us", self.timing.byte_timeout_us),
            ("settle_per_byte_us", self.timing.settle_per_byte_us),
            ("settle_floor_us", self.timing.settle_floor_us),
        ];
        for (name, value) in timing {
            if value > MAX_TIMING_US {
                return Err(LoadError::Invalid(format!(
                    "timing.{name} must be at most {MAX_TIMING_US}"
                )));
            }
        }
        for (i, port) in self.ports.iter().enumerate() {
            let duplicate = self.ports[..i].iter().any(|other| other.pin == port.pin);
            if duplicate {
                return Err(LoadError::Invalid(format!(
                    "GP{} is used by more than one port",
                    port.pin
                )));
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Transfer timing in microseconds
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimingConfig {
    pub byte_timeout_us: u64,
    pub settle_per_byte_us: u64,
    pub settle_floor_us: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            byte_timeout_us: 600,
            settle_per_byte_us: 4,
            settle_floor_us: 450,
        }
    }
}

impl From<TimingConfig> for Timing {
    fn from(config: TimingConfig) -> Self {
        Self {
            byte_timeout: Duration::from_micros(config.byte_timeout_us),
            settle_per_byte: Duration::from_micros(config.settle_per_byte_us),
            settle_floor: Duration::from_micros(config.settle_floor_us),
        }
    }
}

/// A hardware lane that can host transceiver programs
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LaneConfig {
    /// Instruction memory available for programs
    pub program_space: u8,
    /// Number of execution slots
    pub slots: u8,
}

/// A controller port
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PortConfig {
    /// Data pin of the port
    pub pin: u8,
    /// TTY device of the serial bridge for this port
    pub device: Option<String>,
    /// Sysfs LED directory lit while a controller is connected
    pub led: Option<String>,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_lanes() -> Vec<LaneConfig> {
    vec![
        LaneConfig {
            program_space: 32,
            slots: 4,
        },
        LaneConfig {
            program_space: 32,
            slots: 4,
        },
    ]
}

fn default_program_length() -> u8 {
    20
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_ports() -> Vec<PortConfig> {
    DEFAULT_DATA_PINS
        .iter()
        .enumerate()
        .map(|(i, pin)| PortConfig {
            pin: *pin,
            device: Some(format!("/dev/ttyACM{i}")),
            led: None,
        })
        .collect()
}
