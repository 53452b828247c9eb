//! Configuration system for the bus model.
//!
//! This module defines the configuration structures used to build a system. It provides:
//! 1. **Defaults:** Baseline bus widths, acknowledgment timeout and wait states.
//! 2. **Structures:** Bus parameters, register file templates and peripheral attachments.
//! 3. **Loading:** JSON parsing from a string or a file, followed by validation.
//!
//! Bus parameters are fixed once an `AddressSpace` is constructed from them.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::common::BusError;
use crate::common::constants::{MAX_WIDTH, TOMAX};
use crate::regfile::AccessMode;

/// Default configuration constants for the bus model.
mod defaults {
    use super::TOMAX;

    /// Data bus width in bits.
    pub const DATA_WIDTH: u32 = 8;

    /// Address bus width in bits.
    pub const ADDRESS_WIDTH: u32 = 16;

    /// Clock ticks the controller waits for an acknowledgment.
    pub const TIMEOUT_TICKS: u32 = TOMAX;

    /// Ticks a peripheral holds off its acknowledgment after the strobe is seen.
    pub const WAIT_STATES: u32 = 0;
}

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration text is not valid JSON for this schema.
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration parsed but is inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A register file template or attachment was rejected.
    #[error("failed to compose address space: {0}")]
    Bus(#[from] BusError),
}

/// Bus parameters shared by the address space and the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BusConfig {
    /// Data bus width in bits
    #[serde(default = "BusConfig::default_data_width")]
    pub data_width: u32,

    /// Address bus width in bits
    #[serde(default = "BusConfig::default_address_width")]
    pub address_width: u32,

    /// Clock ticks to wait for an acknowledgment before aborting
    #[serde(default = "BusConfig::default_timeout_ticks")]
    pub timeout_ticks: u32,

    /// Acknowledgment delay in ticks applied by `WaitStateBus`
    #[serde(default = "BusConfig::default_wait_states")]
    pub wait_states: u32,
}

impl BusConfig {
    /// Creates a bus configuration with the default timeout and no wait states.
    pub const fn new(data_width: u32, address_width: u32) -> Self {
        Self {
            data_width,
            address_width,
            timeout_ticks: defaults::TIMEOUT_TICKS,
            wait_states: defaults::WAIT_STATES,
        }
    }

    /// Returns the configuration with a different timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ticks: u32) -> Self {
        self.timeout_ticks = timeout_ticks;
        self
    }

    /// Returns the configuration with a different acknowledgment delay.
    #[must_use]
    pub const fn with_wait_states(mut self, wait_states: u32) -> Self {
        self.wait_states = wait_states;
        self
    }

    /// Checks widths and timeout.
    ///
    /// # Returns
    ///
    /// `ConfigError::Invalid` if a width is outside `1..=64` or the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_width == 0 || self.data_width > MAX_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "data_width {} outside 1..={MAX_WIDTH}",
                self.data_width
            )));
        }
        if self.address_width == 0 || self.address_width > MAX_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "address_width {} outside 1..={MAX_WIDTH}",
                self.address_width
            )));
        }
        if self.timeout_ticks == 0 {
            return Err(ConfigError::Invalid("timeout_ticks must be at least 1".into()));
        }
        Ok(())
    }

    /// Returns the default data bus width.
    const fn default_data_width() -> u32 {
        defaults::DATA_WIDTH
    }

    /// Returns the default address bus width.
    const fn default_address_width() -> u32 {
        defaults::ADDRESS_WIDTH
    }

    /// Returns the default acknowledgment timeout.
    const fn default_timeout_ticks() -> u32 {
        defaults::TIMEOUT_TICKS
    }

    /// Returns the default acknowledgment delay.
    const fn default_wait_states() -> u32 {
        defaults::WAIT_STATES
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::new(defaults::DATA_WIDTH, defaults::ADDRESS_WIDTH)
    }
}

/// One register of a register file template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterConfig {
    /// Register name
    pub name: String,
    /// Offset within the register file
    pub address: u64,
    /// Width in bits
    pub width: u32,
    /// Access mode (`ro`, `wo`, `rw`)
    #[serde(default)]
    pub mode: AccessMode,
    /// Value after reset
    #[serde(default)]
    pub reset: u64,
}

/// Register file template, declared once per peripheral type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterFileConfig {
    /// Template name referenced by peripherals
    pub name: String,
    /// Registers in declaration order
    #[serde(default)]
    pub registers: Vec<RegisterConfig>,
}

/// Attachment of a register file template to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PeripheralConfig {
    /// Base name of the attachment (suffixed `_000`, `_001`, ... on the bus)
    #[serde(default)]
    pub name: String,
    /// Name of the register file template
    pub regfile: String,
    /// Base address added to every register offset
    #[serde(default)]
    pub base_address: u64,
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use mmbus_core::config::Config;
///
/// let json = r#"{
///     "bus": { "data_width": 8, "address_width": 16 },
///     "regfiles": [
///         { "name": "led", "registers": [
///             { "name": "select", "address": 0, "width": 8, "mode": "rw" }
///         ] }
///     ],
///     "peripherals": [
///         { "name": "led", "regfile": "led", "base_address": 33344 }
///     ]
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.bus.timeout_ticks, 33);
/// assert_eq!(config.peripherals[0].base_address, 0x8240);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Bus widths and timing
    #[serde(default)]
    pub bus: BusConfig,
    /// Register file templates
    #[serde(default)]
    pub regfiles: Vec<RegisterFileConfig>,
    /// Attachments, applied in order
    #[serde(default)]
    pub peripherals: Vec<PeripheralConfig>,
}

impl Config {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Looks up a register file template by name.
    pub fn regfile(&self, name: &str) -> Option<&RegisterFileConfig> {
        self.regfiles.iter().find(|r| r.name == name)
    }

    /// Checks bus parameters and that every peripheral names a known template.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bus.validate()?;
        for (i, tmpl) in self.regfiles.iter().enumerate() {
            if self.regfiles[..i].iter().any(|r| r.name == tmpl.name) {
                return Err(ConfigError::Invalid(format!(
                    "register file `{}` declared twice",
                    tmpl.name
                )));
            }
        }
        for per in &self.peripherals {
            if self.regfile(&per.regfile).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "peripheral `{}` references unknown register file `{}`",
                    per.name, per.regfile
                )));
            }
        }
        Ok(())
    }
}
