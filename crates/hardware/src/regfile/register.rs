//! Single memory-mapped register.
//!
//! A `Register` is one named, addressed, sized storage cell. It provides:
//! 1. **Identity:** Name and address (relative until attached, absolute afterwards).
//! 2. **Access Mode:** Read-only, write-only or read-write as seen from the bus.
//! 3. **Storage:** A value masked to the register width, with a reset value.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::{AccessType, BusError, Result, width_mask};

/// Access permitted to the bus controller.
///
/// Peripheral-side access (`RegisterFile::set_value`) ignores the mode; a
/// read-only status register is still updated by its peripheral.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum AccessMode {
    /// Controller may read but not write.
    #[serde(alias = "ro", alias = "RO", alias = "read-only")]
    ReadOnly,
    /// Controller may write but not read.
    #[serde(alias = "wo", alias = "WO", alias = "write-only")]
    WriteOnly,
    /// Controller may read and write.
    #[default]
    #[serde(alias = "rw", alias = "RW", alias = "read-write")]
    ReadWrite,
}

impl AccessMode {
    /// Returns whether the controller may read a register with this mode.
    pub const fn can_read(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    /// Returns whether the controller may write a register with this mode.
    pub const fn can_write(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }

    /// Returns whether the mode permits the given access direction.
    pub const fn permits(self, access: AccessType) -> bool {
        match access {
            AccessType::Read => self.can_read(),
            AccessType::Write => self.can_write(),
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "ro"),
            Self::WriteOnly => write!(f, "wo"),
            Self::ReadWrite => write!(f, "rw"),
        }
    }
}

/// Error returned when parsing an unknown access mode string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown access mode `{0}` (expected ro, wo or rw)")]
pub struct ParseAccessModeError(String);

impl FromStr for AccessMode {
    type Err = ParseAccessModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ro" | "r" | "read-only" => Ok(Self::ReadOnly),
            "wo" | "w" | "write-only" => Ok(Self::WriteOnly),
            "rw" | "read-write" => Ok(Self::ReadWrite),
            _ => Err(ParseAccessModeError(s.to_string())),
        }
    }
}

/// A named, addressed register.
///
/// The stored value is always masked to `width` bits. Cloning a register
/// copies its value, so attaching a register file yields an independent copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Register {
    name: String,
    address: u64,
    width: u32,
    mode: AccessMode,
    value: u64,
    reset: u64,
}

impl Register {
    /// Creates a register with a reset value of zero.
    ///
    /// # Arguments
    ///
    /// * `name` - Register name, unique within its file.
    /// * `address` - Offset relative to the owning register file.
    /// * `width` - Width in bits (validated when added to a file).
    /// * `mode` - Access permitted to the bus controller.
    pub fn new(name: impl Into<String>, address: u64, width: u32, mode: AccessMode) -> Self {
        Self {
            name: name.into(),
            address,
            width,
            mode,
            value: 0,
            reset: 0,
        }
    }

    /// Sets the reset value; the current value is reset to it as well.
    #[must_use]
    pub fn with_reset(mut self, reset: u64) -> Self {
        self.reset = reset & self.mask();
        self.value = self.reset;
        self
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register address (relative or absolute, depending on attachment).
    pub const fn address(&self) -> u64 {
        self.address
    }

    /// Width in bits.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Access mode seen by the controller.
    pub const fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Value the register returns to after a reset.
    pub const fn reset_value(&self) -> u64 {
        self.reset
    }

    /// Current value, regardless of access mode.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Mask covering the register width.
    pub const fn mask(&self) -> u64 {
        width_mask(self.width)
    }

    /// Reads the register on behalf of the bus controller.
    ///
    /// # Returns
    ///
    /// The stored value, or `AccessViolation` for a write-only register.
    pub fn read(&self) -> Result<u64> {
        self.check(AccessType::Read)?;
        Ok(self.value)
    }

    /// Writes the register on behalf of the bus controller.
    ///
    /// Bits above the register width are discarded.
    ///
    /// # Returns
    ///
    /// `Ok(())`, or `AccessViolation` for a read-only register.
    pub fn write(&mut self, value: u64) -> Result<()> {
        self.check(AccessType::Write)?;
        self.value = value & self.mask();
        Ok(())
    }

    /// Peripheral-side store that bypasses the access mode.
    pub const fn set(&mut self, value: u64) {
        self.value = value & width_mask(self.width);
    }

    /// Restores the reset value.
    pub const fn reset(&mut self) {
        self.value = self.reset;
    }

    /// Shifts the address by `base`; `None` on overflow.
    pub(crate) fn relocated(&self, base: u64) -> Option<u64> {
        self.address.checked_add(base)
    }

    pub(crate) const fn set_address(&mut self, address: u64) {
        self.address = address;
    }

    fn check(&self, access: AccessType) -> Result<()> {
        if self.mode.permits(access) {
            Ok(())
        } else {
            Err(BusError::AccessViolation {
                name: self.name.clone(),
                address: self.address,
                access,
                mode: self.mode,
            })
        }
    }
}
