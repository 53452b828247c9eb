//! Register file of one peripheral.
//!
//! A `RegisterFile` is the ordered set of registers a peripheral exposes. It provides:
//! 1. **Construction:** `add_register` with per-file address and name uniqueness.
//! 2. **Dispatch:** Controller reads and writes resolved by exact address match.
//! 3. **Peripheral Access:** By-name value access that ignores the access mode.
//! 4. **Relocation:** The address offset applied when a copy is attached to an address space.

use crate::common::constants::MAX_WIDTH;
use crate::common::{BusError, Result};
use crate::config::RegisterFileConfig;

use super::register::Register;

/// Ordered collection of registers, indexed by name and address.
///
/// Registers keep insertion order. `Clone` produces a deep copy, which is how an
/// address space gives each attachment its own independently addressed instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    registers: Vec<Register>,
}

impl RegisterFile {
    /// Creates an empty register file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a register file template from its configuration.
    ///
    /// # Returns
    ///
    /// The populated file, or the first error raised by `add_register`.
    pub fn from_config(config: &RegisterFileConfig) -> Result<Self> {
        let mut file = Self::new();
        for reg in &config.registers {
            file.add_register(
                Register::new(reg.name.clone(), reg.address, reg.width, reg.mode)
                    .with_reset(reg.reset),
            )?;
        }
        Ok(file)
    }

    /// Adds a register to the file.
    ///
    /// # Arguments
    ///
    /// * `register` - Register with an address relative to this file.
    ///
    /// # Returns
    ///
    /// `DuplicateAddress` if another register already sits at the address,
    /// `DuplicateName` if the name is taken, `InvalidWidth` for a width outside
    /// `1..=64`.
    pub fn add_register(&mut self, register: Register) -> Result<()> {
        if register.width() == 0 || register.width() > MAX_WIDTH {
            return Err(BusError::InvalidWidth {
                name: register.name().to_string(),
                width: register.width(),
                max: MAX_WIDTH,
            });
        }
        if let Some(existing) = self.find(register.address()) {
            return Err(BusError::DuplicateAddress {
                address: register.address(),
                owner: existing.name().to_string(),
            });
        }
        if self.get(register.name()).is_some() {
            return Err(BusError::DuplicateName(register.name().to_string()));
        }
        self.registers.push(register);
        Ok(())
    }

    /// Number of registers.
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// Returns whether the file has no registers.
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Iterates registers in insertion order.
    pub fn registers(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter()
    }

    /// Looks up a register by name.
    pub fn get(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name() == name)
    }

    /// Lowest and highest register address, or `None` for an empty file.
    pub fn address_range(&self) -> Option<(u64, u64)> {
        let lo = self.registers.iter().map(Register::address).min()?;
        let hi = self.registers.iter().map(Register::address).max()?;
        Some((lo, hi))
    }

    /// Returns whether `address` lies within the file's address range.
    ///
    /// The range may contain holes; containment does not imply a register
    /// decodes at the address.
    pub fn contains(&self, address: u64) -> bool {
        self.address_range()
            .is_some_and(|(lo, hi)| (lo..=hi).contains(&address))
    }

    /// Resolves the register at an exact address.
    ///
    /// # Returns
    ///
    /// The register, or `UnmappedAddress` if none matches.
    pub fn lookup(&self, address: u64) -> Result<&Register> {
        self.find(address).ok_or(BusError::UnmappedAddress(address))
    }

    /// Controller-side read at `address`.
    ///
    /// # Returns
    ///
    /// The register value; `UnmappedAddress` on a decode miss or
    /// `AccessViolation` for a write-only register.
    pub fn read(&self, address: u64) -> Result<u64> {
        self.lookup(address)?.read()
    }

    /// Controller-side write at `address`.
    ///
    /// # Returns
    ///
    /// `UnmappedAddress` on a decode miss or `AccessViolation` for a
    /// read-only register.
    pub fn write(&mut self, address: u64, value: u64) -> Result<()> {
        self.registers
            .iter_mut()
            .find(|r| r.address() == address)
            .ok_or(BusError::UnmappedAddress(address))?
            .write(value)
    }

    /// Peripheral-side read by name, ignoring the access mode.
    pub fn value(&self, name: &str) -> Option<u64> {
        self.get(name).map(Register::value)
    }

    /// Peripheral-side store by name, ignoring the access mode.
    ///
    /// # Returns
    ///
    /// `true` if a register with that name exists.
    pub fn set_value(&mut self, name: &str, value: u64) -> bool {
        match self.registers.iter_mut().find(|r| r.name() == name) {
            Some(reg) => {
                reg.set(value);
                true
            }
            None => false,
        }
    }

    /// Restores every register to its reset value.
    pub fn reset(&mut self) {
        self.registers.iter_mut().for_each(Register::reset);
    }

    /// Offsets every register address by `base`.
    ///
    /// Every register is checked before any is changed, so a failure leaves
    /// the file untouched.
    ///
    /// # Returns
    ///
    /// `AddressOutOfRange` if an offset address overflows or exceeds `limit`.
    pub(crate) fn relocate(&mut self, base: u64, limit: u64, address_width: u32) -> Result<()> {
        for reg in &self.registers {
            match reg.relocated(base) {
                Some(addr) if addr <= limit => {}
                other => {
                    return Err(BusError::AddressOutOfRange {
                        address: other.unwrap_or(u64::MAX),
                        width: address_width,
                    });
                }
            }
        }
        for reg in &mut self.registers {
            reg.set_address(reg.address() + base);
        }
        Ok(())
    }

    fn find(&self, address: u64) -> Option<&Register> {
        self.registers.iter().find(|r| r.address() == address)
    }
}
