//! Address space composition and decode.
//!
//! This module implements the composed address space that routes absolute
//! addresses to attached register files. It provides:
//! 1. **Attachment:** Register file templates are deep-copied, offset by a base address and named.
//! 2. **Collision Safety:** Absolute addresses stay unique across every attachment.
//! 3. **Decode:** Addresses resolve by range containment, then by exact register match.
//! 4. **Access:** Untimed reads and writes, plus peripheral-side access through handles.

use std::collections::HashMap;

use tracing::debug;

use super::controller::Transaction;
use super::traits::{BusInterface, Decoded};
use crate::common::constants::{DEFAULT_LABEL_DIGITS, SUFFIX_DIGITS};
use crate::common::{BusError, Result, width_mask};
use crate::config::BusConfig;
use crate::regfile::{AccessMode, RegisterFile};

/// Handle to one attachment, returned by [`AddressSpace::add`].
///
/// The peripheral behind the attachment uses it to reach its own register
/// file copy (for example to read a control register the bus just wrote).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeripheralHandle {
    name: String,
    base_address: u64,
    span: Option<(u64, u64)>,
    index: usize,
}

impl PeripheralHandle {
    /// Composed, upper-case name with its attachment suffix (e.g. `"LED_000"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base address the register file was attached at.
    pub const fn base_address(&self) -> u64 {
        self.base_address
    }

    /// Lowest and highest absolute register address, or `None` for an empty file.
    pub const fn span(&self) -> Option<(u64, u64)> {
        self.span
    }
}

/// One row of [`AddressSpace::memory_map`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapEntry {
    /// Absolute register address.
    pub address: u64,
    /// Composed register file name.
    pub regfile: String,
    /// Register name.
    pub register: String,
    /// Register width in bits.
    pub width: u32,
    /// Register access mode.
    pub mode: AccessMode,
}

#[derive(Clone, Debug)]
struct Attachment {
    name: String,
    base_address: u64,
    regfile: RegisterFile,
}

/// Flat address space composed of attached register files.
///
/// Grows monotonically through [`add`](Self::add). Holds the bus widths and
/// timeout, the attachments in order, and a per-base-name attachment counter.
#[derive(Clone, Debug)]
pub struct AddressSpace {
    config: BusConfig,
    attachments: Vec<Attachment>,
    /// Last suffix handed out per upper-case base name.
    names: HashMap<String, u32>,
    /// Next default label for attachments without a name.
    unnamed: u32,
}

impl AddressSpace {
    /// Creates an empty address space.
    ///
    /// # Arguments
    ///
    /// * `config` - Bus widths and timeout; fixed for the lifetime of the space.
    pub fn new(config: BusConfig) -> Self {
        Self {
            config,
            attachments: Vec::new(),
            names: HashMap::new(),
            unnamed: 0,
        }
    }

    /// Creates an empty address space with the default timeout.
    pub fn with_widths(data_width: u32, address_width: u32) -> Self {
        Self::new(BusConfig::new(data_width, address_width))
    }

    /// Bus parameters.
    pub const fn bus_config(&self) -> &BusConfig {
        &self.config
    }

    /// Data bus width in bits.
    pub const fn data_width(&self) -> u32 {
        self.config.data_width
    }

    /// Address bus width in bits.
    pub const fn address_width(&self) -> u32 {
        self.config.address_width
    }

    /// Acknowledgment timeout in ticks.
    pub const fn timeout(&self) -> u32 {
        self.config.timeout_ticks
    }

    /// Highest address the address bus can carry.
    pub const fn address_limit(&self) -> u64 {
        width_mask(self.config.address_width)
    }

    /// Attaches a copy of a register file at a base address.
    ///
    /// The template is cloned, so later attachments of the same template (and
    /// the template itself) are unaffected by this one. The first attachment
    /// of a base name is named `NAME_000`, the next `NAME_001`, and so on;
    /// names are compared upper-case. An empty name gets a four-digit default
    /// label first.
    ///
    /// # Arguments
    ///
    /// * `regfile` - Register file template with relative addresses.
    /// * `name` - Base name of the peripheral.
    /// * `base_address` - Offset added to every register address.
    ///
    /// # Returns
    ///
    /// A handle to the attachment. On error nothing is attached and no
    /// suffix is consumed:
    /// * `InvalidWidth` if a register is wider than the data bus,
    /// * `AddressOutOfRange` if an offset address does not fit the address bus,
    /// * `DuplicateAddress` if an offset address is already mapped.
    pub fn add(
        &mut self,
        regfile: &RegisterFile,
        name: &str,
        base_address: u64,
    ) -> Result<PeripheralHandle> {
        let mut copy = regfile.clone();

        if let Some(reg) = copy.registers().find(|r| r.width() > self.config.data_width) {
            return Err(BusError::InvalidWidth {
                name: reg.name().to_string(),
                width: reg.width(),
                max: self.config.data_width,
            });
        }

        copy.relocate(base_address, self.address_limit(), self.config.address_width)?;

        for reg in copy.registers() {
            if let Some(owner) = self.owner_of(reg.address()) {
                return Err(BusError::DuplicateAddress {
                    address: reg.address(),
                    owner,
                });
            }
        }

        let composed = self.compose_name(name);
        let handle = PeripheralHandle {
            name: composed.clone(),
            base_address,
            span: copy.address_range(),
            index: self.attachments.len(),
        };
        debug!(
            name = %composed,
            base = format_args!("{base_address:#x}"),
            registers = copy.len(),
            "attached register file"
        );
        self.attachments.push(Attachment {
            name: composed,
            base_address,
            regfile: copy,
        });
        Ok(handle)
    }

    /// Number of attachments.
    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    /// Returns whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    /// Composed names in attachment order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attachments.iter().map(|a| a.name.as_str())
    }

    /// Register file copy behind a handle.
    pub fn regfile(&self, handle: &PeripheralHandle) -> Option<&RegisterFile> {
        self.attachments
            .get(handle.index)
            .filter(|a| a.name == handle.name)
            .map(|a| &a.regfile)
    }

    /// Mutable register file copy behind a handle.
    pub fn regfile_mut(&mut self, handle: &PeripheralHandle) -> Option<&mut RegisterFile> {
        self.attachments
            .get_mut(handle.index)
            .filter(|a| a.name == handle.name)
            .map(|a| &mut a.regfile)
    }

    /// Register file copy by composed name (case-insensitive).
    pub fn regfile_by_name(&self, name: &str) -> Option<&RegisterFile> {
        let key = name.to_uppercase();
        self.attachments
            .iter()
            .find(|a| a.name == key)
            .map(|a| &a.regfile)
    }

    /// Handle of an existing attachment by composed name (case-insensitive).
    pub fn handle(&self, name: &str) -> Option<PeripheralHandle> {
        let key = name.to_uppercase();
        self.attachments
            .iter()
            .enumerate()
            .find(|(_, a)| a.name == key)
            .map(|(index, a)| PeripheralHandle {
                name: a.name.clone(),
                base_address: a.base_address,
                span: a.regfile.address_range(),
                index,
            })
    }

    /// Untimed controller-side read at an absolute address.
    ///
    /// # Returns
    ///
    /// The register value; `UnmappedAddress` or `AccessViolation` otherwise.
    pub fn read(&self, address: u64) -> Result<u64> {
        let idx = self.locate(address)?;
        self.attachments[idx].regfile.read(address)
    }

    /// Untimed controller-side write at an absolute address.
    ///
    /// # Returns
    ///
    /// `UnmappedAddress` or `AccessViolation` on failure.
    pub fn write(&mut self, address: u64, value: u64) -> Result<()> {
        let idx = self.locate(address)?;
        self.attachments[idx].regfile.write(address, value)
    }

    /// All mapped registers, sorted by absolute address.
    pub fn memory_map(&self) -> Vec<MapEntry> {
        let mut map: Vec<MapEntry> = self
            .attachments
            .iter()
            .flat_map(|a| {
                a.regfile.registers().map(|r| MapEntry {
                    address: r.address(),
                    regfile: a.name.clone(),
                    register: r.name().to_string(),
                    width: r.width(),
                    mode: r.mode(),
                })
            })
            .collect();
        map.sort_by_key(|e| e.address);
        map
    }

    /// Restores every register of every attachment to its reset value.
    pub fn reset(&mut self) {
        for a in &mut self.attachments {
            a.regfile.reset();
        }
    }

    /// Index of the attachment with a register at `address`.
    ///
    /// Files are checked by range first; ranges may interleave, so the
    /// exact register match decides.
    fn locate(&self, address: u64) -> Result<usize> {
        self.attachments
            .iter()
            .position(|a| a.regfile.contains(address) && a.regfile.lookup(address).is_ok())
            .ok_or(BusError::UnmappedAddress(address))
    }

    /// `FILE.register` label of the register mapped at `address`, if any.
    fn owner_of(&self, address: u64) -> Option<String> {
        self.attachments.iter().find_map(|a| {
            a.regfile
                .lookup(address)
                .ok()
                .map(|r| format!("{}.{}", a.name, r.name()))
        })
    }

    fn compose_name(&mut self, name: &str) -> String {
        let base = if name.is_empty() {
            let label = format!("{:0width$}", self.unnamed, width = DEFAULT_LABEL_DIGITS);
            self.unnamed += 1;
            label
        } else {
            name.to_uppercase()
        };
        let count = self
            .names
            .entry(base.clone())
            .and_modify(|n| *n += 1)
            .or_insert(0);
        format!("{base}_{:0width$}", *count, width = SUFFIX_DIGITS)
    }
}

impl BusInterface for AddressSpace {
    fn config(&self) -> &BusConfig {
        &self.config
    }

    fn decode(&self, address: u64) -> Result<Decoded> {
        let idx = self.locate(address)?;
        let a = &self.attachments[idx];
        let reg = a.regfile.lookup(address)?;
        Ok(Decoded {
            regfile: a.name.clone(),
            register: reg.name().to_string(),
            address,
        })
    }

    fn dispatch(&mut self, transaction: &Transaction) -> Result<Option<u64>> {
        let address = transaction.address();
        if transaction.is_write() {
            let data = transaction
                .write_data()
                .ok_or(BusError::InvalidTransaction("write request without data"))?;
            self.write(address, data)?;
            Ok(None)
        } else if transaction.is_read() {
            self.read(address).map(Some)
        } else {
            Err(BusError::InvalidTransaction("no request to dispatch"))
        }
    }
}
