//! Bus error definitions.
//!
//! This module defines the error handling of the bus model. It provides:
//! 1. **Setup Errors:** Address and name collisions, bad widths, addresses outside the bus.
//! 2. **Transaction Errors:** Decode misses, access violations, malformed requests and timeouts.
//! 3. **Classification:** Telling per-transaction failures apart from setup failures.

use thiserror::Error;

use super::data::AccessType;
use crate::regfile::AccessMode;

/// Result alias used throughout the bus model.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors raised while composing an address space or running a bus transaction.
///
/// Setup errors (raised by `add_register` and `AddressSpace::add`) reject the
/// attachment as a whole. Transaction errors terminate only the current
/// transaction; the controller returns to `Idle` and accepts new work.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BusError {
    /// Two registers would share one address.
    ///
    /// Raised within a single register file, or across files when an
    /// attachment's offset addresses land on an address already mapped.
    #[error("address {address:#x} is already mapped by {owner}")]
    DuplicateAddress {
        /// Colliding address (relative within a file, absolute within a space).
        address: u64,
        /// Register (or `FILE.register`) that already owns the address.
        owner: String,
    },

    /// Two registers in one file share a name.
    #[error("register name `{0}` is already used in this register file")]
    DuplicateName(String),

    /// No register decodes at the address.
    #[error("address {0:#x} is not mapped")]
    UnmappedAddress(u64),

    /// Write to a read-only register or read of a write-only register.
    #[error("{access} of {mode} register `{name}` at {address:#x}")]
    AccessViolation {
        /// Register name.
        name: String,
        /// Register address.
        address: u64,
        /// Attempted direction.
        access: AccessType,
        /// Mode of the register.
        mode: AccessMode,
    },

    /// Request rejected before the controller accepted it.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(&'static str),

    /// Acknowledgment not seen within the timeout bound.
    #[error("bus timeout at {address:#x} after {ticks} ticks without acknowledgment")]
    Timeout {
        /// Address of the aborted transaction.
        address: u64,
        /// Ticks spent waiting.
        ticks: u32,
    },

    /// Address does not fit the address bus (or overflowed while offsetting).
    #[error("address {address:#x} does not fit a {width}-bit address bus")]
    AddressOutOfRange {
        /// Offending address (saturated on overflow).
        address: u64,
        /// Address bus width in bits.
        width: u32,
    },

    /// Register width is zero or wider than the bus can carry.
    #[error("register `{name}` is {width} bits wide (allowed 1..={max})")]
    InvalidWidth {
        /// Register name.
        name: String,
        /// Declared width in bits.
        width: u32,
        /// Widest width accepted at this point.
        max: u32,
    },
}

impl BusError {
    /// Returns whether the error terminates only a single transaction.
    ///
    /// # Returns
    ///
    /// `true` for decode misses, access violations, malformed requests and
    /// timeouts; `false` for errors raised while composing the address space.
    pub const fn is_transaction_error(&self) -> bool {
        matches!(
            self,
            Self::UnmappedAddress(_)
                | Self::AccessViolation { .. }
                | Self::InvalidTransaction(_)
                | Self::Timeout { .. }
        )
    }
}
