//! Bus interface capability.
//!
//! This module defines the `BusInterface` trait implemented by every bus variant. It provides:
//! 1. **Parameters:** The widths and timeout the variant was built with.
//! 2. **Decode:** Mapping an absolute address to its register file and register.
//! 3. **Dispatch:** Carrying out a transaction against the owning register.
//! 4. **Handshake:** Driving the acknowledgment signal from the controller's strobes.
//!
//! The controller is generic over this trait; variants are injected at construction.

use crate::common::Result;
use crate::config::BusConfig;
use crate::soc::controller::{BusSignals, Transaction};

/// Location an absolute address decodes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Composed name of the owning register file (e.g. `"LED_001"`).
    pub regfile: String,
    /// Name of the register within that file.
    pub register: String,
    /// Absolute address that was decoded.
    pub address: u64,
}

/// Slave side of the bus, as seen by a `BusController`.
pub trait BusInterface {
    /// Returns the bus parameters (widths, timeout, wait states).
    fn config(&self) -> &BusConfig;

    /// Resolves an absolute address to its register file and register.
    ///
    /// # Returns
    ///
    /// The decoded location, or `UnmappedAddress` if nothing claims the address.
    fn decode(&self, address: u64) -> Result<Decoded>;

    /// Carries out an acknowledged transaction.
    ///
    /// # Returns
    ///
    /// `Some(data)` for a read, `None` for a write; or the decode/access error
    /// that terminates the transaction.
    fn dispatch(&mut self, transaction: &Transaction) -> Result<Option<u64>>;

    /// Samples the controller's signals for one clock edge and returns the ack line.
    ///
    /// The default acknowledges as soon as a cycle is strobed (no wait states).
    fn ack(&mut self, signals: &BusSignals) -> bool {
        signals.is_active()
    }
}
