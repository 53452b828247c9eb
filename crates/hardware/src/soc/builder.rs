//! System construction and top-level `System` type.
//!
//! This module builds a complete bus system from configuration. It performs:
//! 1. **Address space setup:** Creates the space with the configured widths and timeout.
//! 2. **Attachment:** Builds every register file template and attaches the peripherals in order.
//! 3. **Controller:** Wraps the space in a wait-state bus and drives it with a `BusController`.
//! 4. **Transactions:** Runs complete reads and writes through the controller.

use tracing::debug;

use crate::common::Result;
use crate::config::{Config, ConfigError};
use crate::regfile::RegisterFile;
use crate::soc::controller::{BusController, ControllerState};
use crate::soc::interconnect::{AddressSpace, PeripheralHandle};
use crate::soc::wait_state::WaitStateBus;

/// Top-level system: the composed address space behind one bus controller.
#[derive(Debug)]
pub struct System {
    controller: BusController<WaitStateBus<AddressSpace>>,
    handles: Vec<PeripheralHandle>,
}

impl System {
    /// Builds a system from configuration.
    ///
    /// # Returns
    ///
    /// The system, or `ConfigError::Invalid` for an inconsistent configuration
    /// and `ConfigError::Bus` when a template or an attachment is rejected.
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let mut space = AddressSpace::new(config.bus);
        let mut handles = Vec::with_capacity(config.peripherals.len());

        for per in &config.peripherals {
            let template = config.regfile(&per.regfile).ok_or_else(|| {
                ConfigError::Invalid(format!("unknown register file `{}`", per.regfile))
            })?;
            let regfile = RegisterFile::from_config(template)?;
            handles.push(space.add(&regfile, &per.name, per.base_address)?);
        }
        debug!(
            peripherals = handles.len(),
            wait_states = config.bus.wait_states,
            "system built"
        );

        let bus = WaitStateBus::new(space, config.bus.wait_states);
        Ok(Self {
            controller: BusController::new(bus),
            handles,
        })
    }

    /// Handles of the attached peripherals, in configuration order.
    pub fn handles(&self) -> &[PeripheralHandle] {
        &self.handles
    }

    /// Handle by composed name (case-insensitive).
    pub fn handle(&self, name: &str) -> Option<&PeripheralHandle> {
        let key = name.to_uppercase();
        self.handles.iter().find(|h| h.name() == key)
    }

    /// Composed address space.
    pub const fn address_space(&self) -> &AddressSpace {
        self.controller.bus().inner()
    }

    /// Mutable address space, for peripheral-side register access.
    pub const fn address_space_mut(&mut self) -> &mut AddressSpace {
        self.controller.bus_mut().inner_mut()
    }

    /// Bus controller.
    pub const fn controller(&self) -> &BusController<WaitStateBus<AddressSpace>> {
        &self.controller
    }

    /// Mutable bus controller, for driving ticks by hand.
    pub const fn controller_mut(&mut self) -> &mut BusController<WaitStateBus<AddressSpace>> {
        &mut self.controller
    }

    /// Runs a complete write transaction.
    pub fn write(&mut self, address: u64, value: u64) -> Result<()> {
        self.transact(true, false, address, Some(value)).map(|_| ())
    }

    /// Runs a complete read transaction.
    pub fn read(&mut self, address: u64) -> Result<u64> {
        self.transact(false, true, address, None)
            .map(|data| data.unwrap_or_default())
    }

    /// Synchronous reset of the controller and every register.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.address_space_mut().reset();
    }

    /// Start, tick to `Done`, end, and tick back to `Idle`.
    fn transact(
        &mut self,
        write: bool,
        read: bool,
        address: u64,
        data: Option<u64>,
    ) -> Result<Option<u64>> {
        self.controller.start_transaction(write, read, address, data)?;
        let _ = self.controller.run()?;
        let data = self.controller.transaction().read_data();
        self.controller.end_transaction(None);
        while self.controller.state() != ControllerState::Idle {
            let _ = self.controller.tick()?;
        }
        Ok(data)
    }
}
