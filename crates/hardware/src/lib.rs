//! Memory-mapped peripheral bus model.
//!
//! This crate models a bus controller issuing read/write transactions against
//! a composed address space of peripheral register files:
//! 1. **Registers:** Named, addressed, access-moded storage cells grouped into register files.
//! 2. **Address space:** Register files attached at base addresses with collision-safe naming.
//! 3. **Controller:** A clocked state machine with request latching, acknowledgment and timeout.
//! 4. **Bus variants:** A capability trait injected into the controller, with a wait-state variant.
//! 5. **System:** Configuration-driven assembly of all of the above.

/// Common types and constants (errors, access types, widths).
pub mod common;
/// Bus configuration (defaults, templates, attachments, JSON loading).
pub mod config;
/// Registers and register files.
pub mod regfile;
/// Address space, bus interface, controller and system builder.
pub mod soc;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Error type shared by every bus operation.
pub use crate::common::{BusError, Result};
/// Register storage types.
pub use crate::regfile::{AccessMode, Register, RegisterFile};
/// Bus components.
pub use crate::soc::{
    AddressSpace, BusController, BusInterface, ControllerState, PeripheralHandle, System,
    Transaction, WaitStateBus,
};
