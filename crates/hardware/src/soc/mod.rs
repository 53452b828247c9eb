//! System-level bus components.
//!
//! This module organizes the components that make up a bus system: the
//! composed address space, the bus interface capability and its variants,
//! the transaction controller, and the builder that assembles them.

/// System builder and top-level `System` type.
pub mod builder;

/// Bus transaction controller (signals, transaction, state machine).
pub mod controller;

/// Address space composition and decode.
pub mod interconnect;

/// Bus interface capability trait.
pub mod traits;

/// Wait-state bus variant.
pub mod wait_state;

pub use builder::System;
pub use controller::{BusController, BusSignals, ControllerState, Transaction};
pub use interconnect::{AddressSpace, MapEntry, PeripheralHandle};
pub use traits::{BusInterface, Decoded};
pub use wait_state::WaitStateBus;
