//! Bus transaction controller.
//!
//! This module holds the master side of the bus:
//! 1. **Signals:** The single set of address, data, enable and strobe lines.
//! 2. **Transaction:** The request being carried and its outcome.
//! 3. **State Machine:** The clocked controller that drives a transaction to completion or timeout.

/// Controller state machine.
pub mod fsm;

/// Bus signal set.
pub mod signals;

/// Transaction record.
pub mod transaction;

pub use fsm::{BusController, ControllerState};
pub use signals::BusSignals;
pub use transaction::Transaction;
