//! Registers and register files.
//!
//! This module holds the storage side of the bus model:
//! 1. **Register:** One named, addressed, access-moded storage cell.
//! 2. **RegisterFile:** The ordered registers of one peripheral, with address dispatch.

/// Register file implementation.
pub mod file;

/// Register and access mode definitions.
pub mod register;

pub use file::RegisterFile;
pub use register::{AccessMode, ParseAccessModeError, Register};
