//! Common utilities and types used throughout the bus model.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Constants:** Timeout bound, width limits and naming rules.
//! 2. **Access Types:** Read/write direction of a register access.
//! 3. **Error Handling:** The bus error enum and result alias.

/// Bus-wide constants.
pub mod constants;

/// Access direction definitions.
pub mod data;

/// Error types.
pub mod error;

pub use constants::{TOMAX, width_mask};
pub use data::AccessType;
pub use error::{BusError, Result};
