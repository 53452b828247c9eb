//! Bus Access Types.
//!
//! This module defines the direction of a register access. It is used for:
//! 1. **Permission Validation:** Checking an access against a register's [`AccessMode`](crate::regfile::AccessMode).
//! 2. **Fault Reporting:** Naming the offending direction in an access violation.

use std::fmt;

/// Direction of a register access issued over the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Controller reads the register value.
    Read,

    /// Controller writes a new register value.
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}
