//! In-flight bus transaction.
//!
//! A `Transaction` records one read or write request and its result. It provides:
//! 1. **Request:** Direction, address and (for writes) the data to write.
//! 2. **Result:** Read data, completion flag and, for failed transactions, the error.

use crate::common::{BusError, Result};

/// One outstanding read or write request.
///
/// `is_write` and `is_read` are never both set. `done` is clear while the
/// request is outstanding and set once it is acknowledged or aborted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transaction {
    is_write: bool,
    is_read: bool,
    address: u64,
    write_data: Option<u64>,
    read_data: Option<u64>,
    done: bool,
    error: Option<BusError>,
}

impl Transaction {
    /// Builds a request from raw direction flags.
    ///
    /// For a read, `data` presets the read data (a seam for simulation; the
    /// controller overwrites it when the read completes).
    ///
    /// # Returns
    ///
    /// `InvalidTransaction` if both directions are requested, or a write
    /// carries no data. With neither direction the request records only the
    /// address and leaves nothing pending.
    pub fn new(write: bool, read: bool, address: u64, data: Option<u64>) -> Result<Self> {
        match (write, read) {
            (true, true) => Err(BusError::InvalidTransaction(
                "read and write requested together",
            )),
            (false, false) => Ok(Self {
                address,
                ..Self::default()
            }),
            (true, false) => {
                let data =
                    data.ok_or(BusError::InvalidTransaction("write request without data"))?;
                Ok(Self::write(address, data))
            }
            (false, true) => Ok(Self {
                read_data: data,
                ..Self::read(address)
            }),
        }
    }

    /// Write request.
    pub fn write(address: u64, data: u64) -> Self {
        Self {
            is_write: true,
            address,
            write_data: Some(data),
            ..Self::default()
        }
    }

    /// Read request.
    pub fn read(address: u64) -> Self {
        Self {
            is_read: true,
            address,
            ..Self::default()
        }
    }

    /// Write requested.
    pub const fn is_write(&self) -> bool {
        self.is_write
    }

    /// Read requested.
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Either direction still requested.
    pub const fn is_pending(&self) -> bool {
        self.is_write || self.is_read
    }

    /// Target address.
    pub const fn address(&self) -> u64 {
        self.address
    }

    /// Data to write, if this was a write.
    pub const fn write_data(&self) -> Option<u64> {
        self.write_data
    }

    /// Data read (or preset), if any.
    pub const fn read_data(&self) -> Option<u64> {
        self.read_data
    }

    /// Acknowledged or aborted.
    pub const fn done(&self) -> bool {
        self.done
    }

    /// Error that aborted the transaction, if any.
    pub const fn error(&self) -> Option<&BusError> {
        self.error.as_ref()
    }

    pub(crate) const fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    pub(crate) const fn set_read_data(&mut self, data: u64) {
        self.read_data = Some(data);
    }

    pub(crate) const fn clear_requests(&mut self) {
        self.is_write = false;
        self.is_read = false;
    }

    /// Ends the transaction with an error; address and data are kept.
    pub(crate) fn fail(&mut self, error: BusError) {
        self.clear_requests();
        self.done = true;
        self.error = Some(error);
    }
}
