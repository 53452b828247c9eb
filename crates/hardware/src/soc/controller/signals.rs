//! Bus signal set.
//!
//! One consistent set of lines shared by the controller and the bus variant:
//! address/data buses, the controller's enables and strobes, and the status
//! outputs. The acknowledgment line is owned by the bus variant and passed
//! into each tick.

/// Snapshot of the bus lines after a clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusSignals {
    /// Address bus, latched from the active transaction every tick.
    pub address: u64,
    /// Write data bus, latched from the active transaction every tick.
    pub write_data: u64,
    /// Read data, valid once `done` is set after a read.
    pub read_data: u64,
    /// Write enable.
    pub write_enable: bool,
    /// Read enable.
    pub read_enable: bool,
    /// Bus cycle in progress.
    pub cycle: bool,
    /// Data strobe.
    pub strobe: bool,
    /// Controller has no outstanding work.
    pub done: bool,
}

impl BusSignals {
    /// Returns whether a strobed bus cycle is in progress.
    pub const fn is_active(&self) -> bool {
        self.cycle && self.strobe
    }

    pub(crate) const fn assert_write(&mut self) {
        self.write_enable = true;
        self.read_enable = false;
        self.cycle = true;
        self.strobe = true;
    }

    pub(crate) const fn assert_read(&mut self) {
        self.write_enable = false;
        self.read_enable = true;
        self.cycle = true;
        self.strobe = true;
    }

    pub(crate) const fn deassert(&mut self) {
        self.write_enable = false;
        self.read_enable = false;
        self.cycle = false;
        self.strobe = false;
    }
}
