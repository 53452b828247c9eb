//! Clocked bus transaction controller.
//!
//! The controller drives one transaction at a time through the bus handshake.
//! It performs:
//! 1. **Request latching:** Address and write data follow the active transaction every tick.
//! 2. **Handshake:** Enables and strobes are asserted, then held until acknowledged.
//! 3. **Timeout:** A bounded counter aborts a transaction whose acknowledgment never arrives.
//! 4. **Dispatch:** The acknowledged access is carried out through the injected bus variant.

use std::fmt;

use tracing::{debug, trace, warn};

use super::signals::BusSignals;
use super::transaction::Transaction;
use crate::common::{BusError, Result, width_mask};
use crate::soc::traits::BusInterface;

/// Controller states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControllerState {
    /// Waiting for a request.
    #[default]
    Idle,
    /// Write requested; strobes go up on the next tick.
    Write,
    /// Write strobed; waiting for the acknowledgment.
    WriteAck,
    /// Read requested; strobes go up on the next tick.
    Read,
    /// Read strobed; waiting for the acknowledgment.
    ReadAck,
    /// Acknowledged; held until the caller ends the transaction.
    Done,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Bus master state machine.
///
/// Advances exactly one transition per [`tick`](Self::tick). Only one
/// transaction may be outstanding: start it with
/// [`start_transaction`](Self::start_transaction), tick until
/// [`done`](Self::done), then call [`end_transaction`](Self::end_transaction).
///
/// A transaction that fails (decode miss, access violation or timeout)
/// returns the controller straight to `Idle`, keeps its address and data, and
/// needs no `end_transaction`.
#[derive(Debug)]
pub struct BusController<B> {
    bus: B,
    state: ControllerState,
    signals: BusSignals,
    transaction: Transaction,
    /// Acknowledgment timeout in ticks (`TOMAX`).
    timeout: u32,
    /// Ticks spent waiting for the acknowledgment, in `[0, timeout)`.
    tocnt: u32,
    ticks: u64,
}

impl<B: BusInterface> BusController<B> {
    /// Creates a controller over a bus variant.
    ///
    /// The timeout is taken from the bus configuration (at least one tick).
    pub fn new(bus: B) -> Self {
        let timeout = bus.config().timeout_ticks.max(1);
        Self {
            bus,
            state: ControllerState::Idle,
            signals: BusSignals::default(),
            transaction: Transaction::default(),
            timeout,
            tocnt: 0,
            ticks: 0,
        }
    }

    /// Bus variant the controller drives.
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable bus variant (setup and peripheral-side access).
    pub const fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consumes the controller, returning the bus variant.
    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Current state.
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Bus lines after the last tick.
    pub const fn signals(&self) -> &BusSignals {
        &self.signals
    }

    /// Active (or last) transaction.
    pub const fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Done output: no work outstanding.
    pub const fn done(&self) -> bool {
        self.signals.done
    }

    /// Acknowledgment timeout in ticks.
    pub const fn timeout(&self) -> u32 {
        self.timeout
    }

    /// Current value of the timeout counter.
    pub const fn timeout_count(&self) -> u32 {
        self.tocnt
    }

    /// Ticks since construction or the last reset.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Latches a new request.
    ///
    /// For a read, `data` presets the read data (simulation seam). With
    /// neither direction only the address is latched, and the next idle tick
    /// reports `done`. On error nothing changes.
    ///
    /// # Returns
    ///
    /// * `InvalidTransaction` if both directions are requested, a
    ///   request is still outstanding, the controller is not `Idle`, a write
    ///   has no data or its data is wider than the data bus,
    /// * `AddressOutOfRange` if the address does not fit the address bus.
    pub fn start_transaction(
        &mut self,
        write: bool,
        read: bool,
        address: u64,
        data: Option<u64>,
    ) -> Result<()> {
        let transaction = Transaction::new(write, read, address, data)?;
        if self.transaction.is_pending() {
            return Err(BusError::InvalidTransaction(
                "a transaction is already outstanding",
            ));
        }
        if self.state != ControllerState::Idle {
            return Err(BusError::InvalidTransaction("controller is busy"));
        }
        let config = self.bus.config();
        if address > width_mask(config.address_width) {
            return Err(BusError::AddressOutOfRange {
                address,
                width: config.address_width,
            });
        }
        if transaction
            .write_data()
            .is_some_and(|d| d > width_mask(config.data_width))
        {
            return Err(BusError::InvalidTransaction(
                "write data wider than the data bus",
            ));
        }
        self.transaction = transaction;
        Ok(())
    }

    /// Finalizes the current transaction.
    ///
    /// For a read, `data` replaces the captured read data. Both request flags
    /// are cleared; `done` is left for the caller to observe. With no request
    /// outstanding this is a no-op. A transaction still waiting for its
    /// acknowledgment is not ended.
    pub fn end_transaction(&mut self, data: Option<u64>) {
        if !self.transaction.is_pending() {
            return;
        }
        if !matches!(self.state, ControllerState::Idle | ControllerState::Done) {
            debug!(state = %self.state, "end_transaction ignored while in flight");
            return;
        }
        if self.transaction.is_read() {
            if let Some(data) = data {
                self.transaction.set_read_data(data);
                self.signals.read_data = data;
            }
        }
        self.transaction.clear_requests();
    }

    /// Advances one clock tick, sampling the bus variant's acknowledgment.
    ///
    /// # Returns
    ///
    /// The state after the tick, or the error that aborted the transaction.
    pub fn tick(&mut self) -> Result<ControllerState> {
        let ack = self.bus.ack(&self.signals);
        self.tick_with_ack(ack)
    }

    /// Advances one clock tick with an externally driven acknowledgment.
    ///
    /// # Returns
    ///
    /// The state after the tick, or the error that aborted the transaction.
    /// After an error the controller is `Idle` and accepts a new transaction.
    pub fn tick_with_ack(&mut self, ack: bool) -> Result<ControllerState> {
        self.ticks += 1;
        self.signals.address = self.transaction.address();
        self.signals.write_data = self.transaction.write_data().unwrap_or(0);

        let prev = self.state;
        let result = match self.state {
            ControllerState::Idle => {
                self.idle();
                Ok(())
            }
            ControllerState::Write => self.strobe(ack, ControllerState::WriteAck),
            ControllerState::Read => self.strobe(ack, ControllerState::ReadAck),
            ControllerState::WriteAck | ControllerState::ReadAck => {
                if ack {
                    self.complete()
                } else {
                    self.wait()
                }
            }
            ControllerState::Done => {
                self.set_done(true);
                if !self.transaction.is_pending() {
                    self.state = ControllerState::Idle;
                }
                Ok(())
            }
        };
        if self.state != prev {
            trace!(from = %prev, to = %self.state, tick = self.ticks, "bus state transition");
        }
        result.map(|()| self.state)
    }

    /// Ticks until the outstanding transaction is acknowledged or aborted.
    ///
    /// Always terminates: every waiting state is bounded by the timeout.
    ///
    /// # Returns
    ///
    /// Ticks taken to reach `Done`, or the error that aborted the transaction.
    pub fn run(&mut self) -> Result<u64> {
        if !self.transaction.is_pending() {
            return Err(BusError::InvalidTransaction("no transaction outstanding"));
        }
        let mut ticks: u64 = 0;
        while self.state != ControllerState::Done {
            let _ = self.tick()?;
            ticks += 1;
        }
        Ok(ticks)
    }

    /// Synchronous reset: back to `Idle`, lines low, transaction cleared.
    pub fn reset(&mut self) {
        self.state = ControllerState::Idle;
        self.signals = BusSignals::default();
        self.transaction = Transaction::default();
        self.tocnt = 0;
        self.ticks = 0;
    }

    fn idle(&mut self) {
        if self.transaction.is_write() {
            self.set_done(false);
            self.tocnt = 0;
            self.state = ControllerState::Write;
        } else if self.transaction.is_read() {
            self.set_done(false);
            self.tocnt = 0;
            self.state = ControllerState::Read;
        } else {
            self.set_done(true);
        }
    }

    /// Raises enables and strobes once the previous acknowledgment has dropped.
    fn strobe(&mut self, ack: bool, next: ControllerState) -> Result<()> {
        if ack {
            // Stale ack from the previous cycle; counted against the timeout.
            return self.wait();
        }
        if next == ControllerState::WriteAck {
            self.signals.assert_write();
        } else {
            self.signals.assert_read();
        }
        self.tocnt = 0;
        self.state = next;
        Ok(())
    }

    fn wait(&mut self) -> Result<()> {
        if self.tocnt + 1 >= self.timeout {
            let err = BusError::Timeout {
                address: self.transaction.address(),
                ticks: self.tocnt + 1,
            };
            warn!(
                address = format_args!("{:#x}", self.transaction.address()),
                ticks = self.tocnt + 1,
                "bus transaction timed out"
            );
            return Err(self.abort(err));
        }
        self.tocnt += 1;
        Ok(())
    }

    fn complete(&mut self) -> Result<()> {
        self.signals.deassert();
        match self.bus.dispatch(&self.transaction) {
            Ok(data) => {
                if let Some(data) = data {
                    self.transaction.set_read_data(data);
                    self.signals.read_data = data;
                }
                self.set_done(true);
                self.state = ControllerState::Done;
                Ok(())
            }
            Err(err) => {
                debug!(
                    address = format_args!("{:#x}", self.transaction.address()),
                    error = %err,
                    "bus transaction failed"
                );
                Err(self.abort(err))
            }
        }
    }

    fn abort(&mut self, err: BusError) -> BusError {
        self.signals.deassert();
        self.transaction.fail(err.clone());
        self.signals.done = true;
        self.tocnt = 0;
        self.state = ControllerState::Idle;
        err
    }

    fn set_done(&mut self, done: bool) {
        self.transaction.set_done(done);
        self.signals.done = done;
    }
}
