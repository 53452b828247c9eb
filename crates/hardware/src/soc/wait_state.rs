//! Wait-state bus variant.
//!
//! Wraps another bus variant and holds off the acknowledgment for a fixed
//! number of ticks after a strobed cycle is seen, the way a slow peripheral
//! inserts wait states. A stalled bus never acknowledges.

use super::controller::{BusSignals, Transaction};
use super::traits::{BusInterface, Decoded};
use crate::common::Result;
use crate::config::BusConfig;

/// Bus variant that delays the acknowledgment of the bus it wraps.
#[derive(Clone, Debug)]
pub struct WaitStateBus<B> {
    inner: B,
    /// Ticks to hold off the ack; `None` never acknowledges.
    wait_states: Option<u32>,
    waited: u32,
}

impl<B: BusInterface> WaitStateBus<B> {
    /// Wraps `inner`, acknowledging `wait_states` ticks after the strobe is seen.
    pub const fn new(inner: B, wait_states: u32) -> Self {
        Self {
            inner,
            wait_states: Some(wait_states),
            waited: 0,
        }
    }

    /// Wraps `inner` with an acknowledgment that never arrives.
    pub const fn stalled(inner: B) -> Self {
        Self {
            inner,
            wait_states: None,
            waited: 0,
        }
    }

    /// Configured wait states, `None` when stalled.
    pub const fn wait_states(&self) -> Option<u32> {
        self.wait_states
    }

    /// Changes the wait states; `None` stalls the bus.
    pub const fn set_wait_states(&mut self, wait_states: Option<u32>) {
        self.wait_states = wait_states;
        self.waited = 0;
    }

    /// Wrapped bus variant.
    pub const fn inner(&self) -> &B {
        &self.inner
    }

    /// Mutable wrapped bus variant.
    pub const fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    /// Unwraps the bus variant.
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: BusInterface> BusInterface for WaitStateBus<B> {
    fn config(&self) -> &BusConfig {
        self.inner.config()
    }

    fn decode(&self, address: u64) -> Result<Decoded> {
        self.inner.decode(address)
    }

    fn dispatch(&mut self, transaction: &Transaction) -> Result<Option<u64>> {
        self.inner.dispatch(transaction)
    }

    fn ack(&mut self, signals: &BusSignals) -> bool {
        if !signals.is_active() {
            self.waited = 0;
            return false;
        }
        match self.wait_states {
            Some(n) if self.waited >= n => true,
            Some(_) => {
                self.waited += 1;
                false
            }
            None => false,
        }
    }
}
