use mmbus_core::common::Result;
use mmbus_core::config::BusConfig;
use mmbus_core::soc::{BusInterface, BusSignals, Decoded, Transaction};
use mockall::mock;

mock! {
    pub Bus {}
    impl BusInterface for Bus {
        fn config(&self) -> &BusConfig;
        fn decode(&self, address: u64) -> Result<Decoded>;
        fn dispatch(&mut self, transaction: &Transaction) -> Result<Option<u64>>;
        fn ack(&mut self, signals: &BusSignals) -> bool;
    }
}

/// Mock bus reporting an 8-bit data, 16-bit address configuration.
///
/// Callers add their own `ack` and `dispatch` expectations.
pub fn mock_bus() -> MockBus {
    let mut bus = MockBus::new();
    let _ = bus.expect_config().return_const(BusConfig::new(8, 16));
    bus
}
