//! # Timeout Tests
//!
//! A transaction whose acknowledgment never arrives is aborted after the
//! configured number of ticks and the controller recovers.

use crate::common::harness::{LED0_BASE, TestContext};
use mmbus_core::common::{BusError, TOMAX};
use mmbus_core::soc::ControllerState;
use pretty_assertions::assert_eq;

#[test]
fn stalled_write_times_out() {
    let mut ctx = TestContext::stalled();
    ctx.ctl
        .start_transaction(true, false, LED0_BASE, Some(0x02))
        .unwrap();

    for tick in 1..=34 {
        assert!(ctx.ctl.tick().is_ok(), "tick {tick} failed early");
    }
    assert_eq!(ctx.ctl.state(), ControllerState::WriteAck);
    assert_eq!(ctx.ctl.timeout_count(), 32);

    let err = ctx.ctl.tick().unwrap_err();
    assert_eq!(
        err,
        BusError::Timeout {
            address: LED0_BASE,
            ticks: TOMAX
        }
    );
    assert_eq!(ctx.ctl.ticks(), 35);
}

#[test]
fn timeout_returns_to_idle_and_keeps_request() {
    let mut ctx = TestContext::stalled();
    ctx.ctl
        .start_transaction(true, false, LED0_BASE, Some(0x02))
        .unwrap();
    assert!(matches!(ctx.ctl.run(), Err(BusError::Timeout { .. })));

    assert_eq!(ctx.ctl.state(), ControllerState::Idle);
    assert!(ctx.ctl.done());
    assert!(!ctx.ctl.signals().is_active());
    assert_eq!(ctx.ctl.timeout_count(), 0);

    let txn = ctx.ctl.transaction();
    assert!(txn.done());
    assert!(!txn.is_pending());
    assert_eq!(txn.address(), LED0_BASE);
    assert_eq!(txn.write_data(), Some(0x02));
    assert!(matches!(txn.error(), Some(BusError::Timeout { .. })));

    assert_eq!(ctx.space().read(LED0_BASE).unwrap(), 0x00);
}

#[test]
fn stalled_read_times_out() {
    let mut ctx = TestContext::stalled();
    ctx.ctl
        .start_transaction(false, true, LED0_BASE, None)
        .unwrap();
    assert_eq!(
        ctx.ctl.run(),
        Err(BusError::Timeout {
            address: LED0_BASE,
            ticks: TOMAX
        })
    );
    assert_eq!(ctx.ctl.transaction().read_data(), None);
}

#[test]
fn recovers_after_timeout() {
    let mut ctx = TestContext::stalled();
    assert!(ctx.write(LED0_BASE, 0x01).is_err());

    ctx.ctl.bus_mut().set_wait_states(Some(0));
    ctx.write(LED0_BASE, 0x01).unwrap();
    assert_eq!(ctx.read(LED0_BASE).unwrap(), 0x01);
}

#[test]
fn stuck_ack_times_out_before_strobe() {
    let mut ctx = TestContext::new();
    ctx.ctl
        .start_transaction(true, false, LED0_BASE, Some(0x01))
        .unwrap();
    assert_eq!(ctx.ctl.tick_with_ack(false).unwrap(), ControllerState::Write);
    for _ in 1..TOMAX {
        assert_eq!(ctx.ctl.tick_with_ack(true).unwrap(), ControllerState::Write);
    }
    assert!(matches!(
        ctx.ctl.tick_with_ack(true),
        Err(BusError::Timeout { ticks: TOMAX, .. })
    ));
    assert_eq!(ctx.ctl.state(), ControllerState::Idle);
}

#[test]
fn timeout_comes_from_bus_config() {
    let ctx = TestContext::stalled();
    assert_eq!(ctx.ctl.timeout(), TOMAX);
}
