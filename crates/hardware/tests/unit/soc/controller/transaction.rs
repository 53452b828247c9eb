//! # Transaction Tests
//!
//! Request construction and the checks `start_transaction` applies.

use crate::common::harness::{LED0_BASE, TestContext};
use mmbus_core::common::BusError;
use mmbus_core::soc::{ControllerState, Transaction};
use pretty_assertions::assert_eq;

#[test]
fn constructors_set_direction() {
    let w = Transaction::write(0x10, 0x7);
    assert!(w.is_write() && !w.is_read() && w.is_pending());
    assert_eq!(w.write_data(), Some(0x7));
    assert!(!w.done());

    let r = Transaction::read(0x10);
    assert!(r.is_read() && !r.is_write());
    assert_eq!(r.read_data(), None);
    assert_eq!(r.error(), None);
}

#[test]
fn raw_flags_validated() {
    assert!(matches!(
        Transaction::new(true, true, 0, Some(1)),
        Err(BusError::InvalidTransaction(_))
    ));
    let empty = Transaction::new(false, false, 0x30, Some(0x9)).unwrap();
    assert!(!empty.is_pending());
    assert_eq!(empty.address(), 0x30);
    assert_eq!(empty.write_data(), None);
    assert!(matches!(
        Transaction::new(true, false, 0, None),
        Err(BusError::InvalidTransaction(_))
    ));
    assert_eq!(
        Transaction::new(false, true, 0x20, Some(0x55))
            .unwrap()
            .read_data(),
        Some(0x55)
    );
}

#[test]
fn both_directions_leave_controller_unchanged() {
    let mut ctx = TestContext::new();
    let err = ctx
        .ctl
        .start_transaction(true, true, LED0_BASE, Some(1))
        .unwrap_err();
    assert!(matches!(err, BusError::InvalidTransaction(_)));
    assert_eq!(ctx.ctl.state(), ControllerState::Idle);
    assert!(!ctx.ctl.transaction().is_pending());

    // Idle stays idle on the next tick.
    assert_eq!(ctx.ctl.tick().unwrap(), ControllerState::Idle);
    assert!(ctx.ctl.done());
}

#[test]
fn no_direction_request_only_reports_done() {
    let mut ctx = TestContext::new();
    ctx.ctl
        .start_transaction(false, false, LED0_BASE, None)
        .unwrap();
    assert!(!ctx.ctl.transaction().is_pending());
    assert!(!ctx.ctl.done());

    assert_eq!(ctx.ctl.tick().unwrap(), ControllerState::Idle);
    assert!(ctx.ctl.done());
    assert_eq!(ctx.ctl.signals().address, LED0_BASE);
    assert!(!ctx.ctl.signals().is_active());
    assert!(matches!(
        ctx.ctl.run(),
        Err(BusError::InvalidTransaction(_))
    ));

    ctx.write(LED0_BASE, 0x02).unwrap();
    assert_eq!(ctx.read(LED0_BASE).unwrap(), 0x02);
}

#[test]
fn second_request_rejected_while_outstanding() {
    let mut ctx = TestContext::new();
    ctx.ctl
        .start_transaction(true, false, LED0_BASE, Some(1))
        .unwrap();
    let err = ctx
        .ctl
        .start_transaction(false, true, LED0_BASE, None)
        .unwrap_err();
    assert_eq!(
        err,
        BusError::InvalidTransaction("a transaction is already outstanding")
    );
    assert!(ctx.ctl.transaction().is_write());
}

#[test]
fn request_rejected_until_back_to_idle() {
    let mut ctx = TestContext::new();
    ctx.ctl
        .start_transaction(true, false, LED0_BASE, Some(1))
        .unwrap();
    let _ = ctx.ctl.run().unwrap();
    ctx.ctl.end_transaction(None);
    assert_eq!(ctx.ctl.state(), ControllerState::Done);
    assert_eq!(
        ctx.ctl.start_transaction(false, true, LED0_BASE, None),
        Err(BusError::InvalidTransaction("controller is busy"))
    );
    assert_eq!(ctx.ctl.tick().unwrap(), ControllerState::Idle);
    assert!(
        ctx.ctl
            .start_transaction(false, true, LED0_BASE, None)
            .is_ok()
    );
}

#[test]
fn address_must_fit_address_bus() {
    let mut ctx = TestContext::new();
    assert_eq!(
        ctx.ctl.start_transaction(false, true, 0x1_0000, None),
        Err(BusError::AddressOutOfRange {
            address: 0x1_0000,
            width: 16
        })
    );
}

#[test]
fn write_data_must_fit_data_bus() {
    let mut ctx = TestContext::new();
    assert!(matches!(
        ctx.ctl.start_transaction(true, false, LED0_BASE, Some(0x100)),
        Err(BusError::InvalidTransaction(_))
    ));
    assert!(
        ctx.ctl
            .start_transaction(true, false, LED0_BASE, Some(0xFF))
            .is_ok()
    );
}

#[test]
fn run_without_request_rejected() {
    let mut ctx = TestContext::new();
    assert!(matches!(
        ctx.ctl.run(),
        Err(BusError::InvalidTransaction(_))
    ));
}
