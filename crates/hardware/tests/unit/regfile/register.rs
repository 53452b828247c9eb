//! # Register Tests
//!
//! Access modes, width masking and reset values of single registers.

use mmbus_core::common::{AccessType, BusError};
use mmbus_core::regfile::{AccessMode, Register};
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Access modes
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("ro", AccessMode::ReadOnly)]
#[case("RO", AccessMode::ReadOnly)]
#[case("read-only", AccessMode::ReadOnly)]
#[case("wo", AccessMode::WriteOnly)]
#[case("w", AccessMode::WriteOnly)]
#[case("rw", AccessMode::ReadWrite)]
#[case("Read-Write", AccessMode::ReadWrite)]
fn mode_parses(#[case] text: &str, #[case] expected: AccessMode) {
    assert_eq!(text.parse::<AccessMode>().unwrap(), expected);
}

#[test]
fn mode_rejects_unknown() {
    let err = "rx".parse::<AccessMode>().unwrap_err();
    assert!(err.to_string().contains("rx"));
}

#[rstest]
#[case(AccessMode::ReadOnly, true, false)]
#[case(AccessMode::WriteOnly, false, true)]
#[case(AccessMode::ReadWrite, true, true)]
fn mode_permissions(#[case] mode: AccessMode, #[case] read: bool, #[case] write: bool) {
    assert_eq!(mode.can_read(), read);
    assert_eq!(mode.can_write(), write);
    assert_eq!(mode.permits(AccessType::Read), read);
    assert_eq!(mode.permits(AccessType::Write), write);
}

#[test]
fn mode_display_round_trips() {
    for mode in [AccessMode::ReadOnly, AccessMode::WriteOnly, AccessMode::ReadWrite] {
        assert_eq!(mode.to_string().parse::<AccessMode>().unwrap(), mode);
    }
}

// ══════════════════════════════════════════════════════════
// 2. Controller-side access
// ══════════════════════════════════════════════════════════

#[test]
fn read_write_register_round_trip() {
    let mut reg = Register::new("select", 0x00, 8, AccessMode::ReadWrite);
    reg.write(0x03).unwrap();
    assert_eq!(reg.read().unwrap(), 0x03);
}

#[test]
fn write_to_read_only_is_violation() {
    let mut reg = Register::new("id", 0x04, 8, AccessMode::ReadOnly);
    let err = reg.write(1).unwrap_err();
    assert_eq!(
        err,
        BusError::AccessViolation {
            name: "id".into(),
            address: 0x04,
            access: AccessType::Write,
            mode: AccessMode::ReadOnly,
        }
    );
    assert_eq!(reg.value(), 0);
}

#[test]
fn read_of_write_only_is_violation() {
    let reg = Register::new("command", 0x01, 8, AccessMode::WriteOnly);
    assert!(matches!(
        reg.read(),
        Err(BusError::AccessViolation {
            access: AccessType::Read,
            ..
        })
    ));
}

#[test]
fn write_masks_to_width() {
    let mut reg = Register::new("nibble", 0x00, 4, AccessMode::ReadWrite);
    reg.write(0xAB).unwrap();
    assert_eq!(reg.read().unwrap(), 0x0B);
}

#[test]
fn full_width_register_keeps_all_bits() {
    let mut reg = Register::new("wide", 0x00, 64, AccessMode::ReadWrite);
    reg.write(u64::MAX).unwrap();
    assert_eq!(reg.read().unwrap(), u64::MAX);
}

// ══════════════════════════════════════════════════════════
// 3. Peripheral-side access and reset
// ══════════════════════════════════════════════════════════

#[test]
fn set_bypasses_mode() {
    let mut reg = Register::new("status", 0x00, 8, AccessMode::ReadOnly);
    reg.set(0x1FF);
    assert_eq!(reg.value(), 0xFF);
    assert_eq!(reg.read().unwrap(), 0xFF);
}

#[test]
fn reset_restores_reset_value() {
    let mut reg = Register::new("ctrl", 0x00, 8, AccessMode::ReadWrite).with_reset(0x5A);
    assert_eq!(reg.value(), 0x5A);
    reg.write(0x00).unwrap();
    reg.reset();
    assert_eq!(reg.value(), 0x5A);
    assert_eq!(reg.reset_value(), 0x5A);
}

#[test]
fn reset_value_is_masked() {
    let reg = Register::new("ctrl", 0x00, 4, AccessMode::ReadWrite).with_reset(0xF3);
    assert_eq!(reg.reset_value(), 0x3);
}

#[test]
fn clone_is_independent() {
    let mut a = Register::new("select", 0x00, 8, AccessMode::ReadWrite);
    let b = a.clone();
    a.write(7).unwrap();
    assert_eq!(b.value(), 0);
}
