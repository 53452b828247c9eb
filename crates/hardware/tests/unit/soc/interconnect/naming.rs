//! # Composed Name Tests
//!
//! Suffix counters, case normalization and default labels.

use crate::common::builder::led_regfile;
use crate::common::harness::{LED0_BASE, LED1_BASE};
use mmbus_core::soc::AddressSpace;
use pretty_assertions::assert_eq;

#[test]
fn led_scenario_names_and_addresses() {
    let mut space = AddressSpace::with_widths(8, 16);

    let first = space.add(&led_regfile(), "led", LED0_BASE).unwrap();
    assert_eq!(first.name(), "LED_000");
    assert_eq!(first.span(), Some((0x8240, 0x8240)));
    assert_eq!(
        space.regfile(&first).unwrap().get("select").unwrap().address(),
        0x8240
    );

    let second = space.add(&led_regfile(), "led", LED1_BASE).unwrap();
    assert_eq!(second.name(), "LED_001");
    assert_eq!(
        space.regfile(&second).unwrap().get("select").unwrap().address(),
        0x8250
    );
}

#[test]
fn suffixes_increase_per_base_name() {
    let mut space = AddressSpace::with_widths(8, 16);
    let names: Vec<String> = (0..4)
        .map(|i| {
            space
                .add(&led_regfile(), "led", 0x100 + i * 0x10)
                .unwrap()
                .name()
                .to_string()
        })
        .collect();
    assert_eq!(names, vec!["LED_000", "LED_001", "LED_002", "LED_003"]);
}

#[test]
fn counters_are_independent_per_name() {
    let mut space = AddressSpace::with_widths(8, 16);
    let a = space.add(&led_regfile(), "led", 0x00).unwrap();
    let b = space.add(&led_regfile(), "uart", 0x10).unwrap();
    let c = space.add(&led_regfile(), "led", 0x20).unwrap();
    let d = space.add(&led_regfile(), "uart", 0x30).unwrap();
    assert_eq!(
        [a.name(), b.name(), c.name(), d.name()],
        ["LED_000", "UART_000", "LED_001", "UART_001"]
    );
}

#[test]
fn names_are_case_normalized() {
    let mut space = AddressSpace::with_widths(8, 16);
    let a = space.add(&led_regfile(), "led", 0x00).unwrap();
    let b = space.add(&led_regfile(), "Led", 0x10).unwrap();
    let c = space.add(&led_regfile(), "LED", 0x20).unwrap();
    assert_eq!([a.name(), b.name(), c.name()], ["LED_000", "LED_001", "LED_002"]);
    assert!(space.regfile_by_name("led_001").is_some());
}

#[test]
fn unnamed_attachments_get_default_labels() {
    let mut space = AddressSpace::with_widths(8, 16);
    let a = space.add(&led_regfile(), "", 0x00).unwrap();
    let b = space.add(&led_regfile(), "", 0x10).unwrap();
    assert_eq!(a.name(), "0000_000");
    assert_eq!(b.name(), "0001_000");
}

#[test]
fn names_listed_in_attachment_order() {
    let mut space = AddressSpace::with_widths(8, 16);
    let _ = space.add(&led_regfile(), "timer", 0x00).unwrap();
    let _ = space.add(&led_regfile(), "led", 0x10).unwrap();
    let _ = space.add(&led_regfile(), "timer", 0x20).unwrap();
    let names: Vec<&str> = space.names().collect();
    assert_eq!(names, vec!["TIMER_000", "LED_000", "TIMER_001"]);
}

#[test]
fn handle_lookup_by_name() {
    let mut space = AddressSpace::with_widths(8, 16);
    let added = space.add(&led_regfile(), "led", LED0_BASE).unwrap();
    let found = space.handle("led_000").unwrap();
    assert_eq!(found, added);
    assert!(space.handle("LED_001").is_none());
}
