//! AD8402 Potentiometer Driver Tests
//!
//! Run with: cargo test --test ad8402_tests

mod common;

use common::{BrokenPin, Frame, NoDelay, RecordingPin, SerialBus};
use wavebubble::drivers::ad8402::{frame, Ad8402, BandwidthPot, Rdac};
use wavebubble::drivers::RegisterError;
use wavebubble::types::VcoBand;

fn pot_on_bus() -> (
    Ad8402<common::BusPin, common::BusPin, common::BusPin, NoDelay>,
    SerialBus,
) {
    let bus = SerialBus::new();
    let pot = Ad8402::new(bus.clock(), bus.data(), bus.chip_select(), NoDelay).unwrap();
    (pot, bus)
}

fn wire(value: u32) -> Frame {
    Frame { value, bits: 10 }
}

// =============================================================================
// Frame Tests
// =============================================================================

#[test]
fn frame_address_above_value() {
    assert_eq!(frame(Rdac::Rdac1, 0), 0x000);
    assert_eq!(frame(Rdac::Rdac1, 0xFF), 0x0FF);
    assert_eq!(frame(Rdac::Rdac2, 0x00), 0x100);
    assert_eq!(frame(Rdac::Rdac2, 0xAB), 0x1AB);
}

#[test]
fn high_band_on_second_channel() {
    assert_eq!(Rdac::for_band(VcoBand::High), Rdac::Rdac2);
    assert_eq!(Rdac::for_band(VcoBand::Low), Rdac::Rdac1);
}

// =============================================================================
// Wire Sequence Tests
// =============================================================================

#[test]
fn construction_idles_chip_select_high() {
    let cs = RecordingPin::new();
    let _pot = Ad8402::new(RecordingPin::new(), RecordingPin::new(), cs.clone(), NoDelay).unwrap();
    assert_eq!(cs.levels(), vec![true]);
}

#[test]
fn set_resistor_ten_bits_within_chip_select() {
    let (mut pot, bus) = pot_on_bus();
    pot.set_resistor(Rdac::Rdac2, 0xAB).unwrap();
    pot.set_resistor(Rdac::Rdac1, 0x5A).unwrap();
    assert_eq!(bus.frames(), vec![wire(0x1AB), wire(0x05A)]);
}

#[test]
fn set_bandwidth_routes_band() {
    let (mut pot, bus) = pot_on_bus();
    pot.set_bandwidth(VcoBand::High, 200).unwrap();
    pot.set_bandwidth(VcoBand::Low, 7).unwrap();
    assert_eq!(bus.frames(), vec![wire(0x100 | 200), wire(7)]);
}

#[test]
fn chip_select_failure_reported() {
    let result = Ad8402::new(RecordingPin::new(), RecordingPin::new(), BrokenPin, NoDelay);
    assert!(matches!(result, Err(RegisterError::Pin)));
}

#[test]
fn data_line_failure_reported() {
    let mut pot = Ad8402::new(RecordingPin::new(), BrokenPin, RecordingPin::new(), NoDelay).unwrap();
    assert_eq!(pot.set_resistor(Rdac::Rdac1, 1), Err(RegisterError::Pin));
}
