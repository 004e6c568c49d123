//! LMX2433 Synthesizer Driver Tests
//!
//! Frame encoding, wire sequence and divider arithmetic.
//! Run with: cargo test --test lmx2433_tests

mod common;

use embedded_hal::digital::OutputPin;

use common::{BrokenPin, Frame, NoDelay, RecordingPin, SerialBus};
use wavebubble::config::{HIGH_BAND_MAX_MHZ, LOW_BAND_MIN_MHZ};
use wavebubble::drivers::lmx2433::{
    Divider, Lmx2433, MuxOutput, Register, RegisterWord, SynthStage, Synthesizer,
};
use wavebubble::drivers::RegisterError;
use wavebubble::types::{Prescaler, VcoBand};

type BusSynth = Lmx2433<common::BusPin, common::BusPin, common::BusPin, NoDelay>;

fn synth_on_bus() -> (BusSynth, SerialBus) {
    let bus = SerialBus::new();
    let synth = Lmx2433::new(bus.clock(), bus.data(), bus.latch(), NoDelay);
    (synth, bus)
}

fn frame(value: u32) -> Frame {
    Frame { value, bits: 24 }
}

// =============================================================================
// Register Tests
// =============================================================================

#[test]
fn register_addresses_round_trip() {
    for addr in 0..=5u8 {
        let register = Register::try_from(addr).unwrap();
        assert_eq!(register.address(), addr);
    }
}

#[test]
fn register_addresses_above_five_rejected() {
    assert_eq!(Register::try_from(6), Err(RegisterError::InvalidAddress));
    assert_eq!(Register::try_from(7), Err(RegisterError::InvalidAddress));
    assert_eq!(Register::try_from(255), Err(RegisterError::InvalidAddress));
}

#[test]
fn stage_follows_band() {
    assert_eq!(SynthStage::for_band(VcoBand::High), SynthStage::Rf);
    assert_eq!(SynthStage::for_band(VcoBand::Low), SynthStage::If);
    assert_eq!(SynthStage::Rf.n_register(), Register::RfN);
    assert_eq!(SynthStage::If.n_register(), Register::IfN);
}

// =============================================================================
// Frame Encoding Tests
// =============================================================================

#[test]
fn address_in_low_three_bits() {
    let word = RegisterWord::toc_disabled(Register::IfToc);
    assert_eq!(word.frame(), 5);
}

#[test]
fn frame_truncated_to_24_bits() {
    let word = RegisterWord {
        payload: 0xFF00_0010,
        register: Register::RfR,
    };
    assert_eq!(word.frame(), 0x10);
}

#[test]
fn reference_word_splits_mux_select() {
    // R = 10 at bit 3; mux 15 = 0b1111, two bits in each register
    let if_r = RegisterWord::reference(Register::IfR, 10, MuxOutput::RfNDivBy2);
    let rf_r = RegisterWord::reference(Register::RfR, 10, MuxOutput::RfNDivBy2);
    assert_eq!(if_r.frame(), 0x00C0_0053);
    assert_eq!(rf_r.frame(), 0x00C0_0050);

    // mux 5 = 0b0101: low bits 01 in R0, high bits 01 in R3
    let if_r = RegisterWord::reference(Register::IfR, 10, MuxOutput::IfDigitalLock);
    let rf_r = RegisterWord::reference(Register::RfR, 10, MuxOutput::IfDigitalLock);
    assert_eq!(if_r.frame() >> 22, 1);
    assert_eq!(rf_r.frame() >> 22, 1);
}

#[test]
fn n_payload_fields() {
    // 1001 MHz / 8: B = 125, A = 1
    let divider = Divider::for_frequency(1001, Prescaler::Eight);
    assert_eq!((divider.b, divider.a), (125, 1));
    let payload = divider.payload(SynthStage::Rf);
    assert_eq!(payload, (125 << 7) | (1 << 3));

    // Prescaler select at bit 22, power-down bit 23 stays clear
    let divider = Divider::for_frequency(2000, Prescaler::Sixteen);
    let payload = divider.payload(SynthStage::Rf);
    assert_eq!(payload, (1 << 22) | (125 << 7));
    assert_eq!(payload & (1 << 23), 0);
}

#[test]
fn if_stage_b_counter_narrower() {
    let divider = Divider {
        b: 0x7FFF,
        a: 0,
        prescaler: Prescaler::Eight,
    };
    assert_eq!(divider.payload(SynthStage::Rf) >> 7, 0x7FFF);
    assert_eq!(divider.payload(SynthStage::If) >> 7, 0x3FFF);
}

// =============================================================================
// Divider Tests
// =============================================================================

#[test]
fn divider_reconstructs_every_band_frequency() {
    for prescaler in [Prescaler::Eight, Prescaler::Sixteen] {
        for mhz in LOW_BAND_MIN_MHZ..=HIGH_BAND_MAX_MHZ {
            let divider = Divider::for_frequency(mhz, prescaler);
            assert!(divider.b >= Divider::MIN_B, "{mhz} MHz: B = {}", divider.b);
            assert!(divider.a < prescaler.modulus());
            assert_eq!(divider.n(), u32::from(mhz), "{mhz} MHz with {prescaler:?}");
        }
    }
}

#[test]
fn divider_b_floor() {
    let divider = Divider::for_frequency(16, Prescaler::Eight);
    assert_eq!(divider.b, 3);
    assert_eq!(divider.a, 0);

    let divider = Divider::for_frequency(0, Prescaler::Sixteen);
    assert_eq!(divider.b, 3);
}

// =============================================================================
// Wire Sequence Tests
// =============================================================================

#[test]
fn send_shifts_msb_first() {
    let (mut synth, bus) = synth_on_bus();
    synth.send(0x00A5_5A00, 1).unwrap();
    assert_eq!(bus.frames(), vec![frame(0x00A5_5A01)]);
}

#[test]
fn send_rejects_invalid_address_without_touching_bus() {
    let (mut synth, bus) = synth_on_bus();
    assert_eq!(synth.send(0x1234, 6), Err(RegisterError::InvalidAddress));
    assert!(bus.frames().is_empty());
    assert_eq!(bus.pending_bits(), 0);
}

#[test]
fn data_line_returns_low() {
    let (mut synth, bus) = synth_on_bus();
    synth.send(0x00FF_FFF8, 0).unwrap();
    assert!(!bus.data_level());
}

#[test]
fn init_sequence() {
    let (mut synth, bus) = synth_on_bus();
    synth.init().unwrap();
    assert_eq!(
        bus.frames(),
        vec![frame(2), frame(5), frame(0x00C0_0053), frame(0x00C0_0050)]
    );
}

#[test]
fn set_frequency_writes_n_register() {
    let (mut synth, bus) = synth_on_bus();

    let divider = synth
        .set_frequency(SynthStage::Rf, 2000, Prescaler::Eight)
        .unwrap();
    assert_eq!((divider.b, divider.a), (250, 0));

    synth
        .set_frequency(SynthStage::If, 1200, Prescaler::Eight)
        .unwrap();

    assert_eq!(
        bus.frames(),
        vec![frame((250 << 7) | 1), frame((150 << 7) | 4)]
    );
}

#[test]
fn pin_failure_reported() {
    let mut synth = Lmx2433::new(RecordingPin::new(), BrokenPin, RecordingPin::new(), NoDelay);
    assert_eq!(synth.send(0, 0), Err(RegisterError::Pin));
}

#[test]
fn release_returns_lines() {
    let (synth, bus) = synth_on_bus();
    let (mut clk, _data, _le, _delay) = synth.release();
    clk.set_high().unwrap();
    assert_eq!(bus.pending_bits(), 1);
}
