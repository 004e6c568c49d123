//! Configuration Tests
//!
//! Sanity checks on the compile-time constants.
//! Run with: cargo test --test config_tests

use wavebubble::config::*;
use wavebubble::store::layout::USED_SIZE;

// =============================================================================
// Band Tests
// =============================================================================

#[test]
fn bands_ordered() {
    assert!(LOW_BAND_MIN_MHZ < LOW_BAND_MAX_MHZ);
    assert!(HIGH_BAND_MIN_MHZ < HIGH_BAND_MAX_MHZ);
    assert!(LOW_BAND_MIN_MHZ < HIGH_BAND_MIN_MHZ);
}

#[test]
fn reference_divider_gives_one_mhz() {
    // 10 MHz reference
    assert_eq!(10 / PLL_REFERENCE_DIVIDER, 1);
}

// =============================================================================
// Calibration Tests
// =============================================================================

#[test]
fn low_rail_inside_pwm_range() {
    assert!(PWM_LOW_RAIL > 0);
    assert!(PWM_LOW_RAIL < PWM_MAX_DUTY);
}

#[test]
fn lock_strength_average_fits_accumulator() {
    let worst = LOCK_STRENGTH_SAMPLES as u64 * u64::from(u16::MAX);
    assert!(worst <= u64::from(u32::MAX));
}

#[test]
fn settle_longer_than_recheck() {
    assert!(SETTLE_DELAY_MS > GLITCH_RECHECK_MS);
    assert!(SETTLE_DELAY_MS >= BASELINE_SETTLE_MS);
}

// =============================================================================
// Front Panel Tests
// =============================================================================

#[test]
fn press_windows_ordered() {
    assert!(SHORT_PRESS_MAX_MS < LONG_PRESS_MAX_MS);
    assert!(POWER_ON_HOLD_MS > SHORT_PRESS_MAX_MS);
}

#[test]
fn tick_is_one_millisecond() {
    assert_eq!(TICK_PERIOD_MS, 1);
}

#[test]
fn led_phases_nonzero() {
    assert!(LED_ON_MS > 0 && LED_OFF_MS > 0 && LED_PAUSE_MS > LED_OFF_MS);
}

// =============================================================================
// Storage Tests
// =============================================================================

#[test]
fn programs_fit_storage() {
    assert_eq!(MAX_PROGRAMS, 5);
    assert!(USED_SIZE <= STORAGE_CAPACITY);
}

#[test]
fn store_window_inside_page() {
    assert!(STORAGE_CAPACITY <= flash::PAGE_SIZE);
    assert_eq!(flash::STORE_OFFSET as usize % flash::PAGE_SIZE, 0);
}

#[test]
fn marker_not_erased_flash() {
    assert_ne!(VALIDITY_MARKER, 0xFFFF);
    assert_ne!(VALIDITY_MARKER, 0x0000);
}

// =============================================================================
// Pin and Channel Tests
// =============================================================================

#[test]
fn adc_channels_distinct() {
    assert_ne!(adc::HIGH_BAND_LOCK_STRENGTH, adc::LOW_BAND_LOCK_STRENGTH);
    assert_ne!(adc::BATTERY, adc::HIGH_BAND_LOCK_STRENGTH);
    assert_ne!(adc::BATTERY, adc::LOW_BAND_LOCK_STRENGTH);
}

#[test]
fn pll_pins_defined() {
    assert!(!pins::PLL_CLK.is_empty());
    assert!(!pins::PLL_DATA.is_empty());
    assert!(!pins::PLL_LE.is_empty());
}

#[test]
fn pot_pins_defined() {
    assert!(!pins::POT_CLK.is_empty());
    assert!(!pins::POT_SDI.is_empty());
    assert!(!pins::POT_CS.is_empty());
}

#[test]
fn front_panel_pins_distinct() {
    assert_ne!(pins::LED_STATUS, pins::PROGRAM_KEY);
    assert_ne!(pins::PROGRAM_KEY, pins::POWER_HOLD);
}
