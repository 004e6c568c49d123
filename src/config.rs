//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the Wave Bubble hardware.
//! Band limits, calibration timing, front-panel timing, storage geometry and
//! pin mappings are centralized here.

use crate::types::Prescaler;

/// System tick period in milliseconds (one tick per counter decrement)
pub const TICK_PERIOD_MS: u32 = 1;

/// Lowest frequency the low band VCO can reach in MHz
pub const LOW_BAND_MIN_MHZ: u16 = 345;

/// Highest frequency the low band VCO can reach in MHz
pub const LOW_BAND_MAX_MHZ: u16 = 1350;

/// Lowest frequency the high band VCO can reach in MHz
pub const HIGH_BAND_MIN_MHZ: u16 = 1225;

/// Highest frequency the high band VCO can reach in MHz
pub const HIGH_BAND_MAX_MHZ: u16 = 2715;

/// Number of program slots in non-volatile storage
pub const MAX_PROGRAMS: usize = 5;

/// Size of the emulated EEPROM in bytes
pub const STORAGE_CAPACITY: usize = 512;

/// Marker stored at a fixed offset once storage has been initialized
pub const VALIDITY_MARKER: u16 = 0xEFBE;

/// PLL reference divider (10 MHz oscillator down to 1 MHz comparison)
pub const PLL_REFERENCE_DIVIDER: u16 = 10;

/// Prescaler used for center-frequency and bandwidth calibration
pub const CALIBRATION_PRESCALER: Prescaler = Prescaler::Eight;

/// Full-scale tuning voltage PWM duty
pub const PWM_MAX_DUTY: u16 = 4095;

/// Tuning voltage used to check the bottom of the VCO range
pub const PWM_LOW_RAIL: u16 = 10;

/// Full-scale bandwidth potentiometer value
pub const POT_MAX: u8 = 255;

/// Wait after any tuning change before lock is trusted
pub const SETTLE_DELAY_MS: u16 = 500;

/// Wait before sampling the full-lock baseline
pub const BASELINE_SETTLE_MS: u16 = 100;

/// Second look at lock-detect to reject a transient glitch
pub const GLITCH_RECHECK_MS: u16 = 1;

/// ADC samples averaged per lock-strength measurement
pub const LOCK_STRENGTH_SAMPLES: usize = 128;

/// Drop below baseline (ADC counts) that marks the bandwidth as too wide
pub const BANDWIDTH_MARGIN: u16 = 10;

/// Longest press, in milliseconds, that still counts as a short press
pub const SHORT_PRESS_MAX_MS: u32 = 800;

/// Longest press, in milliseconds, that still counts as a long press
pub const LONG_PRESS_MAX_MS: u32 = 5000;

/// LED on time per blink
pub const LED_ON_MS: u16 = 100;

/// LED off time between blinks
pub const LED_OFF_MS: u16 = 300;

/// Pause after the blink group
pub const LED_PAUSE_MS: u16 = 1000;

/// Battery ADC reading that must be exceeded to count as healthy
pub const BATTERY_THRESHOLD: u16 = 310;

/// Ticks of continuous low battery tolerated before forced power-off
pub const LOW_BATTERY_GRACE_TICKS: u16 = 100;

/// Delay between the power-off announcement and releasing the supply
pub const POWER_OFF_DELAY_MS: u16 = 300;

/// Time the key must be held before the supply is latched on
pub const POWER_ON_HOLD_MS: u32 = 2000;

/// Window after boot during which a console byte enters the menu
pub const MENU_WINDOW_MS: u16 = 2000;

/// Console baud rate
pub const CONSOLE_BAUD: u32 = 19_200;

/// ADC channel assignments
pub mod adc {
    //! ADC multiplexer channels

    /// High band VCO lock-strength feedback
    pub const HIGH_BAND_LOCK_STRENGTH: u8 = 0;

    /// Low band VCO lock-strength feedback
    pub const LOW_BAND_LOCK_STRENGTH: u8 = 5;

    /// Battery voltage divider
    pub const BATTERY: u8 = 6;
}

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED
    pub const LED_STATUS: &str = "PA5";

    /// Program key (active low with pull-up)
    pub const PROGRAM_KEY: &str = "PB8";

    /// Supply hold line (high keeps the device powered)
    pub const POWER_HOLD: &str = "PB9";

    /// Synthesizer CLK
    pub const PLL_CLK: &str = "PB3";

    /// Synthesizer DATA
    pub const PLL_DATA: &str = "PB4";

    /// Synthesizer latch enable
    pub const PLL_LE: &str = "PB5";

    /// RF stage lock detect input
    pub const PLL_RF_LOCK: &str = "PC3";

    /// IF stage lock detect input
    pub const PLL_IF_LOCK: &str = "PC4";

    /// Potentiometer serial clock
    pub const POT_CLK: &str = "PC0";

    /// Potentiometer serial data
    pub const POT_SDI: &str = "PC1";

    /// Potentiometer chip select
    pub const POT_CS: &str = "PC2";

    /// High band VCO and gain stage supply switch
    pub const VCO_HIGH_POWER: &str = "PC5";

    /// Low band VCO and gain stage supply switch
    pub const VCO_LOW_POWER: &str = "PC6";

    /// Sawtooth frequency select (input = low mode, driven high = high mode)
    pub const SWEEP_SELECT: &str = "PC7";

    /// Tuning voltage PWM, high band (TIM1 CH1)
    pub const TUNE_HIGH_PWM: &str = "PA8";

    /// Tuning voltage PWM, low band (TIM1 CH2)
    pub const TUNE_LOW_PWM: &str = "PA9";

    /// High band lock-strength ADC input
    pub const HIGH_LOCK_STRENGTH_ADC: &str = "PA0";

    /// Low band lock-strength ADC input
    pub const LOW_LOCK_STRENGTH_ADC: &str = "PA1";

    /// Battery divider ADC input
    pub const BATTERY_ADC: &str = "PB0";

    /// Console USART TX
    pub const CONSOLE_TX: &str = "PB6";

    /// Console USART RX
    pub const CONSOLE_RX: &str = "PB7";
}

/// Flash emulation of the EEPROM
pub mod flash {
    //! Location of the program store in on-chip flash

    /// Offset of the store page from the start of flash (last 2 KiB page)
    pub const STORE_OFFSET: u32 = 0x7F800;

    /// Erase granularity of the on-chip flash
    pub const PAGE_SIZE: usize = 2048;
}
