//! Wave Bubble Firmware Library
//!
//! Core of a self-tuning, dual-VCO sweep synthesizer. Two VCOs (high band
//! 1225-2715 MHz, low band 345-1350 MHz) are swept by a sawtooth around a
//! center frequency. Each stored program names a frequency range per VCO;
//! the firmware calibrates the tuning voltage and sweep amplitude for it
//! with a closed loop through an `LMX2433` PLL and keeps the result in
//! non-volatile storage.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Foreground loop (app)  │  Console menu  │  Bench commands   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     CONTROL LAYER                            │
//! │  Auto-tuning  │  Program store  │  Key / LED / battery       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  LMX2433  │  AD8402  │  PWM  │  ADC  │  GPIO  │  Tick        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │   embassy-rs: 1 ms tick executor + blocking foreground       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Hardware behind traits**: every peripheral the control layer touches
//!   is an `embedded-hal` pin or a small local trait, so the whole control
//!   layer runs on the host against simulated hardware
//! - **Atomics at the interrupt boundary**: the tick only decrements shared
//!   counters; all waiting happens in the foreground
//! - **No unsafe in application code**: All unsafe isolated in the
//!   executor glue of the binary
//! - **Explicit error handling**: All fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must come first so the logging macros are visible to every module
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Timer counters, tuning-voltage PWM, ADC and GPIO seams.
pub mod hal;

/// Peripheral Drivers
///
/// Bit-banged drivers for the `LMX2433` PLL and `AD8402` potentiometer.
pub mod drivers;

/// Auto-Tuning Engine
///
/// Tuning voltage and bandwidth calibration.
pub mod tuning;

/// Program Store
///
/// Persistent program list with validity marker.
pub mod store;

/// Real-Time Scheduler
///
/// Key, LED and battery state machines.
pub mod scheduler;

/// Power Management
///
/// Battery cutoff and the supply hold line.
pub mod power;

/// Console
///
/// Maintenance menu, add-program wizard and bench commands.
pub mod console;

/// Foreground application
pub mod app;

/// STM32G474 bindings for the HAL traits
#[cfg(feature = "embedded")]
pub mod board;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;
