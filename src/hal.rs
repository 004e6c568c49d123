//! Hardware Abstraction Layer
//!
//! Board-independent seams over the peripherals the firmware touches.
//! The traits here are implemented by the STM32 bindings in `board` on
//! target and by simulated hardware in the host tests.

pub mod adc;
pub mod gpio;
pub mod pwm;
pub mod timer;
