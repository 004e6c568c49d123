//! STM32G474 bindings for the HAL traits
//!
//! Tuning voltage on TIM1 CH1/CH2, lock strength and battery on ADC1,
//! the program store in the last page of flash, the sweep select as a
//! pin that is either floating (pulled up) or driven high.

use embassy_stm32::adc::{Adc, AnyAdcChannel};
use embassy_stm32::flash::{Blocking, Flash};
use embassy_stm32::gpio::{Flex, Pull, Speed};
use embassy_stm32::peripherals::{ADC1, TIM1};
use embassy_stm32::timer::simple_pwm::SimplePwm;
use embedded_storage::nor_flash::RmwNorFlashStorage;
use embedded_storage::{ReadStorage, Storage};

use crate::config::{adc, flash, STORAGE_CAPACITY};
use crate::hal::adc::AnalogInput;
use crate::hal::gpio::{SweepControl, SweepMode};
use crate::hal::pwm::DutyOutput;
use crate::types::VcoBand;

/// TIM1 CH1 (high band) and CH2 (low band)
pub struct TuningPwm {
    pwm: SimplePwm<'static, TIM1>,
    max_duty: u16,
}

impl TuningPwm {
    /// Enable both channels at zero duty
    pub fn new(mut pwm: SimplePwm<'static, TIM1>, max_duty: u16) -> Self {
        pwm.ch1().enable();
        pwm.ch2().enable();
        Self { pwm, max_duty }
    }
}

impl DutyOutput for TuningPwm {
    fn set_duty(&mut self, band: VcoBand, duty: u16) {
        match band {
            VcoBand::High => self.pwm.ch1().set_duty_cycle_fraction(duty, self.max_duty),
            VcoBand::Low => self.pwm.ch2().set_duty_cycle_fraction(duty, self.max_duty),
        }
    }
}

/// ADC1 with the three analog inputs
pub struct BoardAdc {
    adc: Adc<'static, ADC1>,
    high: AnyAdcChannel<ADC1>,
    low: AnyAdcChannel<ADC1>,
    battery: AnyAdcChannel<ADC1>,
}

impl BoardAdc {
    /// Wrap the converter and its channels
    pub fn new(
        adc: Adc<'static, ADC1>,
        high: AnyAdcChannel<ADC1>,
        low: AnyAdcChannel<ADC1>,
        battery: AnyAdcChannel<ADC1>,
    ) -> Self {
        Self {
            adc,
            high,
            low,
            battery,
        }
    }
}

impl AnalogInput for BoardAdc {
    fn read(&mut self, channel: u8) -> u16 {
        match channel {
            adc::HIGH_BAND_LOCK_STRENGTH => self.adc.blocking_read(&mut self.high),
            adc::LOW_BAND_LOCK_STRENGTH => self.adc.blocking_read(&mut self.low),
            adc::BATTERY => self.adc.blocking_read(&mut self.battery),
            _ => 0,
        }
    }
}

/// Sawtooth select: input with pull-up for the slow sweep, driven high
/// for the fast one
pub struct SweepPin {
    pin: Flex<'static>,
}

impl SweepPin {
    /// Wrap the select pin, starting in the slow sweep
    pub fn new(pin: Flex<'static>) -> Self {
        let mut sweep = Self { pin };
        sweep.set_sweep(SweepMode::Low);
        sweep
    }
}

impl SweepControl for SweepPin {
    fn set_sweep(&mut self, mode: SweepMode) {
        match mode {
            SweepMode::Low => self.pin.set_as_input(Pull::Up),
            SweepMode::High => {
                self.pin.set_high();
                self.pin.set_as_output(Speed::Low);
            }
        }
    }
}

/// Merge buffer for read-modify-write of one flash page
pub type PageBuffer = [u8; flash::PAGE_SIZE];

/// Program store window in the last flash page
pub struct FlashStore {
    inner: RmwNorFlashStorage<'static, Flash<'static, Blocking>>,
}

impl FlashStore {
    /// Use `buffer` to merge partial page writes
    pub fn new(flash: Flash<'static, Blocking>, buffer: &'static mut PageBuffer) -> Self {
        Self {
            inner: RmwNorFlashStorage::new(flash, buffer),
        }
    }
}

impl ReadStorage for FlashStore {
    type Error = embassy_stm32::flash::Error;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.inner.read(flash::STORE_OFFSET + offset, bytes)
    }

    fn capacity(&self) -> usize {
        STORAGE_CAPACITY
    }
}

impl Storage for FlashStore {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.inner.write(flash::STORE_OFFSET + offset, bytes)
    }
}
