//! ADC Sampling
//!
//! Single-conversion reads on a selectable channel, plus the averaged
//! lock-strength measurement used during bandwidth calibration.

/// An ADC with a channel multiplexer
pub trait AnalogInput {
    /// Start a conversion on `channel` and return the raw result
    fn read(&mut self, channel: u8) -> u16;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read(&mut self, channel: u8) -> u16 {
        (**self).read(channel)
    }
}

/// Average `samples` conversions on one channel
///
/// The sum is held in a 32-bit accumulator, so any 16-bit sample stream of
/// up to 65536 samples is summed without overflow.
pub fn average<A: AnalogInput + ?Sized>(adc: &mut A, channel: u8, samples: usize) -> u16 {
    if samples == 0 {
        return 0;
    }
    let mut sum: u32 = 0;
    for _ in 0..samples {
        sum = sum.saturating_add(u32::from(adc.read(channel)));
    }
    let count = u32::try_from(samples).unwrap_or(u32::MAX);
    u16::try_from(sum / count).unwrap_or(u16::MAX)
}
