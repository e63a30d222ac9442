//! DFRobot SEN0308 capacitive humidity probe: analog output.
//!
//! The probe's voltage is sampled by ADC1 and reported as the raw
//! 12-bit count; no calibration curve is applied on the device.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads the simulated channel set with
//! [`hw_init::sim_set_adc1`](crate::drivers::hw_init::sim_set_adc1).

use log::warn;

use crate::drivers::hw_init;
use crate::pins;

pub struct Sen0308 {
    gpio: i32,
}

impl Sen0308 {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Raw ADC count on the probe's pin.
    pub fn read(&self) -> u16 {
        read_analog(self.gpio)
    }
}

/// Raw ADC1 count for `gpio`; 0 for pins without an ADC1 channel.
pub fn read_analog(gpio: i32) -> u16 {
    match pins::adc1_channel(gpio) {
        Some(channel) => hw_init::adc1_read(channel),
        None => {
            warn!("GPIO{} has no ADC1 channel", gpio);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_simulated_channel() {
        hw_init::sim_set_adc1(pins::adc1_channel(35).unwrap(), 3001);
        assert_eq!(Sen0308::new(35).read(), 3001);
    }

    #[test]
    fn pin_without_adc_reads_zero() {
        assert_eq!(read_analog(2), 0);
    }
}
