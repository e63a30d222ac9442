//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns the shared I2C bus and every driver, and implements
//! [`SensorPort`].  Failed reads are logged and replaced by the driver's
//! sentinel value; the session forwards whatever it gets.

pub mod sen0308;
pub mod sht20;
pub mod tsl2591;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::app::ports::SensorPort;
use sen0308::Sen0308;
use sht20::Sht20;
use tsl2591::Tsl2591;

/// Reported when the light sensor cannot be read.
pub const LIGHT_READ_FAILED: u16 = 0;

/// A point-in-time snapshot of every sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReadings {
    /// SHT20 relative humidity (%), or a sentinel.
    pub humidity_pct: f32,
    /// SHT20 temperature (°C), or a sentinel.
    pub temperature_c: f32,
    /// SEN0308 raw ADC count (0 – 4095).
    pub soil_raw: u16,
    /// TSL2591 visible-channel count.
    pub visible_light: u16,
}

/// Which sensors answered during [`SensorHub::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    pub sht20_ok: bool,
    pub tsl2591_ok: bool,
}

/// Aggregates all sensor drivers behind one I2C bus.
pub struct SensorHub<I> {
    i2c: I,
    pub sht20: Sht20,
    pub tsl2591: Tsl2591,
    pub sen0308: Sen0308,
}

impl<I: I2c> SensorHub<I> {
    pub fn new(i2c: I, sht20: Sht20, tsl2591: Tsl2591, sen0308: Sen0308) -> Self {
        Self {
            i2c,
            sht20,
            tsl2591,
            sen0308,
        }
    }

    /// Bring up every sensor.  A missing sensor is logged, not fatal:
    /// its readings will carry sentinel values.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> InitReport {
        info!("Starting DFRobot SHT20 configuration...");
        let sht20_ok = match self.sht20.init(&mut self.i2c, delay) {
            Ok(_) => true,
            Err(e) => {
                warn!("SHT20 init failed: {}", e);
                false
            }
        };

        info!("Starting Adafruit TSL2591 configuration...");
        let tsl2591_ok = match self.tsl2591.begin(&mut self.i2c) {
            Ok(()) => {
                info!("TSL2591 sensor found");
                true
            }
            Err(e) => {
                warn!("TSL2591 sensor not found: {}", e);
                false
            }
        };

        InitReport {
            sht20_ok,
            tsl2591_ok,
        }
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> SensorPort for SensorHub<I> {
    fn read_humidity(&mut self) -> f32 {
        self.sht20.read_humidity(&mut self.i2c).unwrap_or_else(|e| {
            warn!("SHT20 humidity read failed: {}", e);
            sht20::sentinel(e)
        })
    }

    fn read_temperature(&mut self) -> f32 {
        self.sht20.read_temperature(&mut self.i2c).unwrap_or_else(|e| {
            warn!("SHT20 temperature read failed: {}", e);
            sht20::sentinel(e)
        })
    }

    fn read_analog_channel(&mut self, gpio: i32) -> u16 {
        if gpio == self.sen0308.gpio() {
            self.sen0308.read()
        } else {
            sen0308::read_analog(gpio)
        }
    }

    fn read_luminosity(&mut self) -> u16 {
        self.tsl2591.read_visible(&mut self.i2c).unwrap_or_else(|e| {
            warn!("TSL2591 read failed: {}", e);
            LIGHT_READ_FAILED
        })
    }
}
