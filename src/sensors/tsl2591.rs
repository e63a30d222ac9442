//! Adafruit TSL2591 light sensor (I2C, address 0x29).
//!
//! Two photodiode channels: C0 (full spectrum) and C1 (infrared only).
//! Visible light is C0 − C1.  Gain and integration time are fixed at
//! startup; the ALS engine then integrates continuously and a read
//! returns the last completed cycle.

use embedded_hal::i2c::I2c;
use log::info;

use crate::error::SensorError;

pub const TSL2591_ADDR: u8 = 0x29;

/// Every register access sets CMD and the normal-operation transaction bits.
const COMMAND_BIT: u8 = 0xA0;

const REG_ENABLE: u8 = 0x00;
const REG_CONTROL: u8 = 0x01;
const REG_DEVICE_ID: u8 = 0x12;
const REG_C0DATAL: u8 = 0x14;

const ENABLE_POWERON: u8 = 0x01;
const ENABLE_AEN: u8 = 0x02;

const DEVICE_ID: u8 = 0x50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gain {
    Low = 0x00,
    Medium = 0x10,
    High = 0x20,
    Max = 0x30,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntegrationTime {
    Ms100 = 0x00,
    Ms200 = 0x01,
    Ms300 = 0x02,
    Ms400 = 0x03,
    Ms500 = 0x04,
    Ms600 = 0x05,
}

/// One raw read of both channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channels {
    pub full: u16,
    pub infrared: u16,
}

impl Channels {
    /// Visible-only count.  Wraps like the vendor library when IR
    /// exceeds full spectrum (saturation).
    pub fn visible(self) -> u16 {
        self.full.wrapping_sub(self.infrared)
    }
}

pub struct Tsl2591 {
    gain: Gain,
    integration: IntegrationTime,
}

impl Tsl2591 {
    pub fn new(gain: Gain, integration: IntegrationTime) -> Self {
        Self { gain, integration }
    }

    /// Verify the device ID, apply gain and timing, and power the ALS on.
    pub fn begin<I: I2c>(&mut self, i2c: &mut I) -> Result<(), SensorError> {
        let mut id = [0u8; 1];
        i2c.write_read(TSL2591_ADDR, &[COMMAND_BIT | REG_DEVICE_ID], &mut id)
            .map_err(|_| SensorError::I2cFailed)?;
        if id[0] != DEVICE_ID {
            return Err(SensorError::WrongDevice(id[0]));
        }

        let control = self.gain as u8 | self.integration as u8;
        i2c.write(TSL2591_ADDR, &[COMMAND_BIT | REG_CONTROL, control])
            .map_err(|_| SensorError::I2cFailed)?;
        i2c.write(
            TSL2591_ADDR,
            &[COMMAND_BIT | REG_ENABLE, ENABLE_POWERON | ENABLE_AEN],
        )
        .map_err(|_| SensorError::I2cFailed)?;

        info!(
            "TSL2591: gain={:?} integration={:?}",
            self.gain, self.integration
        );
        Ok(())
    }

    /// Read both channels in one auto-increment transaction.
    pub fn read_channels<I: I2c>(&self, i2c: &mut I) -> Result<Channels, SensorError> {
        let mut buf = [0u8; 4];
        i2c.write_read(TSL2591_ADDR, &[COMMAND_BIT | REG_C0DATAL], &mut buf)
            .map_err(|_| SensorError::I2cFailed)?;
        Ok(Channels {
            full: u16::from_le_bytes([buf[0], buf[1]]),
            infrared: u16::from_le_bytes([buf[2], buf[3]]),
        })
    }

    /// Visible luminosity count.
    pub fn read_visible<I: I2c>(&self, i2c: &mut I) -> Result<u16, SensorError> {
        self.read_channels(i2c).map(Channels::visible)
    }
}
