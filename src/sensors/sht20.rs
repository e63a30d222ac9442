//! DFRobot SHT20 humidity / temperature sensor (I2C, address 0x40).
//!
//! Measurements use the hold-master commands: the sensor stretches the
//! clock until conversion completes, so one `write_read` returns the
//! result.  Every result is two data bytes (big-endian, low two bits are
//! status) followed by a CRC-8 (polynomial x^8 + x^5 + x^4 + 1).
//!
//! The driver does not own the bus; callers pass it per transaction so
//! the SHT20 and TSL2591 can share one I2C peripheral.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::info;

use crate::error::SensorError;

pub const SHT20_ADDR: u8 = 0x40;

const CMD_TRIGGER_TEMP_HOLD: u8 = 0xE3;
const CMD_TRIGGER_HUMD_HOLD: u8 = 0xE5;
const CMD_READ_USER_REG: u8 = 0xE7;
const CMD_SOFT_RESET: u8 = 0xFE;

/// Soft reset completes within 15 ms.
const SOFT_RESET_MS: u32 = 15;

const STATUS_MASK: u16 = 0x0003;

/// Sentinel reported when the sensor does not answer.
pub const ERROR_I2C_TIMEOUT: f32 = 998.0;
/// Sentinel reported when the checksum does not match.
pub const ERROR_BAD_CRC: f32 = 999.0;

/// Decoded user register (datasheet table 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRegister(pub u8);

impl UserRegister {
    pub fn end_of_battery(self) -> bool {
        self.0 & 0x40 != 0
    }

    pub fn heater_enabled(self) -> bool {
        self.0 & 0x04 != 0
    }

    pub fn otp_reload_disabled(self) -> bool {
        self.0 & 0x02 != 0
    }
}

pub struct Sht20 {
    address: u8,
}

impl Default for Sht20 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sht20 {
    pub fn new() -> Self {
        Self {
            address: SHT20_ADDR,
        }
    }

    /// Soft-reset the sensor and report its user register.
    pub fn init<I: I2c>(
        &mut self,
        i2c: &mut I,
        delay: &mut impl DelayNs,
    ) -> Result<UserRegister, SensorError> {
        i2c.write(self.address, &[CMD_SOFT_RESET])
            .map_err(|_| SensorError::I2cFailed)?;
        delay.delay_ms(SOFT_RESET_MS);

        let mut reg = [0u8; 1];
        i2c.write_read(self.address, &[CMD_READ_USER_REG], &mut reg)
            .map_err(|_| SensorError::I2cFailed)?;
        let reg = UserRegister(reg[0]);

        info!(
            "SHT20: end_of_battery={} heater={} otp_reload_disabled={}",
            reg.end_of_battery(),
            reg.heater_enabled(),
            reg.otp_reload_disabled()
        );
        Ok(reg)
    }

    /// Relative humidity in percent.
    pub fn read_humidity<I: I2c>(&self, i2c: &mut I) -> Result<f32, SensorError> {
        let raw = self.measure(i2c, CMD_TRIGGER_HUMD_HOLD)?;
        Ok(-6.0 + 125.0 * f32::from(raw) / 65536.0)
    }

    /// Temperature in degrees Celsius.
    pub fn read_temperature<I: I2c>(&self, i2c: &mut I) -> Result<f32, SensorError> {
        let raw = self.measure(i2c, CMD_TRIGGER_TEMP_HOLD)?;
        Ok(-46.85 + 175.72 * f32::from(raw) / 65536.0)
    }

    fn measure<I: I2c>(&self, i2c: &mut I, cmd: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 3];
        i2c.write_read(self.address, &[cmd], &mut buf)
            .map_err(|_| SensorError::I2cFailed)?;
        if crc8(&buf[..2]) != buf[2] {
            return Err(SensorError::BadCrc);
        }
        Ok(u16::from_be_bytes([buf[0], buf[1]]) & !STATUS_MASK)
    }
}

/// Map a read failure to the value reported on the wire.
pub fn sentinel(e: SensorError) -> f32 {
    match e {
        SensorError::BadCrc => ERROR_BAD_CRC,
        _ => ERROR_I2C_TIMEOUT,
    }
}

/// Sensirion CRC-8, polynomial 0x31, initial value 0.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}
