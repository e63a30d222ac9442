//! GPIO / peripheral pin assignments for the ESP32 sensor board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Status LEDs
// ---------------------------------------------------------------------------

/// Red LED: transport error / disconnected.
pub const LED_RED_GPIO: i32 = 5;
/// White LED: message sent.
pub const LED_WHITE_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// I2C bus (SHT20 @ 0x40, TSL2591 @ 0x29)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
pub const I2C_BAUDRATE_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Analog
// ---------------------------------------------------------------------------

/// DFRobot SEN0308 capacitive probe (ADC1 channel 6).
pub const SEN0308_ADC_GPIO: i32 = 34;

/// ADC1 channel wired to `gpio` on the ESP32, if any.
pub const fn adc1_channel(gpio: i32) -> Option<u32> {
    match gpio {
        36 => Some(0),
        37 => Some(1),
        38 => Some(2),
        39 => Some(3),
        32 => Some(4),
        33 => Some(5),
        34 => Some(6),
        35 => Some(7),
        _ => None,
    }
}
