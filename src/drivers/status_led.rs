//! Two-LED status indicator.
//!
//! Discrete red and white LEDs on plain GPIO outputs:
//! - red  : transport error / disconnected
//! - white: message sent successfully
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIOs via hw_init.
//! On host/test: tracks state in-memory only.

use embedded_hal::delay::DelayNs;

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    Red,
    White,
}

impl Led {
    fn gpio(self) -> i32 {
        match self {
            Self::Red => pins::LED_RED_GPIO,
            Self::White => pins::LED_WHITE_GPIO,
        }
    }
}

pub struct StatusLeds {
    red_on: bool,
    white_on: bool,
    blinks: u32,
}

impl Default for StatusLeds {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLeds {
    pub fn new() -> Self {
        Self {
            red_on: false,
            white_on: false,
            blinks: 0,
        }
    }

    pub fn set(&mut self, led: Led, on: bool) {
        hw_init::gpio_write(led.gpio(), on);
        match led {
            Led::Red => self.red_on = on,
            Led::White => self.white_on = on,
        }
    }

    /// Light `led` for `ms` milliseconds, blocking.
    pub fn blink(&mut self, led: Led, ms: u32, delay: &mut impl DelayNs) {
        self.set(led, true);
        delay.delay_ms(ms);
        self.set(led, false);
        self.blinks = self.blinks.wrapping_add(1);
    }

    pub fn is_on(&self, led: Led) -> bool {
        match led {
            Led::Red => self.red_on,
            Led::White => self.white_on,
        }
    }

    /// Blinks performed since construction.
    pub fn blink_count(&self) -> u32 {
        self.blinks
    }
}
