//! LED indicator adapter.
//!
//! Implements [`EventSink`] by blinking the status LEDs:
//!
//! | Event                         | LED   |
//! |-------------------------------|-------|
//! | `Boot(_)`                     | red   |
//! | `Connected`, `ResponseSent`   | white |
//! | `Disconnected`                | red   |
//! | `DecodeFailed`                | none  |
//!
//! Blinks are blocking: the session pauses for `blink_ms` each time.

use embedded_hal::delay::DelayNs;

use crate::app::events::NodeEvent;
use crate::app::ports::EventSink;
use crate::drivers::status_led::{Led, StatusLeds};

pub struct IndicatorSink<D> {
    leds: StatusLeds,
    delay: D,
    blink_ms: u32,
}

impl<D: DelayNs> IndicatorSink<D> {
    pub fn new(leds: StatusLeds, delay: D, blink_ms: u32) -> Self {
        Self {
            leds,
            delay,
            blink_ms,
        }
    }

    pub fn leds(&self) -> &StatusLeds {
        &self.leds
    }

    fn led_for(event: &NodeEvent) -> Option<Led> {
        match event {
            NodeEvent::Boot(_) | NodeEvent::Disconnected { .. } => Some(Led::Red),
            NodeEvent::Connected { .. } | NodeEvent::ResponseSent { .. } => Some(Led::White),
            NodeEvent::DecodeFailed(_) => None,
        }
    }
}

impl<D: DelayNs> EventSink for IndicatorSink<D> {
    fn emit(&mut self, event: &NodeEvent) {
        if let Some(led) = Self::led_for(event) {
            self.leds.blink(led, self.blink_ms, &mut self.delay);
        }
    }
}
