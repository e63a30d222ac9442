//! Port traits: the hexagonal boundary between the session logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SessionController (domain)
//! ```
//!
//! Driven adapters (sensors, socket, indicator, WiFi) implement these
//! traits.  The [`SessionController`](super::session::SessionController)
//! consumes them via generics, so the protocol core never touches
//! hardware directly.

use core::fmt;

use crate::pins;
use crate::sensors::SensorReadings;

use super::events::NodeEvent;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: blocking, synchronous sensor reads.
///
/// Implementations return a sentinel value on hardware faults rather
/// than an error; the session forwards whatever it is given.
pub trait SensorPort {
    /// Relative humidity (%) from the SHT20.
    fn read_humidity(&mut self) -> f32;

    /// Ambient temperature (°C) from the SHT20.
    fn read_temperature(&mut self) -> f32;

    /// Raw ADC count on `gpio`.
    fn read_analog_channel(&mut self, gpio: i32) -> u16;

    /// Visible-channel luminosity from the TSL2591.
    fn read_luminosity(&mut self) -> u16;

    /// Read every sensor once.
    fn read_all(&mut self) -> SensorReadings {
        SensorReadings {
            humidity_pct: self.read_humidity(),
            temperature_c: self.read_temperature(),
            soil_raw: self.read_analog_channel(pins::SEN0308_ADC_GPIO),
            visible_light: self.read_luminosity(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain ↔ network)
// ───────────────────────────────────────────────────────────────

/// Byte-oriented client connection to the collection server.
pub trait Transport {
    /// Error type for this transport.
    type Error: fmt::Debug + fmt::Display;

    /// Open a connection to `host:port`, replacing any previous one.
    fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error>;

    /// Whether the connection is open or unread bytes remain buffered.
    fn is_connected(&mut self) -> bool;

    /// Number of bytes that can be read right now without blocking.
    fn bytes_available(&mut self) -> usize;

    /// Take the next buffered byte, if any.
    fn read_byte(&mut self) -> Option<u8>;

    /// Write all of `data`.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Close the connection.  No-op when already closed.
    fn disconnect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / indicator)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`NodeEvent`]s through this port.
/// Adapters decide what they mean: a log line, an LED blink, both.
pub trait EventSink {
    fn emit(&mut self, event: &NodeEvent);
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: &NodeEvent) {
        (**self).emit(event);
    }
}

/// Fan one event out to two sinks, in order.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &NodeEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (driven adapter: domain → WiFi station)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

/// Local network association.
pub trait ConnectivityPort {
    /// One association attempt.
    fn connect(&mut self) -> Result<(), ConnectivityError>;

    fn is_connected(&self) -> bool;
}
