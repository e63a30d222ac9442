//! Mock adapters for integration tests.
//!
//! Records every transport call, emitted event and delay so tests can
//! assert on the full session history without a network or sensors.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use sensornode::app::events::NodeEvent;
use sensornode::app::ports::{EventSink, SensorPort, Transport};
use sensornode::error::ConnectionError;
use sensornode::sensors::SensorReadings;

pub const IDENTITY: &str = "aa:bb:cc:dd:ee:ff";

pub const READINGS: SensorReadings = SensorReadings {
    humidity_pct: 45.5,
    temperature_c: 21.25,
    soil_raw: 1873,
    visible_light: 312,
};

// ── Sensors ───────────────────────────────────────────────────

pub struct MockSensors {
    pub readings: SensorReadings,
    pub reads: u32,
}

impl MockSensors {
    pub fn new() -> Self {
        Self {
            readings: READINGS,
            reads: 0,
        }
    }
}

impl SensorPort for MockSensors {
    fn read_humidity(&mut self) -> f32 {
        self.reads += 1;
        self.readings.humidity_pct
    }

    fn read_temperature(&mut self) -> f32 {
        self.readings.temperature_c
    }

    fn read_analog_channel(&mut self, _gpio: i32) -> u16 {
        self.readings.soil_raw
    }

    fn read_luminosity(&mut self) -> u16 {
        self.readings.visible_light
    }
}

// ── Transport ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockTransport {
    /// Outcome of upcoming `connect()` calls; empty means success.
    pub connect_results: VecDeque<bool>,
    pub connects: Vec<(String, u16)>,
    /// One entry per `write_all()` call.
    pub written: Vec<Vec<u8>>,
    pub rx: VecDeque<u8>,
    pub open: bool,
    pub fail_writes: bool,
    pub disconnects: u32,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_incoming(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    pub fn close_from_peer(&mut self) {
        self.open = false;
    }

    pub fn written_json(&self, index: usize) -> serde_json::Value {
        serde_json::from_slice(&self.written[index]).unwrap()
    }
}

impl Transport for MockTransport {
    type Error = ConnectionError;

    fn connect(&mut self, host: &str, port: u16) -> Result<(), ConnectionError> {
        self.connects.push((host.to_string(), port));
        if self.connect_results.pop_front().unwrap_or(true) {
            self.open = true;
            self.rx.clear();
            Ok(())
        } else {
            Err(ConnectionError::ConnectFailed)
        }
    }

    fn is_connected(&mut self) -> bool {
        self.open || !self.rx.is_empty()
    }

    fn bytes_available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), ConnectionError> {
        if !self.open {
            return Err(ConnectionError::NotConnected);
        }
        if self.fail_writes {
            return Err(ConnectionError::WriteFailed);
        }
        self.written.push(data.to_vec());
        Ok(())
    }

    fn disconnect(&mut self) {
        self.open = false;
        self.rx.clear();
        self.disconnects += 1;
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<NodeEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &NodeEvent) {
        self.events.push(event.clone());
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Never sleeps; records every requested wait in milliseconds.
#[derive(Default)]
pub struct RecordingDelay {
    pub waits_ms: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}
