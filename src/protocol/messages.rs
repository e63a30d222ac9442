//! Typed shapes of every message on the wire.
//!
//! Field names match the server's JSON keys exactly; the nested sensor
//! groups are one level deep and keyed by the sensor's product name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sensors::SensorReadings;

/// The only request type the device answers.
pub const REQUEST_TYPE_GET: &str = "GET";
/// The only request content the device answers.
pub const REQUEST_CONTENT_ALL: &str = "all";

// ───────────────────────────────────────────────────────────────
// Handshake (device → server, once per connection)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handshake {
    #[serde(rename = "authKey")]
    pub auth_key: String,
    pub macaddr: String,
}

impl Handshake {
    pub fn new(auth_key: &str, macaddr: &str) -> Self {
        Self {
            auth_key: auth_key.into(),
            macaddr: macaddr.into(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Query (server → device)
// ───────────────────────────────────────────────────────────────

/// An inbound query, extracted leniently from a decoded JSON value.
///
/// `type` and `content` are optional: a well-formed message of the wrong
/// shape is not a decode error, it is simply a query nobody answers.
/// `sender` is read leniently: floats truncate, and a missing or
/// non-numeric sender becomes 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub sender: i64,
    pub kind: Option<String>,
    pub content: Option<String>,
}

impl Query {
    /// Pull `sender`, `request.type` and `request.content` out of `value`.
    pub fn from_value(value: &Value) -> Self {
        let request = value.get("request");
        let text = |key: &str| {
            request
                .and_then(|r| r.get(key))
                .and_then(Value::as_str)
                .map(String::from)
        };
        Self {
            sender: value.get("sender").map_or(0, sender_id),
            kind: text("type"),
            content: text("content"),
        }
    }

    /// The sender to answer, if this is a `GET` / `all` snapshot request.
    pub fn snapshot_sender(&self) -> Option<i64> {
        let is_get = self.kind.as_deref() == Some(REQUEST_TYPE_GET);
        let is_all = self.content.as_deref() == Some(REQUEST_CONTENT_ALL);
        if is_get && is_all { Some(self.sender) } else { None }
    }
}

fn sender_id(value: &Value) -> i64 {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .unwrap_or(0)
}

// ───────────────────────────────────────────────────────────────
// Response (device → server)
// ───────────────────────────────────────────────────────────────

/// DFRobot SHT20 group: relative humidity (%) and temperature (°C).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sht20Group {
    pub hum: f32,
    pub temp: f32,
}

/// DFRobot SEN0308 group: raw 12-bit ADC count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sen0308Group {
    pub hum: u16,
}

/// Adafruit TSL2591 group: visible-channel luminosity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tsl2591Group {
    pub light: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub receiver: i64,
    pub macaddr: String,
    pub dfrobot_sht20: Sht20Group,
    pub dfrobot_sen0308: Sen0308Group,
    pub adafruit_tsl2591: Tsl2591Group,
}

impl Response {
    /// Build a response addressed to `receiver` from one sensor snapshot.
    /// Readings are forwarded verbatim, sentinel values included.
    pub fn new(receiver: i64, macaddr: &str, readings: &SensorReadings) -> Self {
        Self {
            receiver,
            macaddr: macaddr.into(),
            dfrobot_sht20: Sht20Group {
                hum: readings.humidity_pct,
                temp: readings.temperature_c,
            },
            dfrobot_sen0308: Sen0308Group {
                hum: readings.soil_raw,
            },
            adafruit_tsl2591: Tsl2591Group {
                light: readings.visible_light,
            },
        }
    }
}
