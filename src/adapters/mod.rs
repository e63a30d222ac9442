//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements         | Connects to              |
//! |-----------------|--------------------|--------------------------|
//! | `device_id`     | none               | WiFi station MAC         |
//! | `indicator`     | EventSink          | Red / white status LEDs  |
//! | `log_sink`      | EventSink          | Serial log output        |
//! | `tcp_transport` | Transport          | lwIP / std TCP socket    |
//! | `time`          | DelayNs            | FreeRTOS / thread sleep  |
//! | `wifi`          | ConnectivityPort   | ESP-IDF WiFi STA         |
//!
//! The sensor side of the boundary, [`SensorPort`](crate::app::ports::SensorPort),
//! is implemented by [`SensorHub`](crate::sensors::SensorHub) directly.

pub mod device_id;
pub mod indicator;
pub mod log_sink;
pub mod tcp_transport;
pub mod time;
pub mod wifi;
