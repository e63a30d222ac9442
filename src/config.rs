//! Client configuration parameters
//!
//! All tunable parameters for the sensor node.  Defaults are the
//! compiled-in constants; nothing is persisted across power cycles.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pre-shared credential sent in the handshake of every connection.
pub const DEFAULT_AUTH_KEY: &str =
    "e7e09c4a8c99af1af25682de6633628956118d93a8ce81012fb973d6fc1f9749";

/// Collection server endpoint.
pub const DEFAULT_SERVER_HOST: &str = "141.94.21.229";
pub const DEFAULT_SERVER_PORT: u16 = 52275;

/// Station credentials, baked in at build time.
pub const WIFI_SSID: &str = match option_env!("SENSORNODE_WIFI_SSID") {
    Some(s) => s,
    None => "",
};
pub const WIFI_PASSWORD: &str = match option_env!("SENSORNODE_WIFI_PASSWORD") {
    Some(s) => s,
    None => "",
};

/// How inbound bytes are grouped into messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Framing {
    /// Every batch of currently available bytes is one message.
    /// Wire-compatible with the existing collection server.
    Batch,
    /// 4-byte little-endian length header before each payload.
    LengthPrefixed,
}

/// Core client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    // --- Server ---
    pub server_host: String,
    pub server_port: u16,
    /// Credential sent once per connection in the handshake.
    pub auth_key: String,

    // --- Timing ---
    /// Wait after a disconnect before the next connection attempt (ms).
    pub reconnect_delay_ms: u32,
    /// Sleep between polls of an idle socket (ms).
    pub poll_interval_ms: u32,
    /// Duration of one indicator blink (ms).
    pub blink_ms: u32,
    /// Wait between WiFi association attempts (ms).
    pub wifi_retry_ms: u32,
    /// TCP connect timeout (ms).
    pub connect_timeout_ms: u32,

    // --- Protocol ---
    /// Largest inbound message accepted, in bytes.
    pub max_message_len: usize,
    pub framing: Framing,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_SERVER_HOST.into(),
            server_port: DEFAULT_SERVER_PORT,
            auth_key: DEFAULT_AUTH_KEY.into(),

            reconnect_delay_ms: 1000,
            poll_interval_ms: 10,
            blink_ms: 200,
            wifi_retry_ms: 500,
            connect_timeout_ms: 5000,

            max_message_len: 512,
            framing: Framing::Batch,
        }
    }
}

impl ClientConfig {
    /// Reject values the session loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.server_host.is_empty() {
            return Err(Error::Config("server_host is empty"));
        }
        if self.server_port == 0 {
            return Err(Error::Config("server_port is 0"));
        }
        if self.auth_key.is_empty() {
            return Err(Error::Config("auth_key is empty"));
        }
        if self.max_message_len == 0 {
            return Err(Error::Config("max_message_len is 0"));
        }
        Ok(())
    }
}
