//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured node events to the
//! ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::{BootStage, NodeEvent};
use crate::app::ports::EventSink;

/// Adapter that logs every [`NodeEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::Boot(BootStage::SensorsReady) => {
                info!("BOOT | sensors ready");
            }
            NodeEvent::Boot(BootStage::NetworkJoined { attempts }) => {
                info!("BOOT | network joined after {} attempt(s)", attempts);
            }
            NodeEvent::Connected { attempt } => {
                info!("CONN | handshake sent (attempt {})", attempt);
            }
            NodeEvent::Disconnected { reason } => {
                warn!("DISC | {:?}", reason);
            }
            NodeEvent::ResponseSent { receiver, bytes } => {
                info!("RESP | receiver={} bytes={}", receiver, bytes);
            }
            NodeEvent::DecodeFailed(e) => {
                warn!("DECODE | {}", e);
            }
        }
    }
}
