//! Outbound node events.
//!
//! The [`SessionController`](super::session::SessionController) emits
//! these through the [`EventSink`](super::ports::EventSink) port on every
//! state transition worth signalling.  Adapters on the other side decide
//! what to do with them: log to serial, blink an LED.

use crate::error::DecodeError;

/// Startup milestones, signalled before the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootStage {
    /// Sensor drivers initialised (some may be missing).
    SensorsReady,
    /// WiFi station associated.
    NetworkJoined { attempts: u32 },
}

/// Why the connection was torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The connection attempt itself failed.
    ConnectFailed,
    /// Connected, but the handshake could not be written.
    HandshakeFailed,
    /// The transport reported the peer gone.
    PeerClosed,
    /// A response could not be written.
    WriteFailed,
}

/// Structured events emitted by the node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEvent {
    Boot(BootStage),

    /// Connection established and handshake sent.
    Connected { attempt: u32 },

    /// Connection lost or never established; a retry follows.
    Disconnected { reason: DisconnectReason },

    /// A snapshot response went out.
    ResponseSent { receiver: i64, bytes: usize },

    /// An inbound message was discarded.
    DecodeFailed(DecodeError),
}
