//! Session controller: the hexagonal core.
//!
//! [`SessionController`] owns the server connection and walks it through
//! its lifecycle.  Sensors, the event sink and the delay provider are
//! injected at call sites, so the whole loop runs against mocks on the
//! host.
//!
//! ```text
//!              ┌──────────────┐ connect + handshake ┌───────────────┐
//!   start ───▶ │ Disconnected │ ──────────────────▶ │ Authenticated │
//!              └──────────────┘                     └───────────────┘
//!                    ▲      ▲ connect failed              │
//!                    │      └──(via Connecting)           ▼
//!                    │  peer closed / write failed  ┌───────────┐
//!                    └───────────────────────────── │  Serving  │ ◀─┐
//!                                                   └───────────┘ ──┘
//!                                                     poll, decode, reply
//! ```

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::{ClientConfig, Framing};
use crate::error::{DecodeError, Result};
use crate::protocol::codec;
use crate::protocol::framing::{self, FrameDecoder};
use crate::protocol::messages::{Handshake, Query, Response};

use super::events::{DisconnectReason, NodeEvent};
use super::ports::{EventSink, SensorPort, Transport};

// ───────────────────────────────────────────────────────────────
// State and counters
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection.  The next step (re)connects.
    Disconnected,
    /// Attempting to connect and send the handshake.
    Connecting,
    /// Handshake sent; inbound buffers not yet armed.
    Authenticated,
    /// Polling for queries and answering them.
    Serving,
}

/// Running counters since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub connect_attempts: u32,
    pub handshakes: u32,
    pub responses: u32,
    pub decode_failures: u32,
    pub ignored: u32,
    pub disconnects: u32,
}

// ───────────────────────────────────────────────────────────────
// Dispatch
// ───────────────────────────────────────────────────────────────

/// Answer `query`, or `None` if it is not a snapshot request.
///
/// Sensors are only read when a response will actually be sent.
pub fn respond(query: &Query, identity: &str, sensors: &mut impl SensorPort) -> Option<Response> {
    let receiver = query.snapshot_sender()?;
    let readings = sensors.read_all();
    Some(Response::new(receiver, identity, &readings))
}

// ───────────────────────────────────────────────────────────────
// SessionController
// ───────────────────────────────────────────────────────────────

pub struct SessionController<T> {
    config: ClientConfig,
    identity: String,
    transport: T,
    state: SessionState,
    /// A failed or dropped connection waits `reconnect_delay_ms` before
    /// the next attempt.  The very first attempt does not.
    reconnect_pending: bool,
    inbox: Vec<u8>,
    framer: FrameDecoder,
    stats: SessionStats,
}

impl<T: Transport> SessionController<T> {
    /// Build a controller for the device identified by `identity`
    /// (its formatted MAC address).
    pub fn new(config: ClientConfig, identity: &str, transport: T) -> Result<Self> {
        config.validate()?;
        let framer = FrameDecoder::new(config.max_message_len);
        let inbox = Vec::with_capacity(config.max_message_len);
        Ok(Self {
            config,
            identity: identity.into(),
            transport,
            state: SessionState::Disconnected,
            reconnect_pending: false,
            inbox,
            framer,
            stats: SessionStats::default(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The handshake this device sends on every new connection.
    pub fn handshake(&self) -> Handshake {
        Handshake::new(&self.config.auth_key, &self.identity)
    }

    // ── Loop ──────────────────────────────────────────────────

    /// Advance the session by one state.  Returns the state entered.
    pub fn step(
        &mut self,
        sensors: &mut impl SensorPort,
        sink: &mut impl EventSink,
        delay: &mut impl DelayNs,
    ) -> SessionState {
        match self.state {
            SessionState::Disconnected => {
                if self.reconnect_pending {
                    delay.delay_ms(self.config.reconnect_delay_ms);
                    self.reconnect_pending = false;
                }
                self.state = SessionState::Connecting;
            }
            SessionState::Connecting => self.connect(sink),
            SessionState::Authenticated => {
                self.inbox.clear();
                self.framer.reset();
                self.state = SessionState::Serving;
            }
            SessionState::Serving => self.serve(sensors, sink, delay),
        }
        self.state
    }

    /// Run forever.
    pub fn run(
        &mut self,
        sensors: &mut impl SensorPort,
        sink: &mut impl EventSink,
        delay: &mut impl DelayNs,
    ) -> ! {
        info!("Session started as {}", self.identity);
        loop {
            self.step(sensors, sink, delay);
        }
    }

    // ── Connection lifecycle ──────────────────────────────────

    fn connect(&mut self, sink: &mut impl EventSink) {
        self.stats.connect_attempts += 1;
        info!(
            "Trying to connect to server {}:{}...",
            self.config.server_host, self.config.server_port
        );

        if let Err(e) = self
            .transport
            .connect(&self.config.server_host, self.config.server_port)
        {
            warn!("Connection failed: {}", e);
            self.drop_connection(DisconnectReason::ConnectFailed, sink);
            return;
        }

        let sent = match codec::encode(&self.handshake()) {
            Ok(payload) => self
                .send(&payload)
                .map_err(|e| warn!("Handshake write failed: {}", e))
                .is_ok(),
            Err(_) => false,
        };
        if !sent {
            self.drop_connection(DisconnectReason::HandshakeFailed, sink);
            return;
        }

        self.stats.handshakes += 1;
        info!("Connected to server");
        sink.emit(&NodeEvent::Connected {
            attempt: self.stats.connect_attempts,
        });
        self.state = SessionState::Authenticated;
    }

    fn drop_connection(&mut self, reason: DisconnectReason, sink: &mut impl EventSink) {
        self.transport.disconnect();
        self.stats.disconnects += 1;
        info!("Disconnected ({:?}) stats={:?}", reason, self.stats);
        sink.emit(&NodeEvent::Disconnected { reason });
        self.state = SessionState::Disconnected;
        self.reconnect_pending = true;
    }

    // ── Serving ───────────────────────────────────────────────

    fn serve(
        &mut self,
        sensors: &mut impl SensorPort,
        sink: &mut impl EventSink,
        delay: &mut impl DelayNs,
    ) {
        if !self.transport.is_connected() {
            self.drop_connection(DisconnectReason::PeerClosed, sink);
            return;
        }

        let available = self.transport.bytes_available();
        if available == 0 {
            delay.delay_ms(self.config.poll_interval_ms);
            return;
        }

        match self.config.framing {
            Framing::Batch => self.serve_batch(available, sensors, sink),
            Framing::LengthPrefixed => self.serve_frames(available, sensors, sink),
        }
    }

    /// Drain everything readable and treat it as one message.
    fn serve_batch(&mut self, available: usize, sensors: &mut impl SensorPort, sink: &mut impl EventSink) {
        let max = self.config.max_message_len;
        let mut inbox = core::mem::take(&mut self.inbox);
        inbox.clear();

        let mut total = 0usize;
        for _ in 0..available {
            let Some(byte) = self.transport.read_byte() else { break };
            total += 1;
            if inbox.len() < max {
                inbox.push(byte);
            }
        }

        if total > max {
            self.report_decode_failure(DecodeError::TooLarge { len: total, max }, sink);
        } else {
            self.handle_message(&inbox, sensors, sink);
        }
        self.inbox = inbox;
    }

    /// Feed readable bytes through the length-prefix decoder.
    fn serve_frames(&mut self, available: usize, sensors: &mut impl SensorPort, sink: &mut impl EventSink) {
        for _ in 0..available {
            let Some(byte) = self.transport.read_byte() else { break };
            match self.framer.push(byte) {
                Some(Ok(payload)) => self.handle_message(&payload, sensors, sink),
                Some(Err(e)) => self.report_decode_failure(e, sink),
                None => {}
            }
            if self.state != SessionState::Serving {
                break;
            }
        }
    }

    /// Answer every complete query in `raw`, in order.
    fn handle_message(&mut self, raw: &[u8], sensors: &mut impl SensorPort, sink: &mut impl EventSink) {
        let queries = match codec::decode_queries(raw, self.config.max_message_len) {
            Ok(q) => q,
            Err(e) => {
                self.report_decode_failure(e, sink);
                return;
            }
        };

        for query in &queries {
            self.answer(query, sensors, sink);
            if self.state != SessionState::Serving {
                break;
            }
        }
    }

    fn answer(&mut self, query: &Query, sensors: &mut impl SensorPort, sink: &mut impl EventSink) {
        let Some(response) = respond(query, &self.identity, sensors) else {
            self.stats.ignored += 1;
            return;
        };

        let Ok(payload) = codec::encode(&response) else {
            return;
        };
        match self.send(&payload) {
            Ok(()) => {
                self.stats.responses += 1;
                info!("Sent {} bytes to receiver {}", payload.len(), response.receiver);
                sink.emit(&NodeEvent::ResponseSent {
                    receiver: response.receiver,
                    bytes: payload.len(),
                });
            }
            Err(e) => {
                warn!("Response write failed: {}", e);
                self.drop_connection(DisconnectReason::WriteFailed, sink);
            }
        }
    }

    fn report_decode_failure(&mut self, e: DecodeError, sink: &mut impl EventSink) {
        warn!("Deserialization failed: {}", e);
        self.stats.decode_failures += 1;
        sink.emit(&NodeEvent::DecodeFailed(e));
    }

    /// Write one outbound message using the configured framing.
    fn send(&mut self, payload: &[u8]) -> core::result::Result<(), T::Error> {
        match self.config.framing {
            Framing::Batch => self.transport.write_all(payload),
            Framing::LengthPrefixed => self.transport.write_all(&framing::encode_frame(payload)),
        }
    }
}
