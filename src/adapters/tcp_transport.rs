//! TCP client transport adapter.
//!
//! Implements [`Transport`] on top of `std::net::TcpStream`, which the
//! ESP-IDF std port backs with lwIP sockets, so the same code runs on the
//! device and on the host.
//!
//! ## Connection model
//!
//! 1. `connect()` resolves `host:port`, opens a blocking socket with a
//!    connect timeout and a write timeout.
//! 2. `bytes_available()` drains whatever the socket holds right now into
//!    an internal receive buffer by briefly switching to non-blocking mode.
//!    A zero-length read means the peer closed; the socket is dropped but
//!    already-buffered bytes stay readable.
//! 3. `is_connected()` is true while the socket is open **or** unread
//!    bytes remain, so a final message sent just before close is still
//!    served.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, info, warn};

use crate::app::ports::Transport;
use crate::error::ConnectionError;

/// Bytes pulled from the socket per `read()` call.
const READ_CHUNK: usize = 128;

/// Receive buffer ceiling.  Draining stops here until the session
/// consumes some of it.
const RX_BUFFER_CAP: usize = 4096;

pub struct TcpTransport {
    stream: Option<TcpStream>,
    rx: VecDeque<u8>,
    connect_timeout: Duration,
}

impl TcpTransport {
    pub fn new(connect_timeout_ms: u32) -> Self {
        Self {
            stream: None,
            rx: VecDeque::with_capacity(READ_CHUNK),
            connect_timeout: Duration::from_millis(u64::from(connect_timeout_ms)),
        }
    }

    /// Whether the socket itself is still open.
    pub fn has_socket(&self) -> bool {
        self.stream.is_some()
    }

    /// Pull everything currently readable into `rx` without blocking.
    fn fill(&mut self) {
        let Some(stream) = self.stream.as_mut() else { return };
        if let Err(e) = stream.set_nonblocking(true) {
            warn!("tcp: set_nonblocking failed: {}", e);
            self.stream = None;
            return;
        }

        let mut chunk = [0u8; READ_CHUNK];
        let mut closed = false;
        while self.rx.len() < RX_BUFFER_CAP {
            let room = (RX_BUFFER_CAP - self.rx.len()).min(READ_CHUNK);
            match stream.read(&mut chunk[..room]) {
                Ok(0) => {
                    info!("tcp: peer closed the connection");
                    closed = true;
                    break;
                }
                Ok(n) => self.rx.extend(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("tcp: read failed: {}", e);
                    closed = true;
                    break;
                }
            }
        }

        if closed {
            self.stream = None;
        } else if let Err(e) = stream.set_nonblocking(false) {
            warn!("tcp: restoring blocking mode failed: {}", e);
            self.stream = None;
        }
    }
}

impl Transport for TcpTransport {
    type Error = ConnectionError;

    fn connect(&mut self, host: &str, port: u16) -> Result<(), ConnectionError> {
        self.disconnect();

        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| {
                warn!("tcp: resolving {}:{} failed: {}", host, port, e);
                ConnectionError::Resolve
            })?
            .next()
            .ok_or(ConnectionError::Resolve)?;

        let stream = TcpStream::connect_timeout(&addr, self.connect_timeout).map_err(|e| {
            debug!("tcp: connect to {} failed: {}", addr, e);
            ConnectionError::ConnectFailed
        })?;
        // Best-effort socket options; a failure here does not invalidate
        // the connection.
        let _ = stream.set_nodelay(true);
        let _ = stream.set_write_timeout(Some(self.connect_timeout));

        self.stream = Some(stream);
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        if self.rx.is_empty() {
            self.fill();
        }
        self.stream.is_some() || !self.rx.is_empty()
    }

    fn bytes_available(&mut self) -> usize {
        self.fill();
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), ConnectionError> {
        let stream = self.stream.as_mut().ok_or(ConnectionError::NotConnected)?;
        let result = stream.write_all(data).and_then(|()| stream.flush());
        if let Err(e) = result {
            warn!("tcp: write failed: {}", e);
            self.stream = None;
            return Err(ConnectionError::WriteFailed);
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
        self.rx.clear();
    }
}
