//! Unified error types for the sensor node firmware.
//!
//! `Error` covers setup in `main` and outbound encoding.  Failures the session
//! recovers from at runtime stay in their own types: [`ConnectionError`]
//! from the transport, [`DecodeError`] inside
//! [`NodeEvent`](crate::app::events::NodeEvent)s, and [`SensorError`]
//! mapped to a sentinel reading.  All of them are `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An outbound message could not be serialised.
    Encode,
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode => write!(f, "encode: serialisation failed"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The I2C transaction failed or timed out.
    I2cFailed,
    /// The CRC byte returned by the sensor did not match the payload.
    BadCrc,
    /// The device at the expected address reported the wrong ID.
    WrongDevice(u8),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2cFailed => write!(f, "I2C transaction failed"),
            Self::BadCrc => write!(f, "CRC mismatch"),
            Self::WrongDevice(id) => write!(f, "unexpected device id 0x{id:02x}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Connection errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionError {
    /// The server host name did not resolve to an address.
    Resolve,
    /// The server refused or did not answer the connection attempt.
    ConnectFailed,
    /// Writing to the socket failed.
    WriteFailed,
    /// The operation requires an open connection.
    NotConnected,
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve => write!(f, "host did not resolve"),
            Self::ConnectFailed => write!(f, "connect failed"),
            Self::WriteFailed => write!(f, "socket write failed"),
            Self::NotConnected => write!(f, "not connected"),
        }
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Coarse classification of a malformed message, mirrored from the JSON
/// parser so the error stays `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeCategory {
    /// Not syntactically valid JSON.
    Syntax,
    /// Input ended in the middle of a value.
    Eof,
    /// Valid JSON of the wrong shape for a typed decode.
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The bytes are not a well-formed message.
    Malformed {
        line: usize,
        column: usize,
        category: DecodeCategory,
    },
    /// The message exceeds the configured maximum length.
    TooLarge { len: usize, max: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed {
                line,
                column,
                category,
            } => write!(f, "malformed message ({category:?} at {line}:{column})"),
            Self::TooLarge { len, max } => {
                write!(f, "message of {len} bytes exceeds limit of {max}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
