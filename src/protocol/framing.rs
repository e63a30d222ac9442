//! Message assembly.
//!
//! Two framings are supported:
//!
//! - **Batch** (default): everything currently readable from the socket
//!   is one message.  This is what the collection server speaks; it
//!   assumes every read-ready event carries exactly one whole message.
//! - **Length-prefixed**: each message is preceded by its length.
//!
//! ```text
//! ┌────────────┬───────────────────────┐
//! │ Length (4B)│ JSON payload (N B)    │
//! │ LE u32     │                       │
//! └────────────┴───────────────────────┘
//! ```
//!
//! The length-prefixed decoder accumulates bytes across reads, so a
//! message split over several TCP segments or several messages in one
//! segment are both handled.

use crate::error::DecodeError;

/// Frame header size (4-byte little-endian length).
const HEADER_SIZE: usize = 4;

/// Decoder state machine.
enum DecoderState {
    /// Waiting for header bytes.
    ReadingHeader { collected: usize },
    /// Header received, reading payload.
    ReadingPayload { expected: usize },
    /// Skipping the payload of an oversize frame.
    Discarding { remaining: usize },
}

/// Streaming length-prefix frame decoder.
pub struct FrameDecoder {
    state: DecoderState,
    header_buf: [u8; HEADER_SIZE],
    payload: Vec<u8>,
    max_len: usize,
}

impl FrameDecoder {
    pub fn new(max_len: usize) -> Self {
        Self {
            state: DecoderState::ReadingHeader { collected: 0 },
            header_buf: [0; HEADER_SIZE],
            payload: Vec::new(),
            max_len,
        }
    }

    /// Feed one byte into the decoder.
    ///
    /// Returns `Some(Ok(payload))` when a frame completes, and
    /// `Some(Err(_))` when a header announces an oversize frame.  The
    /// oversize payload is then dropped without being buffered.  A
    /// zero-length header is skipped silently.
    pub fn push(&mut self, byte: u8) -> Option<Result<Vec<u8>, DecodeError>> {
        match &mut self.state {
            DecoderState::ReadingHeader { collected } => {
                self.header_buf[*collected] = byte;
                *collected += 1;

                if *collected < HEADER_SIZE {
                    return None;
                }

                let expected = u32::from_le_bytes(self.header_buf) as usize;
                self.state = DecoderState::ReadingHeader { collected: 0 };

                if expected == 0 {
                    return None;
                }
                if expected > self.max_len {
                    self.state = DecoderState::Discarding {
                        remaining: expected,
                    };
                    return Some(Err(DecodeError::TooLarge {
                        len: expected,
                        max: self.max_len,
                    }));
                }

                self.payload.clear();
                self.state = DecoderState::ReadingPayload { expected };
                None
            }

            DecoderState::ReadingPayload { expected } => {
                self.payload.push(byte);
                if self.payload.len() < *expected {
                    return None;
                }
                self.state = DecoderState::ReadingHeader { collected: 0 };
                Some(Ok(core::mem::take(&mut self.payload)))
            }

            DecoderState::Discarding { remaining } => {
                *remaining -= 1;
                if *remaining == 0 {
                    self.state = DecoderState::ReadingHeader { collected: 0 };
                }
                None
            }
        }
    }

    /// Reset decoder state (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.state = DecoderState::ReadingHeader { collected: 0 };
        self.payload.clear();
    }
}

/// Prefix `payload` with its little-endian u32 length.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}
