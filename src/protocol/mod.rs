//! Wire protocol: JSON messages exchanged with the collection server.
//!
//! ```text
//!  device ── Handshake ──▶ server        (once, right after connect)
//!  device ◀── Query ────── server        {"sender":7,"request":{...}}
//!  device ── Response ───▶ server        {"receiver":7,"macaddr":...}
//! ```
//!
//! - [`messages`]: typed message shapes
//! - [`codec`]: JSON encode / decode with a bounded input size
//! - [`framing`]: grouping inbound bytes into messages

pub mod codec;
pub mod framing;
pub mod messages;
