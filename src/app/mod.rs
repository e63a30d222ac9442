//! Application core: pure domain logic, zero I/O.
//!
//! The connection lifecycle, the handshake, and query dispatch live here.
//! All interaction with hardware and the network happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod session;
