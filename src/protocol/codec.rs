//! Compact JSON codec.
//!
//! Encoding never emits whitespace.  Decoding is bounded by a maximum
//! message length and maps every parser failure onto [`DecodeError`];
//! no input can make it panic.  Bytes after the first complete value are
//! not an error: a read may carry several messages back to back.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::error::Category;

use crate::error::{DecodeCategory, DecodeError, Error, Result};

use super::messages::Query;

/// Serialise `msg` to compact JSON bytes.
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(msg).map_err(|e| {
        log::error!("encode failed: {}", e);
        Error::Encode
    })
}

/// Parse the leading value of `raw` as a typed message.  Anything after
/// it is ignored.
pub fn decode<T: DeserializeOwned>(raw: &[u8], max_len: usize) -> core::result::Result<T, DecodeError> {
    check_len(raw, max_len)?;
    match serde_json::Deserializer::from_slice(raw).into_iter::<T>().next() {
        Some(value) => value.map_err(|e| malformed(&e)),
        // Empty or whitespace-only input: let the strict parser say where.
        None => serde_json::from_slice(raw).map_err(|e| malformed(&e)),
    }
}

/// Parse `raw` as an arbitrary JSON value.
///
/// Fails only when the bytes are not well-formed JSON (or too long);
/// any well-formed document is accepted regardless of shape.
pub fn decode_value(raw: &[u8], max_len: usize) -> core::result::Result<Value, DecodeError> {
    decode(raw, max_len)
}

/// Parse the leading value of `raw` as an inbound query.
pub fn decode_query(raw: &[u8], max_len: usize) -> core::result::Result<Query, DecodeError> {
    decode_value(raw, max_len).map(|v| Query::from_value(&v))
}

/// Parse every complete query in `raw`, in arrival order.
///
/// Only a malformed leading value is an error.  Parsing stops quietly at
/// the first later value that is not well-formed JSON.
pub fn decode_queries(raw: &[u8], max_len: usize) -> core::result::Result<Vec<Query>, DecodeError> {
    let first = decode_query(raw, max_len)?;
    let rest = serde_json::Deserializer::from_slice(raw)
        .into_iter::<Value>()
        .skip(1)
        .map_while(|v| v.ok())
        .map(|v| Query::from_value(&v));
    Ok(core::iter::once(first).chain(rest).collect())
}

fn check_len(raw: &[u8], max_len: usize) -> core::result::Result<(), DecodeError> {
    if raw.len() > max_len {
        return Err(DecodeError::TooLarge {
            len: raw.len(),
            max: max_len,
        });
    }
    Ok(())
}

fn malformed(e: &serde_json::Error) -> DecodeError {
    let category = match e.classify() {
        Category::Eof => DecodeCategory::Eof,
        Category::Data => DecodeCategory::Data,
        Category::Syntax | Category::Io => DecodeCategory::Syntax,
    };
    DecodeError::Malformed {
        line: e.line(),
        column: e.column(),
        category,
    }
}
