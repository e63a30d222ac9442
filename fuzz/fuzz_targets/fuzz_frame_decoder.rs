//! Fuzz target: `FrameDecoder::push`
//!
//! Drives arbitrary byte sequences into the length-prefix decoder and
//! asserts that it never panics and never yields an empty or oversize
//! payload.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use sensornode::error::DecodeError;
use sensornode::protocol::framing::FrameDecoder;

const MAX: usize = 512;

fuzz_target!(|data: &[u8]| {
    let mut decoder = FrameDecoder::new(MAX);

    for &byte in data {
        match decoder.push(byte) {
            Some(Ok(payload)) => {
                assert!(!payload.is_empty(), "decoder must not yield empty payload");
                assert!(payload.len() <= MAX, "payload exceeds max_len");
            }
            Some(Err(DecodeError::TooLarge { len, max })) => {
                assert!(len > max);
            }
            Some(Err(e)) => panic!("unexpected framing error {e:?}"),
            None => {}
        }
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    for &byte in data {
        let _ = decoder.push(byte);
    }
});
