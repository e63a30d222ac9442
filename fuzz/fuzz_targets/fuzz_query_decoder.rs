//! Fuzz target: `codec::decode_queries` + dispatch
//!
//! Arbitrary bytes must decode to queries or a `DecodeError`, never a
//! panic.  Any query that yields a response must echo its sender.
//!
//! cargo fuzz run fuzz_query_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use sensornode::app::ports::SensorPort;
use sensornode::app::session::respond;
use sensornode::protocol::codec::{decode_queries, encode};

const MAX: usize = 512;

struct Zero;

impl SensorPort for Zero {
    fn read_humidity(&mut self) -> f32 {
        0.0
    }
    fn read_temperature(&mut self) -> f32 {
        0.0
    }
    fn read_analog_channel(&mut self, _gpio: i32) -> u16 {
        0
    }
    fn read_luminosity(&mut self) -> u16 {
        0
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(queries) = decode_queries(data, MAX) else { return };
    for query in &queries {
        if let Some(response) = respond(query, "0:0:0:0:0:0", &mut Zero) {
            assert_eq!(response.receiver, query.sender);
            assert!(encode(&response).is_ok());
        }
    }
});
