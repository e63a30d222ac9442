//! End-to-end: session + real TCP transport against a loopback server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use sensornode::adapters::tcp_transport::TcpTransport;
use sensornode::adapters::time::SystemDelay;
use sensornode::app::session::SessionController;
use sensornode::config::{ClientConfig, DEFAULT_AUTH_KEY};
use serde_json::Value;

use crate::mock_hw::{IDENTITY, MockSensors, RecordingSink};

/// Read until the bytes so far parse as one JSON document.
fn read_json(stream: &mut TcpStream) -> Value {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 256];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "client closed before sending a full message");
        buf.extend_from_slice(&chunk[..n]);
        if let Ok(v) = serde_json::from_slice(&buf) {
            return v;
        }
    }
}

#[test]
fn handshake_query_and_reply_over_loopback() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        let (mut s, _) = listener.accept().unwrap();
        s.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let handshake = read_json(&mut s);
        s.write_all(br#"{"sender":7,"request":{"type":"GET","content":"all"}}"#)
            .unwrap();
        let reply = read_json(&mut s);
        (handshake, reply)
    });

    let mut config = ClientConfig::default();
    config.server_host = "127.0.0.1".into();
    config.server_port = port;
    config.reconnect_delay_ms = 50;
    config.poll_interval_ms = 5;

    let mut session =
        SessionController::new(config, IDENTITY, TcpTransport::new(1000)).unwrap();
    let mut sensors = MockSensors::new();
    let mut sink = RecordingSink::default();
    let mut delay = SystemDelay::new();

    for _ in 0..1000 {
        session.step(&mut sensors, &mut sink, &mut delay);
        if session.stats().responses == 1 {
            break;
        }
    }
    assert_eq!(session.stats().responses, 1);

    let (handshake, reply) = server.join().unwrap();
    assert_eq!(handshake["authKey"], DEFAULT_AUTH_KEY);
    assert_eq!(handshake["macaddr"], IDENTITY);
    assert_eq!(reply["receiver"], 7);
    assert_eq!(reply["macaddr"], IDENTITY);
    for group in ["dfrobot_sht20", "dfrobot_sen0308", "adafruit_tsl2591"] {
        let leaves = reply[group].as_object().unwrap();
        assert!(!leaves.is_empty());
        assert!(leaves.values().all(Value::is_number), "{group}");
    }
    assert_eq!(session.stats().handshakes, 1);
}
