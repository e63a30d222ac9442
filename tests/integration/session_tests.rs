//! Session controller scenarios against mock adapters.

use sensornode::app::events::{DisconnectReason, NodeEvent};
use sensornode::app::session::{SessionController, SessionState};
use sensornode::config::{ClientConfig, Framing, DEFAULT_AUTH_KEY};
use sensornode::error::DecodeError;
use sensornode::protocol::framing::{encode_frame, FrameDecoder};
use serde_json::json;

use crate::mock_hw::{IDENTITY, MockSensors, MockTransport, RecordingDelay, RecordingSink};

const GET_ALL: &[u8] = br#"{"sender":7,"request":{"type":"GET","content":"all"}}"#;

struct Harness {
    session: SessionController<MockTransport>,
    sensors: MockSensors,
    sink: RecordingSink,
    delay: RecordingDelay,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    fn with_config(config: ClientConfig) -> Self {
        Self {
            session: SessionController::new(config, IDENTITY, MockTransport::new()).unwrap(),
            sensors: MockSensors::new(),
            sink: RecordingSink::default(),
            delay: RecordingDelay::default(),
        }
    }

    fn step(&mut self) -> SessionState {
        self.session
            .step(&mut self.sensors, &mut self.sink, &mut self.delay)
    }

    /// Step until `Serving` is entered (at most a handful of steps).
    fn serve(&mut self) {
        for _ in 0..8 {
            if self.step() == SessionState::Serving {
                return;
            }
        }
        panic!("session never reached Serving: {:?}", self.session.state());
    }

    fn transport(&mut self) -> &mut MockTransport {
        self.session.transport_mut()
    }
}

// ── Handshake ─────────────────────────────────────────────────

#[test]
fn first_connect_is_immediate_and_sends_handshake() {
    let mut h = Harness::new();
    assert_eq!(h.session.state(), SessionState::Disconnected);

    assert_eq!(h.step(), SessionState::Connecting);
    assert!(h.delay.waits_ms.is_empty(), "first attempt must not wait");

    assert_eq!(h.step(), SessionState::Authenticated);
    let t = h.transport();
    assert_eq!(t.connects, vec![("141.94.21.229".to_string(), 52275)]);
    assert_eq!(t.written.len(), 1);
    let expected = format!(r#"{{"authKey":"{}","macaddr":"{}"}}"#, DEFAULT_AUTH_KEY, IDENTITY);
    assert_eq!(String::from_utf8(t.written[0].clone()).unwrap(), expected);

    assert_eq!(h.sink.events, vec![NodeEvent::Connected { attempt: 1 }]);
}

#[test]
fn handshake_is_never_repeated_while_connected() {
    let mut h = Harness::new();
    h.serve();
    for _ in 0..20 {
        assert_eq!(h.step(), SessionState::Serving);
    }
    assert_eq!(h.transport().written.len(), 1);
    assert_eq!(h.session.stats().handshakes, 1);
    assert!(h.delay.waits_ms.iter().all(|&ms| ms == 10));
}

// ── Dispatch ──────────────────────────────────────────────────

#[test]
fn get_all_query_is_answered() {
    let mut h = Harness::new();
    h.serve();
    h.transport().push_incoming(GET_ALL);
    assert_eq!(h.step(), SessionState::Serving);

    let t = h.transport();
    assert_eq!(t.written.len(), 2);
    assert_eq!(
        t.written_json(1),
        json!({
            "receiver": 7,
            "macaddr": IDENTITY,
            "dfrobot_sht20": {"hum": 45.5, "temp": 21.25},
            "dfrobot_sen0308": {"hum": 1873},
            "adafruit_tsl2591": {"light": 312}
        })
    );
    assert_eq!(h.sensors.reads, 1);
    assert_eq!(h.session.stats().responses, 1);
    assert!(h.sink.events.contains(&NodeEvent::ResponseSent {
        receiver: 7,
        bytes: h.session.transport().written[1].len(),
    }));
}

#[test]
fn unrecognised_queries_are_silently_ignored() {
    let mut h = Harness::new();
    h.serve();
    let queries: [&[u8]; 5] = [
        br#"{"sender":7,"request":{"type":"GET","content":"temp"}}"#,
        br#"{"sender":7,"request":{"type":"SET","content":"all"}}"#,
        br#"{"sender":7,"request":{"type":"GET"}}"#,
        br#"{"sender":7}"#,
        br#"[1,2,3]"#,
    ];
    for q in queries {
        h.transport().push_incoming(q);
        assert_eq!(h.step(), SessionState::Serving);
    }

    assert_eq!(h.transport().written.len(), 1, "only the handshake");
    assert_eq!(h.sensors.reads, 0);
    assert_eq!(h.session.stats().ignored, 5);
    assert_eq!(h.sink.events, vec![NodeEvent::Connected { attempt: 1 }]);
}

#[test]
fn missing_or_non_integer_sender_is_still_answered() {
    let mut h = Harness::new();
    h.serve();
    let queries: [(&[u8], i64); 3] = [
        (br#"{"request":{"type":"GET","content":"all"}}"#, 0),
        (br#"{"sender":7.0,"request":{"type":"GET","content":"all"}}"#, 7),
        (br#"{"sender":"7","request":{"type":"GET","content":"all"}}"#, 0),
    ];
    for (i, (q, receiver)) in queries.into_iter().enumerate() {
        h.transport().push_incoming(q);
        assert_eq!(h.step(), SessionState::Serving);
        assert_eq!(h.transport().written_json(i + 1)["receiver"], receiver);
    }
    assert_eq!(h.session.stats().responses, 3);
    assert_eq!(h.session.stats().ignored, 0);
}

#[test]
fn queries_arriving_in_one_read_are_each_answered() {
    let mut h = Harness::new();
    h.serve();
    h.transport().push_incoming(GET_ALL);
    h.transport()
        .push_incoming(br#"{"sender":8,"request":{"type":"GET","content":"all"}}"#);
    assert_eq!(h.step(), SessionState::Serving);

    let t = h.transport();
    assert_eq!(t.written.len(), 3);
    assert_eq!(t.written_json(1)["receiver"], 7);
    assert_eq!(t.written_json(2)["receiver"], 8);
    assert_eq!(h.sensors.reads, 2);
    assert_eq!(h.session.stats().decode_failures, 0);
}

#[test]
fn trailing_garbage_after_a_query_is_ignored() {
    let mut h = Harness::new();
    h.serve();
    h.transport().push_incoming(GET_ALL);
    h.transport().push_incoming(b"\r\n}}noise");
    assert_eq!(h.step(), SessionState::Serving);

    assert_eq!(h.session.stats().responses, 1);
    assert_eq!(h.session.stats().decode_failures, 0);
    assert!(!h
        .sink
        .events
        .iter()
        .any(|e| matches!(e, NodeEvent::DecodeFailed(_))));
}

#[test]
fn decode_failure_is_discarded_and_session_keeps_serving() {
    let mut h = Harness::new();
    h.serve();
    h.transport().push_incoming(b"{\"sender\":7,");
    assert_eq!(h.step(), SessionState::Serving);
    assert_eq!(h.session.stats().decode_failures, 1);
    assert!(matches!(
        h.sink.events.last(),
        Some(NodeEvent::DecodeFailed(DecodeError::Malformed { .. }))
    ));

    h.transport().push_incoming(GET_ALL);
    h.step();
    assert_eq!(h.session.stats().responses, 1);
}

#[test]
fn oversize_batch_is_rejected_without_reply() {
    let mut config = ClientConfig::default();
    config.max_message_len = 16;
    let mut h = Harness::with_config(config);
    h.serve();
    h.transport().push_incoming(GET_ALL);
    assert_eq!(h.step(), SessionState::Serving);

    assert_eq!(
        h.sink.events.last(),
        Some(&NodeEvent::DecodeFailed(DecodeError::TooLarge {
            len: GET_ALL.len(),
            max: 16
        }))
    );
    assert!(h.transport().rx.is_empty(), "oversize input is drained");
    assert_eq!(h.transport().written.len(), 1);
}

// ── Reconnect ─────────────────────────────────────────────────

#[test]
fn peer_close_blinks_red_waits_and_reconnects_with_new_handshake() {
    let mut h = Harness::new();
    h.serve();
    h.transport().close_from_peer();

    assert_eq!(h.step(), SessionState::Disconnected);
    assert_eq!(
        h.sink.events.last(),
        Some(&NodeEvent::Disconnected {
            reason: DisconnectReason::PeerClosed
        })
    );

    h.delay.waits_ms.clear();
    assert_eq!(h.step(), SessionState::Connecting);
    assert_eq!(h.delay.waits_ms, vec![1000]);

    assert_eq!(h.step(), SessionState::Authenticated);
    let t = h.transport();
    assert_eq!(t.connects.len(), 2);
    assert_eq!(t.written.len(), 2);
    assert_eq!(t.written[0], t.written[1], "same handshake on every connection");
    assert_eq!(h.session.stats().handshakes, 2);
    assert_eq!(h.session.stats().disconnects, 1);
}

#[test]
fn buffered_query_is_processed_after_peer_close() {
    let mut h = Harness::new();
    h.serve();
    h.transport().push_incoming(GET_ALL);
    h.transport().close_from_peer();

    // Still "connected" while bytes remain, so the query is read and
    // answered; the reply then fails on the closed socket.
    assert_eq!(h.step(), SessionState::Disconnected);
    assert_eq!(h.sensors.reads, 1);
    assert_eq!(h.session.stats().responses, 0);
    assert_eq!(
        h.sink.events.last(),
        Some(&NodeEvent::Disconnected {
            reason: DisconnectReason::WriteFailed
        })
    );
}

#[test]
fn connect_failure_retries_forever_with_fixed_delay() {
    let mut h = Harness::new();
    h.transport().connect_results.extend([false, false, false]);

    for _ in 0..3 {
        h.step(); // → Connecting (delayed after the first)
        assert_eq!(h.step(), SessionState::Disconnected);
    }
    h.serve();

    let reasons: Vec<_> = h
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            NodeEvent::Disconnected { reason } => Some(*reason),
            _ => None,
        })
        .collect();
    assert_eq!(reasons, vec![DisconnectReason::ConnectFailed; 3]);
    assert_eq!(h.delay.waits_ms, vec![1000, 1000, 1000]);
    assert_eq!(h.session.stats().connect_attempts, 4);
    assert_eq!(h.sink.events.last(), Some(&NodeEvent::Connected { attempt: 4 }));
}

#[test]
fn handshake_write_failure_drops_connection() {
    let mut h = Harness::new();
    h.transport().fail_writes = true;
    h.step();
    assert_eq!(h.step(), SessionState::Disconnected);
    assert_eq!(
        h.sink.events,
        vec![NodeEvent::Disconnected {
            reason: DisconnectReason::HandshakeFailed
        }]
    );
    assert_eq!(h.session.stats().handshakes, 0);
}

#[test]
fn response_write_failure_drops_connection() {
    let mut h = Harness::new();
    h.serve();
    h.transport().fail_writes = true;
    h.transport().push_incoming(GET_ALL);

    assert_eq!(h.step(), SessionState::Disconnected);
    assert_eq!(
        h.sink.events.last(),
        Some(&NodeEvent::Disconnected {
            reason: DisconnectReason::WriteFailed
        })
    );
}

// ── Length-prefixed framing ───────────────────────────────────

#[test]
fn length_prefixed_framing_handles_split_and_coalesced_frames() {
    let mut config = ClientConfig::default();
    config.framing = Framing::LengthPrefixed;
    let mut h = Harness::with_config(config);
    h.serve();

    let mut wire = encode_frame(GET_ALL);
    wire.extend(encode_frame(br#"{"sender":8,"request":{"type":"GET","content":"all"}}"#));
    let (first, rest) = wire.split_at(10);

    h.transport().push_incoming(first);
    h.step();
    assert_eq!(h.session.stats().responses, 0);
    h.transport().push_incoming(rest);
    h.step();
    assert_eq!(h.session.stats().responses, 2);

    // Outbound messages are framed too: handshake + 2 responses.
    let mut dec = FrameDecoder::new(1024);
    let frames: Vec<Vec<u8>> = h
        .transport()
        .written
        .concat()
        .into_iter()
        .filter_map(|b| dec.push(b))
        .map(Result::unwrap)
        .collect();
    assert_eq!(frames.len(), 3);
    let receivers: Vec<i64> = frames[1..]
        .iter()
        .map(|f| serde_json::from_slice::<serde_json::Value>(f).unwrap()["receiver"].as_i64().unwrap())
        .collect();
    assert_eq!(receivers, vec![7, 8]);
}

#[test]
fn oversize_frame_is_skipped_and_next_frame_answered() {
    let mut config = ClientConfig::default();
    config.framing = Framing::LengthPrefixed;
    config.max_message_len = 64;
    let mut h = Harness::with_config(config);
    h.serve();

    let mut wire = encode_frame(&[b' '; 200]);
    wire.extend(encode_frame(GET_ALL));
    h.transport().push_incoming(&wire);
    assert_eq!(h.step(), SessionState::Serving);

    assert_eq!(h.session.stats().decode_failures, 1);
    assert_eq!(h.session.stats().responses, 1);
    assert!(h.sink.events.contains(&NodeEvent::DecodeFailed(DecodeError::TooLarge {
        len: 200,
        max: 64
    })));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = ClientConfig::default();
    config.server_host.clear();
    assert!(SessionController::new(config, IDENTITY, MockTransport::new()).is_err());
}
