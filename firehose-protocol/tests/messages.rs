//! Decoding of captured Firehose messages.

use firehose_rs_protocol::{JsonFramer, Message, ProtocolError};

const POSITION: &str = r#"{"pitr":"1596067223","type":"position","ident":"WSN145","air_ground":"A","alt":"1550","alt_gnss":"1575","altChange":" ","clock":"1596067217","facility_hash":"152CF652CDC7C81E","facility_name":"FlightAware ADS-B","id":"WSN145-1596063797-adhoc-0","gs":"124","heading":"31","heading_magnetic":"33.6","heading_true":"30.9","hexid":"A15815","lat":"9.01767","lon":"-79.42058","mach":"0.188","orig":"L 9.13179 -81.43443","pressure":"958","reg":"N186MM","speed_ias":"120","speed_tas":"126","squawk":"1261","updateType":"A","vertRate":"-704","vertRate_geom":"-640","wind_dir":"57","wind_speed":"2","wind_quality":"1"}"#;

const ERROR: &str = r#"{"type":"error","error_msg":"I am an error"}"#;

#[test]
fn captured_position() {
    let msg = Message::decode(POSITION.as_bytes()).unwrap();
    assert_eq!(msg.message_type(), "position");
    let Message::Position(pos) = msg else {
        panic!("expected position");
    };

    assert_eq!(pos.ident.as_deref(), Some("WSN145"));
    assert_eq!(pos.id.as_deref(), Some("WSN145-1596063797-adhoc-0"));
    assert_eq!(pos.lat.as_deref(), Some("9.01767"));
    assert_eq!(pos.lon.as_deref(), Some("-79.42058"));
    assert_eq!(pos.clock.as_deref(), Some("1596067217"));
    assert_eq!(pos.pitr.as_deref(), Some("1596067223"));
    assert_eq!(pos.update_type.as_deref(), Some("A"));
    assert_eq!(pos.alt_change.as_deref(), Some(" "));
    assert_eq!(pos.vert_rate.as_deref(), Some("-704"));
    assert_eq!(pos.vert_rate_geom.as_deref(), Some("-640"));
    assert_eq!(pos.reg.as_deref(), Some("N186MM"));

    // Not in the capture.
    assert_eq!(pos.dest, None);
    assert_eq!(pos.aircrafttype, None);
    assert_eq!(pos.temperature, None);
    assert_eq!(pos.nic, None);
    assert_eq!(pos.waypoints, None);
}

#[test]
fn captured_error() {
    let msg: Message = ERROR.parse().unwrap();
    assert_eq!(msg.message_type(), "error");
    match msg {
        Message::Error(e) => assert_eq!(e.message, "I am an error"),
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn framed_sequence_survives_unknown_type() {
    let stream = format!("{POSITION}\n{{\"type\":\"keepalive\",\"serverTime\":\"1\"}}\n  {ERROR}\n");
    let mut input = stream.as_bytes();
    let mut framer = JsonFramer::new();
    let mut decoded = Vec::new();

    while let Some(end) = framer.scan(input) {
        decoded.push(Message::decode(&input[..end]));
        input = &input[end..];
    }
    assert!(framer.is_idle());

    assert_eq!(decoded.len(), 3);
    assert!(matches!(decoded[0], Ok(Message::Position(_))));
    assert!(matches!(
        &decoded[1],
        Err(ProtocolError::UnknownMessageType(t)) if t == "keepalive"
    ));
    assert!(matches!(decoded[2], Ok(Message::Error(_))));
}
