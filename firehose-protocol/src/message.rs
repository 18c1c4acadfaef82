use std::str::FromStr;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ProtocolError, Result};

/// A decoded Firehose message, selected by the `type` field on the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Error(ErrorMessage),
    Position(Box<PositionMessage>),
}

impl Message {
    /// Decode one complete JSON object.
    ///
    /// The `type` field is read first and picks the payload variant; the
    /// whole object is then decoded into that variant. Unrecognized types
    /// are an error, not an ignored message.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let envelope = Envelope::decode(data)?;
        match envelope.message_type.as_str() {
            "error" => payload(data, "error").map(Self::Error),
            "position" => payload(data, "position").map(|p| Self::Position(Box::new(p))),
            _ => Err(ProtocolError::UnknownMessageType(envelope.message_type)),
        }
    }

    /// The wire discriminant of this message.
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::Error(_) => "error",
            Self::Position(_) => "position",
        }
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s.as_bytes())
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    message_type: String,
}

impl Envelope {
    fn decode(data: &[u8]) -> Result<Self> {
        // serde would happily read a struct out of a JSON array.
        let first = data.iter().find(|b| !b.is_ascii_whitespace());
        if first.is_some_and(|&b| b != b'{') {
            return Err(ProtocolError::MalformedEnvelope(
                <serde_json::Error as serde::de::Error>::custom("expected a JSON object"),
            ));
        }
        serde_json::from_slice(data).map_err(ProtocolError::MalformedEnvelope)
    }
}

fn payload<T: DeserializeOwned>(data: &[u8], message_type: &'static str) -> Result<T> {
    serde_json::from_slice(data)
        .map_err(|source| ProtocolError::MalformedPayload { message_type, source })
}

/// An error condition reported by the server, e.g. failed authentication.
///
/// A missing `error_msg` decodes as an empty message.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "error_msg", default)]
    pub message: String,
}

/// A 2D, 3D or 4D route point carried in [`PositionMessage::waypoints`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Waypoint {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// POSIX epoch time.
    pub clock: Option<String>,
    /// Airport, navaid, waypoint or intersection identifier.
    pub name: Option<String>,
    /// Feet MSL.
    pub alt: Option<String>,
    /// Knots.
    pub gs: Option<String>,
}

/// A position report.
///
/// Every field is optional: a field missing from the object is `None`, which
/// is not the same as an empty string or zero. Most numeric values are
/// transmitted as strings and kept that way.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PositionMessage {
    /// Flight callsign, typically ICAO airline code plus flight number, or
    /// the registration.
    pub ident: Option<String>,
    /// FlightAware flight ID, unique per flight.
    pub id: Option<String>,
    /// Decimal degrees, 5 decimal places.
    pub lat: Option<String>,
    /// Decimal degrees, 5 decimal places.
    pub lon: Option<String>,
    /// Report time, POSIX epoch.
    pub clock: Option<String>,
    /// Resume token for the `pitr` initiation directive.
    pub pitr: Option<String>,
    /// Position source: A (ADS-B), Z (radar), O (transoceanic), P (estimated),
    /// D (datalink), M (MLAT), X (ASDE-X), S (space-based ADS-B).
    #[serde(rename = "updateType")]
    pub update_type: Option<String>,
    /// A (air), G (ground), WOW (weight on wheels).
    pub air_ground: Option<String>,
    pub facility_hash: Option<String>,
    pub facility_name: Option<String>,

    /// Feet MSL.
    pub alt: Option<String>,
    /// C (climbing), D (descending) or a space when undetermined.
    #[serde(alias = "altChange")]
    pub alt_change: Option<String>,
    /// Ground speed, knots.
    pub gs: Option<String>,
    pub heading: Option<String>,
    /// Octal transponder code.
    pub squawk: Option<String>,
    /// Mode S code, upper case hex.
    pub hexid: Option<String>,
    pub atcident: Option<String>,
    /// ICAO aircraft type code.
    pub aircrafttype: Option<String>,
    pub orig: Option<String>,
    pub dest: Option<String>,
    pub reg: Option<String>,
    pub eta: Option<String>,
    pub edt: Option<String>,
    /// En route time, seconds.
    pub ete: Option<String>,
    /// Filed cruising speed, knots.
    pub speed: Option<String>,
    pub waypoints: Option<Vec<Waypoint>>,
    pub route: Option<String>,

    pub adsb_version: Option<String>,
    pub nac_p: Option<i32>,
    pub nac_v: Option<i32>,
    pub nic: Option<i32>,
    pub nic_baro: Option<i32>,
    pub sil: Option<i32>,
    /// `perhour`, `persample` or `unknown`.
    pub sil_type: Option<String>,
    /// Radius of containment, meters.
    pub pos_rc: Option<f64>,

    pub heading_magnetic: Option<String>,
    pub heading_true: Option<String>,
    pub mach: Option<String>,
    pub speed_tas: Option<String>,
    pub speed_ias: Option<String>,
    /// hPa.
    pub pressure: Option<String>,
    /// `1` when the aircraft is stable, `0` when maneuvering.
    pub wind_quality: Option<String>,
    /// Direction the wind blows from, degrees true.
    pub wind_dir: Option<String>,
    pub wind_speed: Option<String>,
    pub temperature_quality: Option<String>,
    /// Degrees Celsius.
    pub temperature: Option<String>,
    pub nav_heading: Option<String>,
    pub nav_altitude: Option<String>,
    pub nav_qnh: Option<String>,
    /// Any of autopilot, vnav, althold, approach, lnav, tcas.
    pub nav_modes: Option<String>,
    /// Feet above the WGS84 ellipsoid.
    pub alt_gnss: Option<String>,
    /// Feet per minute, from pressure altitude.
    #[serde(rename = "vertRate")]
    pub vert_rate: Option<String>,
    /// Feet per minute, from GNSS altitude.
    #[serde(rename = "vertRate_geom")]
    pub vert_rate_geom: Option<String>,
    pub fuel_on_board: Option<String>,
    /// LITERS, GALLONS, POUNDS, KILOGRAMS or UNKNOWN.
    pub fuel_on_board_unit: Option<String>,
}
