use std::time::Duration;

/// Default Firehose endpoint.
pub const DEFAULT_ADDRESS: &str = "firehose.flightaware.com:1501";

/// Default upper bound on the size of one JSON value, in bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// Stream session state machine.
///
/// Transitions: `Open` → `Initiated` → `Reading` ⇄ `Decoded` → `Closed`.
/// `Closed` is terminal and reachable from every state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    /// Transport connected, nothing sent yet.
    Open,
    /// Initiation command written.
    Initiated,
    /// A read is in flight.
    Reading,
    /// The last read completed with a message or a decode error.
    Decoded,
    /// Transport closed by the caller, by cancellation, by EOF, or by a
    /// transport failure.
    Closed,
}

impl StreamState {
    /// Returns the state name as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Initiated => "Initiated",
            Self::Reading => "Reading",
            Self::Decoded => "Decoded",
            Self::Closed => "Closed",
        }
    }
}

/// Configuration for [`FirehoseStream`](crate::FirehoseStream) connections.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// `host:port` to connect to. Default: [`DEFAULT_ADDRESS`].
    pub address: String,
    /// Timeout for the TCP connect and TLS handshake. Default: 10 seconds.
    pub connect_timeout: Duration,
    /// Upper bound on a single message read, on top of any caller deadline.
    /// Default: `None`.
    pub read_timeout: Option<Duration>,
    /// Largest JSON value accepted from the server, in bytes. A larger value
    /// closes the stream. Default: [`DEFAULT_MAX_MESSAGE_SIZE`].
    pub max_message_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_owned(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: None,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}
