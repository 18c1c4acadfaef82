//! Async client for the FlightAware Firehose streaming feed.
//!
//! Connect over TLS, send an initiation command, then pull typed messages
//! one at a time with a cancellable read.

pub mod cancel;
pub mod client;
pub mod connection;
pub mod error;
pub mod state;
pub mod stream;

#[cfg(test)]
mod mock;

pub use cancel::{CancelReason, Cancellation};
pub use client::FirehoseStream;
pub use connection::{MessageReader, TlsTransport};
pub use error::{ClientError, Result};
pub use state::{ClientConfig, DEFAULT_ADDRESS, DEFAULT_MAX_MESSAGE_SIZE, StreamState};
pub use stream::message_stream;
