//! Firehose protocol types, initiation commands, and message decoding.
//!
//! This crate holds the I/O-free layer of the Firehose feed: the
//! initiation-command grammar sent once per session, the tagged JSON
//! messages streamed back by the server, and an incremental framer that
//! finds JSON value boundaries in a continuous byte stream.

pub mod command;
pub mod error;
pub mod framing;
pub mod message;

pub use command::{Event, InitCommand, PitrRange, Rectangle};
pub use error::{ProtocolError, Result};
pub use framing::JsonFramer;
pub use message::{ErrorMessage, Message, PositionMessage, Waypoint};
