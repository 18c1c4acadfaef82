use std::time::Duration;

/// Errors that can occur during Firehose client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// TCP connect or TLS handshake failed.
    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),

    /// The TLS client configuration could not be built.
    #[error("TLS configuration failed: {0}")]
    Tls(#[source] tokio_rustls::rustls::Error),

    /// The configured address has no usable TLS server name.
    #[error("invalid server name: {0:?}")]
    InvalidServerName(String),

    /// Connecting or reading exceeded the configured timeout.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// Writing to the transport failed.
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    /// Reading from the transport failed.
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    /// A single JSON value exceeded the configured maximum size in bytes.
    #[error("message exceeds {0} bytes")]
    MessageTooLarge(usize),

    /// A single message could not be decoded. The stream stays usable.
    #[error("protocol error: {0}")]
    Protocol(#[from] firehose_rs_protocol::ProtocolError),

    /// The caller cancelled the operation.
    #[error("cancelled")]
    Cancelled,

    /// The caller's deadline passed before a message arrived.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The stream was already closed.
    #[error("stream closed")]
    Closed,

    /// The background read task panicked or was aborted.
    #[error("read task failed: {0}")]
    DecodeTask(#[from] tokio::task::JoinError),
}

impl ClientError {
    /// Returns `true` for a caller-initiated stop, which is a clean shutdown
    /// rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` if the stream cannot be used after this error.
    ///
    /// Only per-message decode errors leave the stream usable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Protocol(_))
    }
}

/// Convenience alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;
