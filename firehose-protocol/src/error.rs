#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("unknown message type: {0:?}")]
    UnknownMessageType(String),

    #[error("malformed {message_type} message: {source}")]
    MalformedPayload {
        message_type: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
