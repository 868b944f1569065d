//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means a serialization problem — the connection
//! itself is fine, and the session keeps processing later messages after
//! dropping the offending one.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing an outbound message failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// An inbound payload was malformed: invalid JSON, missing fields,
    /// or an unrecognized `type` tag.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates a protocol rule.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
