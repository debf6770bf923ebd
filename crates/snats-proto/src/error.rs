//! Protocol error types.

use thiserror::Error;

/// Errors from building or parsing wire types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtoError {
    /// `encrypted_msg` is not valid padded standard base64.
    #[error("malformed envelope: {reason}")]
    MalformedEnvelope {
        /// Decoder diagnostic.
        reason: String,
    },

    /// Message body is not a JSON envelope.
    #[error("invalid envelope body: {reason}")]
    InvalidBody {
        /// Parser diagnostic.
        reason: String,
    },

    /// Room name cannot be turned into a topic.
    #[error("invalid room {room:?}: {reason}")]
    InvalidRoom {
        /// Room name as supplied.
        room: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyName,

    /// Protocol version string is not recognised.
    #[error("unknown protocol version: {0}")]
    UnknownVersion(String),
}
