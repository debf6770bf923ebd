//! Session error types.

use snats_crypto::CryptoError;
use snats_proto::ProtoError;
use thiserror::Error;

use crate::{phase::SessionPhase, transport::TransportError};

/// Errors from running a chat session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Cipher construction or sealing failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Invalid room, name or envelope.
    #[error("protocol error: {0}")]
    Proto(#[from] ProtoError),

    /// Bus operation failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Phase change outside the session lifecycle.
    #[error("invalid phase transition: {from} -> {to}")]
    InvalidTransition {
        /// Phase the session was in.
        from: SessionPhase,
        /// Phase that was requested.
        to: SessionPhase,
    },

    /// Reading the local input failed.
    #[error("input error: {reason}")]
    Input {
        /// Description of the failure.
        reason: String,
    },
}

impl SessionError {
    /// Returns true if this error is fatal (unrecoverable).
    ///
    /// Transient errors affect a single message and the session carries on.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Crypto(e) => e.is_fatal(),
            Self::Transport(e) => e.is_fatal(),
            Self::Proto(_) | Self::InvalidTransition { .. } | Self::Input { .. } => true,
        }
    }
}
