//! Cryptographic error types.

use thiserror::Error;

/// Errors from key setup and authenticated encryption.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key material has the wrong length for the cipher.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Key length the cipher requires.
        expected: usize,
        /// Key length that was supplied.
        actual: usize,
    },

    /// Tag did not verify: wrong key, tampered ciphertext, mismatched
    /// associated data, or input too short to hold a tag.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// The cipher refused to seal the plaintext.
    #[error("encryption failed")]
    EncryptionFailed,
}

impl CryptoError {
    /// Returns true if this error is fatal (unrecoverable).
    ///
    /// Key setup failures abort the session. Per-message failures are
    /// reported and the session keeps processing later messages.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidKeyLength { .. } | Self::EncryptionFailed => true,
            Self::AuthenticationFailure => false,
        }
    }
}
