//! XChaCha20-Poly1305 with a fresh nonce per message.
//!
//! The 24-byte nonce is large enough to be drawn at random for every message
//! without tracking counters. It is prepended to the ciphertext so receivers
//! need no shared nonce state.
//!
//! ```text
//! [24 bytes: nonce][N bytes: ciphertext][16 bytes: tag]
//! ```

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};

use crate::{
    aead::TAG_SIZE,
    error::CryptoError,
    key::{KEY_SIZE, SymmetricKey},
};

/// Size of the random nonce carried in front of each ciphertext.
pub const FRESH_NONCE_SIZE: usize = 24;

/// Authenticated encryption that never reuses a nonce under one key.
pub struct FreshNonceSession {
    cipher: XChaCha20Poly1305,
}

impl FreshNonceSession {
    /// Instantiate the cipher from raw key bytes.
    ///
    /// # Errors
    ///
    /// `CryptoError::InvalidKeyLength` if `key` is not [`KEY_SIZE`] bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let cipher = XChaCha20Poly1305::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: key.len() })?;
        Ok(Self { cipher })
    }

    /// Instantiate the cipher from a derived key.
    pub fn from_key(key: &SymmetricKey) -> Result<Self, CryptoError> {
        Self::new(key.as_bytes())
    }

    /// Seal `plaintext` under the caller-provided random `nonce`.
    ///
    /// The caller must supply fresh random bytes for every call.
    pub fn seal(
        &self,
        nonce: [u8; FRESH_NONCE_SIZE],
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let ciphertext = self
            .cipher
            .encrypt(XNonce::from_slice(&nonce), Payload { msg: plaintext, aad: associated_data })
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut sealed = Vec::with_capacity(FRESH_NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Open a message produced by [`FreshNonceSession::seal`].
    ///
    /// # Errors
    ///
    /// `CryptoError::AuthenticationFailure` if the input is too short to hold
    /// a nonce and tag, or the tag does not verify under this key and
    /// associated data.
    pub fn open(&self, sealed: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if sealed.len() < FRESH_NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::AuthenticationFailure);
        }

        let (nonce, ciphertext) = sealed.split_at(FRESH_NONCE_SIZE);
        self.cipher
            .decrypt(XNonce::from_slice(nonce), Payload { msg: ciphertext, aad: associated_data })
            .map_err(|_| CryptoError::AuthenticationFailure)
    }
}

impl std::fmt::Debug for FreshNonceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreshNonceSession").field("cipher", &"XChaCha20-Poly1305").finish()
    }
}
