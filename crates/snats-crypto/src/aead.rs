//! AES-256-GCM session with a 256-bit nonce.
//!
//! The nonce size is 32 bytes rather than the usual 12, so the GCM counter
//! block is derived through GHASH. That lets the SHA-256 output be used as the
//! nonce directly, which is how deployed `snats.1` peers seal their messages.

use aes_gcm::{
    AesGcm, Nonce,
    aead::{Aead, KeyInit, Payload, consts::U32},
    aes::Aes256,
};

use crate::{
    error::CryptoError,
    key::{KEY_SIZE, SymmetricKey},
    nonce::SessionNonce,
};

/// Size of the authentication tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

type Aes256Gcm32 = AesGcm<Aes256, U32>;

/// Authenticated encryption bound to a single key.
///
/// Immutable once constructed, so it can be shared read-only between the
/// input loop and the delivery task.
pub struct AeadSession {
    cipher: Aes256Gcm32,
}

impl AeadSession {
    /// Instantiate the cipher from raw key bytes.
    ///
    /// # Errors
    ///
    /// `CryptoError::InvalidKeyLength` if `key` is not [`KEY_SIZE`] bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let cipher = Aes256Gcm32::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: key.len() })?;
        Ok(Self { cipher })
    }

    /// Instantiate the cipher from a derived key.
    pub fn from_key(key: &SymmetricKey) -> Result<Self, CryptoError> {
        Self::new(key.as_bytes())
    }

    /// Seal `plaintext`, binding `associated_data` into the tag.
    ///
    /// Output is ciphertext followed by a [`TAG_SIZE`]-byte tag.
    pub fn seal(
        &self,
        nonce: &SessionNonce,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.cipher
            .encrypt(
                Nonce::<U32>::from_slice(nonce.as_bytes()),
                Payload { msg: plaintext, aad: associated_data },
            )
            .map_err(|_| CryptoError::EncryptionFailed)
    }

    /// Open a sealed message.
    ///
    /// # Errors
    ///
    /// `CryptoError::AuthenticationFailure` if the input is shorter than a tag
    /// or the tag does not verify under this key, nonce and associated data.
    /// No plaintext is returned on failure.
    pub fn open(
        &self,
        nonce: &SessionNonce,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < TAG_SIZE {
            return Err(CryptoError::AuthenticationFailure);
        }

        self.cipher
            .decrypt(
                Nonce::<U32>::from_slice(nonce.as_bytes()),
                Payload { msg: ciphertext, aad: associated_data },
            )
            .map_err(|_| CryptoError::AuthenticationFailure)
    }
}

impl std::fmt::Debug for AeadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AeadSession").field("cipher", &"AES-256-GCM/256-bit nonce").finish()
    }
}
