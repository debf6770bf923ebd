//! Per-session cipher selection.

use snats_crypto::{
    AeadSession, CryptoError, FRESH_NONCE_SIZE, FreshNonceSession, Passphrase, SessionNonce,
    derive_nonce,
};
use snats_proto::Topic;

use crate::env::Environment;

/// Cipher bound to one topic and passphrase for the lifetime of a session.
///
/// The topic's protocol version decides the nonce discipline, so every peer
/// on the same topic seals and opens the same way.
#[derive(Debug)]
pub enum SessionCipher {
    /// Version 1: AES-256-GCM under one nonce derived from passphrase, topic
    /// and key.
    Static {
        /// Cipher instance.
        aead: AeadSession,
        /// Nonce shared by every message of the session.
        nonce: SessionNonce,
    },
    /// Version 2: XChaCha20-Poly1305 with a random nonce per message.
    Fresh(FreshNonceSession),
}

impl SessionCipher {
    /// Derive the key from `passphrase` and build the cipher `topic` calls for.
    pub fn new(topic: &Topic, passphrase: &Passphrase) -> Result<Self, CryptoError> {
        let key = passphrase.derive_key();
        if topic.version().uses_fresh_nonce() {
            return Ok(Self::Fresh(FreshNonceSession::from_key(&key)?));
        }

        let nonce = derive_nonce(passphrase, topic.as_str(), &key);
        Ok(Self::Static { aead: AeadSession::from_key(&key)?, nonce })
    }

    /// Seal `plaintext` bound to `associated_data`.
    ///
    /// Draws a nonce from `env` in fresh mode.
    pub fn seal<E: Environment>(
        &self,
        env: &E,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Static { aead, nonce } => aead.seal(nonce, plaintext, associated_data),
            Self::Fresh(session) => {
                let nonce: [u8; FRESH_NONCE_SIZE] = env.random_array();
                session.seal(nonce, plaintext, associated_data)
            },
        }
    }

    /// Open a ciphertext sealed by a peer on the same topic.
    pub fn open(&self, sealed: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Static { aead, nonce } => aead.open(nonce, sealed, associated_data),
            Self::Fresh(session) => session.open(sealed, associated_data),
        }
    }
}
