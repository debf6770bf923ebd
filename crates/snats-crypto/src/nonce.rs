//! Session nonce derivation.
//!
//! No nonce travels on the wire in the session nonce mode, so every party must
//! be able to recompute it locally from what they already share: the
//! passphrase, the topic string and the derived key.

use sha2::{Digest, Sha256, digest::OutputSizeUser, digest::typenum::Unsigned};

use crate::key::{Passphrase, SymmetricKey};

/// Size of the session nonce in bytes.
///
/// Equal to both the SHA-256 output size and the nonce size the
/// [`AeadSession`](crate::AeadSession) cipher is instantiated with.
pub const NONCE_SIZE: usize = 32;

const _: () = assert!(NONCE_SIZE == <Sha256 as OutputSizeUser>::OutputSize::USIZE);

/// Nonce shared by every seal and open in one session.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SessionNonce([u8; NONCE_SIZE]);

impl SessionNonce {
    /// Wrap existing nonce bytes.
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw nonce bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SessionNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionNonce({:02x}{:02x}{:02x}{:02x}..)", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

/// Derive the session nonce as SHA-256(passphrase ‖ topic ‖ key).
///
/// Computed once per process. Participants on the same topic with the same
/// passphrase always agree on the result. The passphrase bytes come first:
/// deployed `snats.1` peers keep feeding the hasher they derived the key with.
pub fn derive_nonce(passphrase: &Passphrase, topic: &str, key: &SymmetricKey) -> SessionNonce {
    let mut hasher = Sha256::new();
    hasher.update(passphrase.as_bytes());
    hasher.update(topic.as_bytes());
    hasher.update(key.as_bytes());
    SessionNonce(hasher.finalize().into())
}
