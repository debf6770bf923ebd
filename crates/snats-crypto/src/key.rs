//! Passphrase handling and key derivation.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the derived symmetric key in bytes.
pub const KEY_SIZE: usize = 32;

/// Shared secret supplied once at startup.
///
/// Never transmitted. The bytes are wiped when the value is dropped and the
/// `Debug` impl only reports the length.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Passphrase(Vec<u8>);

impl Passphrase {
    /// Wrap raw passphrase bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw passphrase bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// True if no bytes were supplied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Derive the session key from this passphrase.
    pub fn derive_key(&self) -> SymmetricKey {
        derive_key(&self.0)
    }
}

impl From<String> for Passphrase {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&str> for Passphrase {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Passphrase(<redacted {} bytes>)", self.0.len())
    }
}

/// 256-bit symmetric key derived from a [`Passphrase`].
///
/// Equality is constant-time. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    /// Wrap existing key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes (use with caution).
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SymmetricKey {}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey").field("key", &"[REDACTED]").finish()
    }
}

/// Derive a symmetric key with a single SHA-256 pass over the passphrase.
///
/// Deterministic: every participant holding the same passphrase derives a
/// byte-identical key, which is the only thing that lets them talk without a
/// key exchange. Accepts input of any length.
pub fn derive_key(passphrase: &[u8]) -> SymmetricKey {
    SymmetricKey(Sha256::digest(passphrase).into())
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn derive_key_matches_sha256() {
        let key = derive_key(b"secret");
        assert_eq!(
            key.as_bytes(),
            &hex!("2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b")
        );
    }

    #[test]
    fn derive_key_is_deterministic() {
        assert_eq!(derive_key(b"correct horse"), derive_key(b"correct horse"));
    }

    #[test]
    fn different_passphrases_give_different_keys() {
        assert_ne!(derive_key(b"secret"), derive_key(b"wrong"));
        assert_ne!(derive_key(b"secret"), derive_key(b"secret "));
    }

    #[test]
    fn passphrase_debug_is_redacted() {
        let passphrase = Passphrase::from("hunter2");
        let rendered = format!("{passphrase:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("7 bytes"));
    }

    #[test]
    fn key_debug_is_redacted() {
        let rendered = format!("{:?}", derive_key(b"secret"));
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("2b"));
    }

    #[test]
    fn passphrase_derives_same_key_as_free_function() {
        let passphrase = Passphrase::from(String::from("lobby pass"));
        assert_eq!(passphrase.derive_key(), derive_key(b"lobby pass"));
    }
}
