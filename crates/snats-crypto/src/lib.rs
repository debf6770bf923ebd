//! Secure NATS chat cryptographic primitives
//!
//! This crate turns a shared passphrase into everything a chat participant
//! needs to seal and open messages.
//!
//! # Design
//!
//! All functions in this crate are pure. Derivations are deterministic so that
//! independent participants reach the same key and nonce without any key
//! exchange. Random bytes required by the fresh-nonce mode are provided by the
//! caller, which keeps this crate free of I/O and lets tests use seeded RNGs.
//!
//! ```text
//! Passphrase ────────────────┐
//!      │ SHA-256             │
//!      ▼                     │
//! SymmetricKey ──────────────┤
//!      │                     │ SHA-256(passphrase ‖ topic ‖ key)
//!      ▼                     ▼
//! AeadSession ◄──────── SessionNonce
//!      │
//!      ▼ seal(plaintext, associated_data = sender name)
//! ciphertext ‖ tag
//! ```
//!
//! # Security
//!
//! - Sender binding: every ciphertext is sealed with the sender's display name
//!   as associated data, so re-attributing a message to another sender fails
//!   authentication
//! - Session nonce reuse: [`AeadSession`] is driven with one nonce for the
//!   whole session, matching deployed `snats.1` peers on the wire. Under a
//!   fixed key and nonce, GCM confidentiality and integrity degrade as more
//!   messages are sealed. [`FreshNonceSession`] is the alternative that draws
//!   a new nonce per message and carries it in front of the ciphertext

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aead;
pub mod error;
pub mod fresh;
pub mod key;
pub mod nonce;

pub use aead::{AeadSession, TAG_SIZE};
pub use error::CryptoError;
pub use fresh::{FRESH_NONCE_SIZE, FreshNonceSession};
pub use key::{KEY_SIZE, Passphrase, SymmetricKey, derive_key};
pub use nonce::{NONCE_SIZE, SessionNonce, derive_nonce};
