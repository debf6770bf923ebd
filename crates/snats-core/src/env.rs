//! Environment abstraction for deterministic testing.
//!
//! Session logic never touches the OS directly. The only system resource it
//! needs is randomness for per-message nonces, which production draws from
//! the OS entropy pool and tests draw from a seeded generator.
//!
//! # Invariants
//!
//! - Determinism: given the same seed, `random_bytes()` produces the same
//!   sequence
//! - Isolation: implementations must not share global state

/// Abstract environment providing randomness.
///
/// # Security
///
/// Production implementations MUST fill buffers from a cryptographically
/// secure source. A fresh nonce that repeats under the same key breaks
/// confidentiality of both messages.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Returns an array of `N` random bytes.
    fn random_array<const N: usize>(&self) -> [u8; N] {
        let mut bytes = [0u8; N];
        self.random_bytes(&mut bytes);
        bytes
    }
}
