//! Session configuration.

use snats_crypto::Passphrase;
use snats_proto::{DisplayName, ProtocolVersion};

/// Everything a participant supplies at startup.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Room to join. Turned into the topic `snats.<version>.<room>`.
    pub room: String,
    /// Shared secret. Never transmitted.
    pub passphrase: Passphrase,
    /// Local display name, bound into every ciphertext we seal.
    pub name: DisplayName,
    /// Wire protocol version.
    pub protocol: ProtocolVersion,
}

impl SessionConfig {
    /// Configuration for `room` with the default protocol version.
    pub fn new(room: impl Into<String>, passphrase: Passphrase, name: DisplayName) -> Self {
        Self { room: room.into(), passphrase, name, protocol: ProtocolVersion::default() }
    }

    /// Override the protocol version.
    #[must_use]
    pub fn with_protocol(mut self, protocol: ProtocolVersion) -> Self {
        self.protocol = protocol;
        self
    }
}
