//! Topic naming.
//!
//! A topic is `snats.<version>.<room>`. Every participant of a room must
//! produce the exact same string, including the version prefix, to
//! interoperate.

use crate::error::ProtoError;

/// Namespace shared by all chat topics.
pub const TOPIC_PREFIX: &str = "snats";

/// Wire protocol version, carried only in the topic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProtocolVersion {
    /// AES-256-GCM under one session nonce derived from topic and key.
    #[default]
    V1,
    /// XChaCha20-Poly1305 with a random nonce prepended to each ciphertext.
    V2,
}

impl ProtocolVersion {
    /// Version token used in the topic.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V2 => "2",
        }
    }

    /// True if every message carries its own nonce.
    pub fn uses_fresh_nonce(self) -> bool {
        matches!(self, Self::V2)
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProtocolVersion {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Self::V1),
            "2" => Ok(Self::V2),
            other => Err(ProtoError::UnknownVersion(other.to_owned())),
        }
    }
}

/// Fully qualified subject a room is published on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    subject: String,
    version: ProtocolVersion,
}

impl Topic {
    /// Build the topic for `room` under `version`.
    ///
    /// # Errors
    ///
    /// `ProtoError::InvalidRoom` if the room is empty, contains whitespace or
    /// subject wildcards (`*`, `>`), or has empty `.`-separated tokens.
    pub fn new(version: ProtocolVersion, room: &str) -> Result<Self, ProtoError> {
        let invalid = |reason| ProtoError::InvalidRoom { room: room.to_owned(), reason };

        if room.is_empty() {
            return Err(invalid("room must not be empty"));
        }
        if room.chars().any(char::is_whitespace) {
            return Err(invalid("room must not contain whitespace"));
        }
        if room.contains(['*', '>']) {
            return Err(invalid("room must not contain wildcards"));
        }
        if room.split('.').any(str::is_empty) {
            return Err(invalid("room must not contain empty tokens"));
        }

        Ok(Self { subject: format!("{TOPIC_PREFIX}.{}.{room}", version.as_str()), version })
    }

    /// Subject string as published on the bus.
    pub fn as_str(&self) -> &str {
        &self.subject
    }

    /// Protocol version encoded in this topic.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.subject)
    }
}
