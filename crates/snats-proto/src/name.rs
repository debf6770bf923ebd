//! Local participant display name.

use crate::error::ProtoError;

/// Name the local participant publishes under.
///
/// Trimmed and non-empty. It is also the associated data bound into every
/// ciphertext this participant seals. Names received from the wire are not
/// validated and stay plain strings in [`Envelope`](crate::Envelope).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and trim a raw name.
    ///
    /// # Errors
    ///
    /// `ProtoError::EmptyName` if nothing is left after trimming.
    pub fn new(raw: &str) -> Result<Self, ProtoError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProtoError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The name as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as associated data.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DisplayName {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
