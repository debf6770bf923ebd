//! Message envelope.

use serde::{Deserialize, Serialize};

use crate::{
    codec::{decode, encode},
    error::ProtoError,
    name::DisplayName,
};

/// Wire record carrying a sender name and a base64 ciphertext.
///
/// Missing fields decode as empty strings and unknown fields are ignored, so
/// a sloppy peer produces an undecryptable message rather than a dropped one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    /// Sender's display name, as declared by the sender.
    pub name: String,
    /// Base64 of ciphertext ‖ tag.
    pub encrypted_msg: String,
}

impl Envelope {
    /// Wrap freshly sealed ciphertext for `sender`.
    pub fn new(sender: &DisplayName, ciphertext: &[u8]) -> Self {
        Self { name: sender.as_str().to_owned(), encrypted_msg: encode(ciphertext) }
    }

    /// Decode the ciphertext carried by this envelope.
    ///
    /// # Errors
    ///
    /// `ProtoError::MalformedEnvelope` if `encrypted_msg` is not base64.
    pub fn ciphertext(&self) -> Result<Vec<u8>, ProtoError> {
        decode(&self.encrypted_msg)
    }

    /// True if the declared sender is `name`.
    pub fn is_from(&self, name: &DisplayName) -> bool {
        self.name == name.as_str()
    }

    /// Serialize to the JSON message body.
    pub fn to_json(&self) -> Result<Vec<u8>, ProtoError> {
        serde_json::to_vec(self).map_err(|e| ProtoError::InvalidBody { reason: e.to_string() })
    }

    /// Parse a JSON message body.
    ///
    /// # Errors
    ///
    /// `ProtoError::InvalidBody` if the bytes are not a JSON object.
    pub fn from_json(body: &[u8]) -> Result<Self, ProtoError> {
        serde_json::from_slice(body).map_err(|e| ProtoError::InvalidBody { reason: e.to_string() })
    }
}
