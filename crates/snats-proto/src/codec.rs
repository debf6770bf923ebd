//! Base64 codec for ciphertext payloads.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

use crate::error::ProtoError;

/// Render ciphertext as padded standard base64.
pub fn encode(ciphertext: &[u8]) -> String {
    BASE64.encode(ciphertext)
}

/// Inverse of [`encode`].
///
/// # Errors
///
/// `ProtoError::MalformedEnvelope` on characters outside the alphabet or
/// incorrect padding. Never truncates silently.
pub fn decode(text: &str) -> Result<Vec<u8>, ProtoError> {
    BASE64.decode(text).map_err(|e| ProtoError::MalformedEnvelope { reason: e.to_string() })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        assert_eq!(encode(&[]), "");
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn output_is_padded() {
        assert_eq!(encode(b"hi"), "aGk=");
        assert_eq!(decode("aGk=").unwrap(), b"hi");
    }

    #[test]
    fn non_alphabet_rejected() {
        assert!(matches!(decode("not base64!"), Err(ProtoError::MalformedEnvelope { .. })));
        assert!(matches!(decode("a-b_"), Err(ProtoError::MalformedEnvelope { .. })));
    }

    #[test]
    fn bad_padding_rejected() {
        assert!(matches!(decode("aGk"), Err(ProtoError::MalformedEnvelope { .. })));
        assert!(matches!(decode("aGk=="), Err(ProtoError::MalformedEnvelope { .. })));
    }
}
