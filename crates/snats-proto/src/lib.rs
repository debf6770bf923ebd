//! Secure NATS chat wire protocol
//!
//! Everything that crosses the bus lives here. A published message body is a
//! JSON record with two text fields:
//!
//! ```text
//! { "name": "<sender display name>", "encrypted_msg": "<base64(ciphertext ‖ tag)>" }
//! ```
//!
//! There is no version field in the body. The protocol version is part of the
//! topic (`snats.<version>.<room>`), so peers speaking different versions
//! simply never see each other's traffic.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod envelope;
pub mod error;
pub mod name;
pub mod topic;

pub use codec::{decode, encode};
pub use envelope::Envelope;
pub use error::ProtoError;
pub use name::DisplayName;
pub use topic::{ProtocolVersion, TOPIC_PREFIX, Topic};
