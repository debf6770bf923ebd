//! Chat session state.
//!
//! The `ChatSession` holds everything fixed for the lifetime of a process:
//! the local name, the topic and the cipher. It turns outgoing text into
//! envelopes and incoming message bodies into [`Delivery`] values. It never
//! performs I/O.

use snats_crypto::CryptoError;
use snats_proto::{DisplayName, Envelope, Topic};

use crate::{
    cipher::SessionCipher, config::SessionConfig, env::Environment, error::SessionError,
};

/// Plaintext published when a participant joins.
pub const JOIN_TEXT: &str = "<joined>\n";

/// Plaintext published when a participant leaves.
pub const DEPARTURE_TEXT: &str = "<left>\n";

/// Shown in place of a message that could not be opened.
pub const UNDECRYPTABLE_TEXT: &str = "<unable to decrypt, wrong key?>";

/// Why an attributed message could not be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// `encrypted_msg` is not valid base64.
    MalformedPayload,
    /// Tag did not verify: wrong passphrase, tampering or a forged sender.
    Authentication,
}

/// Outcome of handling one message body from the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Opened successfully.
    Message {
        /// Declared sender, authenticated by the tag.
        sender: String,
        /// Plaintext without its trailing newline.
        text: String,
    },
    /// Our own message coming back from the bus.
    Echo,
    /// Attributed to a sender but could not be opened.
    Undecryptable {
        /// Declared sender. Not authenticated.
        sender: String,
        /// What went wrong.
        cause: Rejection,
    },
    /// Body is not an envelope at all.
    Unreadable,
}

impl Delivery {
    /// Terminal line for this delivery, if anything should be shown.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Message { sender, text } => Some(format!("[{sender}] {text}")),
            Self::Undecryptable { sender, .. } => Some(format!("[{sender}] {UNDECRYPTABLE_TEXT}")),
            Self::Echo | Self::Unreadable => None,
        }
    }
}

/// Immutable per-process chat state.
///
/// Built once at startup and shared read-only (`Arc`) between the input loop
/// and the delivery task.
///
/// # Type Parameters
///
/// - `E`: Environment implementation for randomness
#[derive(Debug)]
pub struct ChatSession<E: Environment> {
    name: DisplayName,
    topic: Topic,
    cipher: SessionCipher,
    env: E,
}

impl<E: Environment> ChatSession<E> {
    /// Derive the key, topic and cipher from `config`.
    ///
    /// # Errors
    ///
    /// - `SessionError::Proto` if the room is not a valid topic segment
    /// - `SessionError::Crypto` if the cipher cannot be constructed
    pub fn new(env: E, config: &SessionConfig) -> Result<Self, SessionError> {
        let topic = Topic::new(config.protocol, &config.room)?;
        let cipher = SessionCipher::new(&topic, &config.passphrase)?;

        Ok(Self { name: config.name.clone(), topic, cipher, env })
    }

    /// Local display name.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Topic this session publishes and subscribes on.
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Envelope announcing that we joined.
    pub fn announce(&self) -> Result<Envelope, SessionError> {
        self.seal(JOIN_TEXT)
    }

    /// Envelope announcing that we left.
    pub fn depart(&self) -> Result<Envelope, SessionError> {
        self.seal(DEPARTURE_TEXT)
    }

    /// Envelope for one line of user input.
    ///
    /// Returns `Ok(None)` for blank or whitespace-only lines. The sealed
    /// plaintext is the line followed by `\n`.
    pub fn outbound(&self, line: &str) -> Result<Option<Envelope>, SessionError> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        self.seal(&format!("{line}\n")).map(Some)
    }

    /// Handle one message body delivered on our topic.
    ///
    /// Never fails. Problems are logged and reflected in the returned
    /// [`Delivery`].
    pub fn receive(&self, body: &[u8]) -> Delivery {
        let envelope = match Envelope::from_json(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(topic = %self.topic, "dropping unreadable message body: {}", e);
                return Delivery::Unreadable;
            },
        };

        if envelope.is_from(&self.name) {
            return Delivery::Echo;
        }

        let ciphertext = match envelope.ciphertext() {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                tracing::warn!(sender = %envelope.name, "malformed envelope: {}", e);
                return Delivery::Undecryptable {
                    sender: envelope.name,
                    cause: Rejection::MalformedPayload,
                };
            },
        };

        match self.cipher.open(&ciphertext, envelope.name.as_bytes()) {
            Ok(plaintext) => {
                let text = String::from_utf8_lossy(&plaintext);
                let text = text.strip_suffix('\n').unwrap_or(&text).to_owned();
                Delivery::Message { sender: envelope.name, text }
            },
            Err(CryptoError::AuthenticationFailure) => {
                tracing::warn!(sender = %envelope.name, "authentication failed");
                Delivery::Undecryptable { sender: envelope.name, cause: Rejection::Authentication }
            },
            Err(e) => {
                tracing::warn!(sender = %envelope.name, "cannot open message: {}", e);
                Delivery::Undecryptable { sender: envelope.name, cause: Rejection::Authentication }
            },
        }
    }

    fn seal(&self, text: &str) -> Result<Envelope, SessionError> {
        let ciphertext = self.cipher.seal(&self.env, text.as_bytes(), self.name.as_bytes())?;
        Ok(Envelope::new(&self.name, &ciphertext))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use snats_crypto::Passphrase;
    use snats_proto::{ProtocolVersion, encode};

    use super::*;

    #[derive(Clone)]
    struct ZeroEnv;

    impl Environment for ZeroEnv {
        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.fill(0);
        }
    }

    fn session(name: &str, passphrase: &str) -> ChatSession<ZeroEnv> {
        let config = SessionConfig::new(
            "lobby",
            Passphrase::from(passphrase),
            DisplayName::new(name).unwrap(),
        );
        ChatSession::new(ZeroEnv, &config).unwrap()
    }

    fn body(envelope: &Envelope) -> Vec<u8> {
        envelope.to_json().unwrap()
    }

    #[test]
    fn topic_follows_room_and_version() {
        assert_eq!(session("alice", "secret").topic().as_str(), "snats.1.lobby");

        let config = SessionConfig::new(
            "lobby",
            Passphrase::from("secret"),
            DisplayName::new("alice").unwrap(),
        )
        .with_protocol(ProtocolVersion::V2);
        let session = ChatSession::new(ZeroEnv, &config).unwrap();
        assert_eq!(session.topic().as_str(), "snats.2.lobby");
    }

    #[test]
    fn invalid_room_rejected() {
        let config = SessionConfig::new(
            "no rooms with spaces",
            Passphrase::from("secret"),
            DisplayName::new("alice").unwrap(),
        );
        assert!(matches!(ChatSession::new(ZeroEnv, &config), Err(SessionError::Proto(_))));
    }

    #[test]
    fn peer_message_delivered() {
        let alice = session("alice", "secret");
        let bob = session("bob", "secret");

        let envelope = alice.outbound("hello").unwrap().unwrap();
        let delivery = bob.receive(&body(&envelope));
        assert_eq!(
            delivery,
            Delivery::Message { sender: "alice".into(), text: "hello".into() }
        );
        assert_eq!(delivery.render().unwrap(), "[alice] hello");
    }

    #[test]
    fn known_answer_ciphertext() {
        let envelope = session("alice", "secret").outbound("hello").unwrap().unwrap();
        assert_eq!(envelope.encrypted_msg, encode(&[
            0x83, 0xd1, 0xdd, 0x2b, 0x83, 0xeb, 0x48, 0x02, 0xa1, 0xf4, 0x8f, 0xf5, 0x01, 0xb9,
            0x44, 0x2e, 0x54, 0xd5, 0x56, 0x61, 0x57, 0xea,
        ]));
        assert_eq!(envelope.encrypted_msg, "g9HdK4PrSAKh9I/1AblELlTVVmFX6g==");
    }

    #[test]
    fn deployed_peer_envelope_opens() {
        let body = br#"{"name":"alice","encrypted_msg":"g9HdK4PrSAKh9I/1AblELlTVVmFX6g=="}"#;
        assert_eq!(
            session("bob", "secret").receive(body),
            Delivery::Message { sender: "alice".into(), text: "hello".into() }
        );
    }

    #[test]
    fn announcements_render_as_markers() {
        let alice = session("alice", "secret");
        let bob = session("bob", "secret");

        let joined = bob.receive(&body(&alice.announce().unwrap()));
        assert_eq!(joined.render().unwrap(), "[alice] <joined>");
        let left = bob.receive(&body(&alice.depart().unwrap()));
        assert_eq!(left.render().unwrap(), "[alice] <left>");
    }

    #[test]
    fn wrong_passphrase_renders_placeholder() {
        let alice = session("alice", "secret");
        let carol = session("carol", "wrong");

        let delivery = carol.receive(&body(&alice.outbound("hello").unwrap().unwrap()));
        assert_eq!(
            delivery,
            Delivery::Undecryptable { sender: "alice".into(), cause: Rejection::Authentication }
        );
        assert_eq!(delivery.render().unwrap(), "[alice] <unable to decrypt, wrong key?>");
    }

    #[test]
    fn own_messages_suppressed() {
        let alice = session("alice", "secret");
        let envelope = alice.outbound("hello").unwrap().unwrap();
        assert_eq!(alice.receive(&body(&envelope)), Delivery::Echo);
        assert_eq!(alice.receive(&body(&envelope)).render(), None);
    }

    #[test]
    fn blank_lines_produce_nothing() {
        let alice = session("alice", "secret");
        assert!(alice.outbound("").unwrap().is_none());
        assert!(alice.outbound("   \t").unwrap().is_none());
    }

    #[test]
    fn reattributed_message_fails_authentication() {
        let alice = session("alice", "secret");
        let bob = session("bob", "secret");

        let mut envelope = alice.outbound("hello").unwrap().unwrap();
        envelope.name = "mallory".into();
        assert_eq!(
            bob.receive(&body(&envelope)),
            Delivery::Undecryptable { sender: "mallory".into(), cause: Rejection::Authentication }
        );
    }

    #[test]
    fn malformed_payload_renders_placeholder() {
        let bob = session("bob", "secret");
        let delivery = bob.receive(br#"{"name":"alice","encrypted_msg":"***"}"#);
        assert_eq!(
            delivery,
            Delivery::Undecryptable { sender: "alice".into(), cause: Rejection::MalformedPayload }
        );
        assert_eq!(delivery.render().unwrap(), "[alice] <unable to decrypt, wrong key?>");
    }

    #[test]
    fn non_envelope_body_dropped() {
        let bob = session("bob", "secret");
        assert_eq!(bob.receive(b"not json"), Delivery::Unreadable);
        assert_eq!(bob.receive(b"not json").render(), None);
    }

    #[test]
    fn invalid_utf8_rendered_lossily() {
        let alice = session("alice", "secret");
        let bob = session("bob", "secret");

        let ciphertext = alice.cipher.seal(&ZeroEnv, b"caf\xe9\n", b"alice").unwrap();
        let envelope = Envelope::new(alice.name(), &ciphertext);
        assert_eq!(
            bob.receive(&body(&envelope)),
            Delivery::Message { sender: "alice".into(), text: "caf\u{fffd}".into() }
        );
    }
}
