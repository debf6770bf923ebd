//! Fuzz target for the message delivery path
//!
//! Everything a bus delivers reaches `ChatSession::receive` unfiltered, from
//! any publisher on the topic.
//!
//! # Strategy
//!
//! - Raw bodies: arbitrary bytes, mostly not JSON
//! - Forged envelopes: valid JSON with arbitrary name and base64 payload
//! - Tampering: a genuine envelope with one bit flipped or a different sender
//!
//! # Invariants
//!
//! - NEVER panic, whatever the body
//! - Only genuine, untampered envelopes render as a message
//! - A genuine message renders exactly the text that was sealed
//! - Our own name always yields an echo, never a rendered line

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use snats_core::{ChatSession, Delivery, Environment, SessionConfig};
use snats_crypto::Passphrase;
use snats_proto::{encode, DisplayName, Envelope, ProtocolVersion};

#[derive(Clone)]
struct FuzzEnv;

impl Environment for FuzzEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        buffer.fill(0x5a);
    }
}

#[derive(Debug, Arbitrary)]
enum Body {
    Raw(Vec<u8>),
    Forged { name: String, ciphertext: Vec<u8> },
    Tampered { text: String, byte: usize, bit: u8 },
    Reattributed { text: String, name: String },
    Genuine { text: String },
}

#[derive(Debug, Arbitrary)]
struct Input {
    fresh_nonce: bool,
    bodies: Vec<Body>,
}

fn session(name: &str, protocol: ProtocolVersion) -> ChatSession<FuzzEnv> {
    let config = SessionConfig::new(
        "lobby",
        Passphrase::from("secret"),
        DisplayName::new(name).expect("valid name"),
    )
    .with_protocol(protocol);
    ChatSession::new(FuzzEnv, &config).expect("session")
}

fuzz_target!(|input: Input| {
    let protocol = if input.fresh_nonce { ProtocolVersion::V2 } else { ProtocolVersion::V1 };
    let alice = session("alice", protocol);
    let bob = session("bob", protocol);

    for body in input.bodies {
        match body {
            Body::Raw(bytes) => {
                let delivery = bob.receive(&bytes);
                assert!(!matches!(delivery, Delivery::Message { .. }));
            },
            Body::Forged { name, ciphertext } => {
                let is_bob = name == "bob";
                let envelope = Envelope { name, encrypted_msg: encode(&ciphertext) };
                let delivery = bob.receive(&envelope.to_json().expect("json"));
                if is_bob {
                    assert_eq!(delivery, Delivery::Echo);
                } else {
                    assert!(matches!(delivery, Delivery::Undecryptable { .. }));
                }
            },
            Body::Tampered { text, byte, bit } => {
                let Some(envelope) = alice.outbound(&text).expect("seal") else { continue };
                let mut ciphertext = envelope.ciphertext().expect("base64");
                let at = byte % ciphertext.len();
                ciphertext[at] ^= 1 << (bit % 8);

                let tampered = Envelope { encrypted_msg: encode(&ciphertext), ..envelope };
                let delivery = bob.receive(&tampered.to_json().expect("json"));
                assert!(matches!(delivery, Delivery::Undecryptable { .. }));
            },
            Body::Reattributed { text, name } => {
                if name == "alice" || name == "bob" {
                    continue;
                }
                let Some(mut envelope) = alice.outbound(&text).expect("seal") else { continue };
                envelope.name = name;
                let delivery = bob.receive(&envelope.to_json().expect("json"));
                assert!(matches!(delivery, Delivery::Undecryptable { .. }));
            },
            Body::Genuine { text } => {
                let Some(envelope) = alice.outbound(&text).expect("seal") else {
                    assert!(text.trim().is_empty());
                    continue;
                };
                let body = envelope.to_json().expect("json");
                assert_eq!(alice.receive(&body), Delivery::Echo);
                assert_eq!(
                    bob.receive(&body),
                    Delivery::Message { sender: "alice".to_owned(), text }
                );
            },
        }
    }
});
