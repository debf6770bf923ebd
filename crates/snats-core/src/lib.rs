//! Secure NATS chat core
//!
//! Session orchestration for an encrypted group chat running over a
//! publish/subscribe bus. All I/O goes through traits so the same logic runs
//! against NATS in production and against an in-memory bus in tests.
//!
//! # Architecture
//!
//! ```text
//! LineInput ──► Runtime ──► ChatSession::outbound ──► Transport::publish
//!                  │
//!                  └─ spawned task: Transport::subscribe
//!                         └─► ChatSession::receive ──► LineOutput::render
//! ```
//!
//! - [`ChatSession`]: immutable per-process state (name, topic, cipher),
//!   shared through an `Arc` by the input loop and the delivery task
//! - [`SessionPhase`]: `Connecting → Announcing → Active → Leaving →
//!   Terminated`
//! - [`Runtime`]: drives the phases against a [`Transport`], a [`LineInput`]
//!   and a [`LineOutput`]
//! - [`Shutdown`]: sticky interrupt signal, observed in every phase after
//!   connecting
//! - [`Environment`]: source of randomness for per-message nonces

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cipher;
pub mod config;
pub mod env;
pub mod error;
pub mod phase;
pub mod runtime;
pub mod session;
pub mod shutdown;
pub mod terminal;
pub mod transport;

pub use cipher::SessionCipher;
pub use config::SessionConfig;
pub use env::Environment;
pub use error::SessionError;
pub use phase::SessionPhase;
pub use runtime::Runtime;
pub use session::{
    ChatSession, DEPARTURE_TEXT, Delivery, JOIN_TEXT, Rejection, UNDECRYPTABLE_TEXT,
};
pub use shutdown::{Shutdown, ShutdownTrigger, shutdown_channel};
pub use terminal::{LineInput, LineOutput};
pub use transport::{Transport, TransportError};
