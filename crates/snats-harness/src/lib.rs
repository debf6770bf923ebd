//! Deterministic test harness for secure NATS chat.
//!
//! In-memory implementations of the `Environment`, `Transport` and terminal
//! traits so whole chat sessions run inside a single test process.
//!
//! - [`MemoryBus`]: shared topic router. Echoes every publication back to
//!   the publisher's own subscriptions, like NATS does, and can duplicate
//!   deliveries to exercise at-least-once behaviour
//! - [`SeededEnv`]: reproducible randomness
//! - [`ScriptedInput`] / [`CapturedOutput`]: terminal stand-ins

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bus;
pub mod seeded_env;
pub mod terminal;

pub use bus::{MemoryBus, MemorySubscription, MemoryTransport, Publication};
pub use seeded_env::SeededEnv;
pub use terminal::{CapturedOutput, ScriptedInput};
