//! Transport abstraction for publish/subscribe buses.
//!
//! Production uses NATS, tests use an in-memory bus. The bus gives no
//! ordering or exactly-once guarantees and the session does not assume any:
//! every delivery is handled on its own.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use snats_proto::Topic;
use thiserror::Error;

/// Abstract publish/subscribe bus connection.
///
/// A connected transport publishes message bodies on a topic and hands out
/// subscriptions as streams of bodies. Publishers also receive their own
/// messages if they are subscribed to the topic they publish on.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Stream of message bodies delivered on a subscribed topic.
    ///
    /// Ends when the subscription or the connection is closed.
    type Subscription: Stream<Item = Bytes> + Send + Unpin + 'static;

    /// Publish one message body on `topic`.
    ///
    /// May buffer. Call [`Transport::flush`] to push buffered messages out.
    async fn publish(&self, topic: &Topic, body: Bytes) -> Result<(), TransportError>;

    /// Wait until buffered publications have been handed to the bus.
    async fn flush(&self) -> Result<(), TransportError>;

    /// Start receiving every message published on `topic`.
    async fn subscribe(&self, topic: &Topic) -> Result<Self::Subscription, TransportError>;
}

/// Errors from bus operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Could not establish a connection to the bus.
    #[error("connect failed: {reason}")]
    Connect {
        /// Description of the failure.
        reason: String,
    },

    /// A single publication was not accepted.
    #[error("publish failed: {reason}")]
    Publish {
        /// Description of the failure.
        reason: String,
    },

    /// Buffered publications could not be flushed.
    #[error("flush failed: {reason}")]
    Flush {
        /// Description of the failure.
        reason: String,
    },

    /// Subscription could not be created.
    #[error("subscribe failed: {reason}")]
    Subscribe {
        /// Description of the failure.
        reason: String,
    },

    /// The connection is gone.
    #[error("connection closed")]
    Closed,
}

impl TransportError {
    /// Returns true if the connection can no longer be used.
    ///
    /// A failed publish or flush only loses the affected messages.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Connect { .. } | Self::Subscribe { .. } | Self::Closed => true,
            Self::Publish { .. } | Self::Flush { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_message_failures_are_transient() {
        assert!(!TransportError::Publish { reason: "slow consumer".into() }.is_fatal());
        assert!(!TransportError::Flush { reason: "timeout".into() }.is_fatal());
    }

    #[test]
    fn connection_failures_are_fatal() {
        assert!(TransportError::Connect { reason: "refused".into() }.is_fatal());
        assert!(TransportError::Subscribe { reason: "denied".into() }.is_fatal());
        assert!(TransportError::Closed.is_fatal());
    }
}
