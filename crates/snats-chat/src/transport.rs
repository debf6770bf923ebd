//! NATS transport built on async-nats.

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use snats_core::{Transport, TransportError};
use snats_proto::Topic;

/// Connection to a NATS server.
#[derive(Debug, Clone)]
pub struct NatsTransport {
    client: async_nats::Client,
}

impl NatsTransport {
    /// Connect to `server_url` and report `connection_name` to the server.
    ///
    /// `tls://` URLs require TLS for the connection.
    ///
    /// # Errors
    ///
    /// `TransportError::Connect` if the server cannot be reached or the
    /// handshake fails.
    pub async fn connect(server_url: &str, connection_name: &str) -> Result<Self, TransportError> {
        let client = async_nats::ConnectOptions::new()
            .name(connection_name)
            .connect(server_url)
            .await
            .map_err(|e| TransportError::Connect { reason: e.to_string() })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for NatsTransport {
    type Subscription = NatsSubscription;

    async fn publish(&self, topic: &Topic, body: Bytes) -> Result<(), TransportError> {
        self.client
            .publish(topic.as_str().to_owned(), body)
            .await
            .map_err(|e| TransportError::Publish { reason: e.to_string() })
    }

    async fn flush(&self) -> Result<(), TransportError> {
        self.client.flush().await.map_err(|e| TransportError::Flush { reason: e.to_string() })
    }

    async fn subscribe(&self, topic: &Topic) -> Result<NatsSubscription, TransportError> {
        let subscriber = self
            .client
            .subscribe(topic.as_str().to_owned())
            .await
            .map_err(|e| TransportError::Subscribe { reason: e.to_string() })?;

        Ok(NatsSubscription { subscriber })
    }
}

/// Message bodies delivered to a NATS subscription.
///
/// Unsubscribes when dropped.
#[derive(Debug)]
pub struct NatsSubscription {
    subscriber: async_nats::Subscriber,
}

impl Stream for NatsSubscription {
    type Item = Bytes;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
        self.subscriber.poll_next_unpin(cx).map(|message| message.map(|m| m.payload))
    }
}
