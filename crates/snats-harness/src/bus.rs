//! In-memory publish/subscribe bus.
//!
//! Every [`MemoryTransport`] handed out by one [`MemoryBus`] talks to the same
//! router. Subjects match exactly; there are no wildcards.

use std::{
    collections::HashMap,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use snats_core::{Transport, TransportError};
use snats_proto::Topic;
use tokio::sync::mpsc;

/// One message accepted by the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Subject it was published on.
    pub subject: String,
    /// Message body.
    pub body: Bytes,
}

#[derive(Default)]
struct BusState {
    subscribers: HashMap<String, Vec<mpsc::UnboundedSender<Bytes>>>,
    log: Vec<Publication>,
    flushes: usize,
    duplicate: bool,
    reject_publish: bool,
    closed: bool,
}

/// Shared in-memory router.
#[derive(Clone, Default)]
pub struct MemoryBus {
    state: Arc<Mutex<BusState>>,
}

impl MemoryBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver every publication twice.
    #[must_use]
    pub fn with_duplicates(self) -> Self {
        self.lock().duplicate = true;
        self
    }

    /// Open a new connection to the bus.
    pub fn connect(&self) -> MemoryTransport {
        MemoryTransport { bus: self.clone() }
    }

    /// Make subsequent publications fail with a transient error.
    pub fn reject_publishes(&self, reject: bool) {
        self.lock().reject_publish = reject;
    }

    /// Close the bus. Open subscriptions end and further operations fail.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.subscribers.clear();
    }

    /// Every publication accepted so far, in order.
    pub fn published(&self) -> Vec<Publication> {
        self.lock().log.clone()
    }

    /// Publications accepted on `subject`.
    pub fn published_on(&self, subject: &str) -> Vec<Publication> {
        self.lock().log.iter().filter(|p| p.subject == subject).cloned().collect()
    }

    /// Number of flushes requested.
    pub fn flushes(&self) -> usize {
        self.lock().flushes
    }

    /// Number of live subscriptions on `subject`.
    pub fn subscriber_count(&self, subject: &str) -> usize {
        self.lock()
            .subscribers
            .get(subject)
            .map_or(0, |subs| subs.iter().filter(|tx| !tx.is_closed()).count())
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MemoryBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MemoryBus")
            .field("subjects", &state.subscribers.len())
            .field("published", &state.log.len())
            .field("closed", &state.closed)
            .finish()
    }
}

/// Connection to a [`MemoryBus`].
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    bus: MemoryBus,
}

#[async_trait]
impl Transport for MemoryTransport {
    type Subscription = MemorySubscription;

    async fn publish(&self, topic: &Topic, body: Bytes) -> Result<(), TransportError> {
        let mut state = self.bus.lock();
        if state.closed {
            return Err(TransportError::Closed);
        }
        if state.reject_publish {
            return Err(TransportError::Publish { reason: "rejected by bus".to_owned() });
        }

        let copies = if state.duplicate { 2 } else { 1 };
        if let Some(subscribers) = state.subscribers.get_mut(topic.as_str()) {
            subscribers.retain(|tx| (0..copies).all(|_| tx.send(body.clone()).is_ok()));
        }

        state.log.push(Publication { subject: topic.as_str().to_owned(), body });
        Ok(())
    }

    async fn flush(&self) -> Result<(), TransportError> {
        let mut state = self.bus.lock();
        if state.closed {
            return Err(TransportError::Closed);
        }
        state.flushes += 1;
        Ok(())
    }

    async fn subscribe(&self, topic: &Topic) -> Result<MemorySubscription, TransportError> {
        let mut state = self.bus.lock();
        if state.closed {
            return Err(TransportError::Subscribe { reason: "bus closed".to_owned() });
        }

        let (tx, rx) = mpsc::unbounded_channel();
        state.subscribers.entry(topic.as_str().to_owned()).or_default().push(tx);
        Ok(MemorySubscription { rx })
    }
}

/// Stream of bodies delivered to one subscription.
#[derive(Debug)]
pub struct MemorySubscription {
    rx: mpsc::UnboundedReceiver<Bytes>,
}

impl Stream for MemorySubscription {
    type Item = Bytes;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
        self.rx.poll_recv(cx)
    }
}
