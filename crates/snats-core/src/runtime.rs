//! Session runtime.
//!
//! Drives a [`ChatSession`] through its phases against real or simulated
//! I/O. The input loop runs on the caller's task. Deliveries are drained by a
//! spawned task that only shares the immutable session and the output sink.

use std::{future::Future, sync::Arc};

use bytes::Bytes;
use futures::StreamExt;
use snats_proto::Envelope;
use tokio::task::JoinHandle;

use crate::{
    env::Environment,
    error::SessionError,
    phase::SessionPhase,
    session::ChatSession,
    shutdown::Shutdown,
    terminal::{LineInput, LineOutput},
    transport::{Transport, TransportError},
};

/// Why the input loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Interrupted,
    EndOfInput,
}

/// Connected chat session runtime.
///
/// # Type Parameters
///
/// - `E`: Environment implementation for randomness
/// - `T`: Bus transport
/// - `O`: Terminal output sink
pub struct Runtime<E: Environment, T: Transport, O: LineOutput> {
    session: Arc<ChatSession<E>>,
    transport: T,
    output: O,
    phase: SessionPhase,
}

impl<E, T, O> Runtime<E, T, O>
where
    E: Environment,
    T: Transport,
    O: LineOutput,
{
    /// Establish the bus connection.
    ///
    /// `connector` performs the actual connect. On success the runtime is in
    /// [`SessionPhase::Announcing`].
    ///
    /// # Errors
    ///
    /// `SessionError::Transport` if the connector fails. The session never
    /// gets past [`SessionPhase::Connecting`].
    pub async fn connect<F>(
        session: ChatSession<E>,
        connector: F,
        output: O,
    ) -> Result<Self, SessionError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        let phase = SessionPhase::Connecting;

        let transport = match connector.await {
            Ok(transport) => transport,
            Err(e) => {
                tracing::error!("connection failed: {}", e);
                phase.advance(SessionPhase::Terminated)?;
                return Err(e.into());
            },
        };

        tracing::info!(topic = %session.topic(), name = %session.name(), "connected");

        Ok(Self {
            session: Arc::new(session),
            transport,
            output,
            phase: phase.advance(SessionPhase::Announcing)?,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Shared session state.
    pub fn session(&self) -> &Arc<ChatSession<E>> {
        &self.session
    }

    /// Run the session until `shutdown` fires or `input` ends.
    ///
    /// Subscribes, announces, then publishes one envelope per non-blank input
    /// line while a background task renders deliveries. On exit the departure
    /// notice is published and the transport flushed, both best-effort.
    ///
    /// A shutdown that fires before the session is active ends it without a
    /// departure notice.
    ///
    /// # Errors
    ///
    /// - `SessionError::Transport` if the subscription cannot be created
    /// - Any fatal error raised while active. The departure notice is still
    ///   attempted before the error is returned.
    pub async fn run<I>(
        &mut self,
        mut input: I,
        mut shutdown: Shutdown,
    ) -> Result<(), SessionError>
    where
        I: LineInput,
    {
        let subscribed = tokio::select! {
            biased;
            () = shutdown.triggered() => None,
            subscribed = self.transport.subscribe(self.session.topic()) => Some(subscribed),
        };

        let subscription = match subscribed {
            Some(Ok(subscription)) => subscription,
            Some(Err(e)) => {
                tracing::error!("subscribe failed: {}", e);
                self.advance(SessionPhase::Terminated)?;
                return Err(e.into());
            },
            None => return self.abandon(),
        };

        let deliveries = tokio::spawn(deliver(
            Arc::clone(&self.session),
            subscription,
            self.output.clone(),
        ));

        let announced = tokio::select! {
            biased;
            () = shutdown.triggered() => None,
            announced = self.announce() => Some(announced),
        };

        match announced {
            Some(Ok(())) => {},
            Some(Err(e)) => {
                deliveries.abort();
                self.advance(SessionPhase::Terminated)?;
                return Err(e);
            },
            None => {
                stop(deliveries).await;
                return self.abandon();
            },
        }

        self.advance(SessionPhase::Active)?;
        let outcome = self.chat(&mut input, &mut shutdown).await;

        self.advance(SessionPhase::Leaving)?;
        self.leave().await;
        stop(deliveries).await;
        self.advance(SessionPhase::Terminated)?;

        match outcome {
            Ok(exit) => {
                tracing::info!("session ended: {:?}", exit);
                Ok(())
            },
            Err(e) => {
                tracing::error!("session failed: {}", e);
                Err(e)
            },
        }
    }

    /// Interrupted while announcing.
    fn abandon(&mut self) -> Result<(), SessionError> {
        tracing::info!("interrupted before joining {}", self.session.topic());
        self.advance(SessionPhase::Terminated)
    }

    async fn announce(&self) -> Result<(), SessionError> {
        let envelope = self.session.announce()?;
        self.publish(&envelope).await?;
        tracing::info!("announced on {}", self.session.topic());
        Ok(())
    }

    async fn chat<I>(&self, input: &mut I, shutdown: &mut Shutdown) -> Result<Exit, SessionError>
    where
        I: LineInput,
    {
        let name = self.session.name().as_str();

        loop {
            self.output.show_prompt(name);

            let line = tokio::select! {
                biased;
                () = shutdown.triggered() => return Ok(Exit::Interrupted),
                line = input.read_line() => line,
            };

            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(Exit::EndOfInput),
                Err(e) => return Err(SessionError::Input { reason: e.to_string() }),
            };

            if let Some(envelope) = self.session.outbound(&line)? {
                self.publish(&envelope).await?;
            }
        }
    }

    async fn leave(&self) {
        match self.session.depart() {
            Ok(envelope) => {
                if let Err(e) = self.publish(&envelope).await {
                    tracing::debug!("departure notice not sent: {}", e);
                }
            },
            Err(e) => tracing::debug!("departure notice not sealed: {}", e),
        }

        if let Err(e) = self.transport.flush().await {
            tracing::debug!("flush on departure failed: {}", e);
        }
    }

    /// Publish one envelope. Transient failures lose the message and are
    /// only logged.
    async fn publish(&self, envelope: &Envelope) -> Result<(), SessionError> {
        let body = Bytes::from(envelope.to_json()?);

        match self.transport.publish(self.session.topic(), body).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                tracing::warn!("message lost: {}", e);
                Ok(())
            },
        }
    }

    fn advance(&mut self, next: SessionPhase) -> Result<(), SessionError> {
        self.phase = self.phase.advance(next)?;
        Ok(())
    }
}

/// Drain the subscription, rendering every delivery worth showing.
async fn deliver<E, S, O>(session: Arc<ChatSession<E>>, mut subscription: S, output: O)
where
    E: Environment,
    S: futures::Stream<Item = Bytes> + Unpin,
    O: LineOutput,
{
    while let Some(body) = subscription.next().await {
        if let Some(line) = session.receive(&body).render() {
            output.render(&line);
            output.show_prompt(session.name().as_str());
        }
    }

    tracing::debug!("subscription closed");
}

async fn stop(deliveries: JoinHandle<()>) {
    deliveries.abort();
    if let Err(e) = deliveries.await
        && !e.is_cancelled()
    {
        tracing::warn!("delivery task failed: {}", e);
    }
}
