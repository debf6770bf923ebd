//! Secure NATS chat client.
//!
//! Production wiring for the session core:
//! - async-nats for the bus
//! - Tokio for the async runtime and Ctrl-C handling
//! - OS randomness for per-message nonces
//!
//! ## Architecture
//!
//! ```text
//! snats-chat
//!   ├─ Args            (clap CLI, env fallbacks)
//!   ├─ SystemEnv       (production Environment impl)
//!   ├─ NatsTransport   (async-nats client)
//!   ├─ LineReader      (stdin lines from a dedicated thread)
//!   ├─ TerminalOutput  (ANSI line redraw + prompt)
//!   └─ Runtime         (snats-core session driver)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cli;
mod error;
mod system_env;
mod terminal;
mod transport;

pub use cli::Args;
pub use error::ChatError;
use snats_core::{ChatSession, LineInput, Runtime, SessionConfig, Shutdown, shutdown_channel};
use snats_proto::DisplayName;
pub use system_env::SystemEnv;
pub use terminal::{LineReader, TerminalOutput};
pub use transport::{NatsSubscription, NatsTransport};

/// Connection name announced to the NATS server.
pub const CONNECTION_NAME: &str = "secure-nats-chat";

/// Endpoint used when no server is given.
pub const DEFAULT_SERVER: &str = "tls://demo.nats.io:4443";

/// Prompt shown when no display name was supplied.
const NAME_PROMPT: &str = "Enter Name: ";

/// Client configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ChatRuntimeConfig {
    /// NATS server URL (e.g., "tls://demo.nats.io:4443")
    pub server_url: String,
    /// Connection name reported to the server
    pub connection_name: String,
}

impl Default for ChatRuntimeConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER.to_string(),
            connection_name: CONNECTION_NAME.to_string(),
        }
    }
}

/// Start listening for Ctrl-C.
///
/// Call once, before any other work, and hand the returned signal to every
/// later stage. An interrupt that arrives while no stage is waiting on it is
/// kept until one does.
pub fn listen_for_interrupt() -> Shutdown {
    let (trigger, shutdown) = shutdown_channel();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::debug!("interrupt received");
                trigger.trigger();
            },
            // dropping the trigger leaves every listener waiting forever
            Err(e) => tracing::warn!("cannot listen for Ctrl-C: {}", e),
        }
    });

    shutdown
}

/// Ask for a display name on the terminal.
///
/// Returns `Ok(None)` if `shutdown` fires before a name was entered.
///
/// # Errors
///
/// - `ChatError::Config` if input ends or the name is blank
/// - `ChatError::Io` if reading the terminal fails
pub async fn prompt_name<I, W>(
    input: &mut I,
    output: &TerminalOutput<W>,
    shutdown: &mut Shutdown,
) -> Result<Option<DisplayName>, ChatError>
where
    I: LineInput,
    W: std::io::Write + Send + 'static,
{
    output.write_raw(NAME_PROMPT);

    let line = tokio::select! {
        biased;
        () = shutdown.triggered() => return Ok(None),
        line = input.read_line() => line?,
    };

    let line = line.ok_or_else(|| ChatError::Config("no display name entered".to_string()))?;
    DisplayName::new(&line).map(Some).map_err(|e| ChatError::Config(e.to_string()))
}

/// Run one chat session against NATS until `shutdown` fires or input ends.
///
/// # Errors
///
/// Returns error if:
/// - The room is invalid
/// - The NATS server cannot be reached
/// - The session fails fatally while active
pub async fn run_chat<I: LineInput>(
    config: ChatRuntimeConfig,
    session: SessionConfig,
    input: I,
    mut shutdown: Shutdown,
) -> Result<(), ChatError> {
    let session = ChatSession::new(SystemEnv::new(), &session)?;
    let output = TerminalOutput::stdout();

    tracing::info!("connecting to {}", config.server_url);
    let connector = NatsTransport::connect(&config.server_url, &config.connection_name);

    let mut runtime = tokio::select! {
        biased;
        () = shutdown.triggered() => {
            tracing::info!("interrupted while connecting");
            return Ok(());
        },
        runtime = Runtime::connect(session, connector, output.clone()) => runtime?,
    };

    tracing::info!("securely connected to {}", config.server_url);

    let result = runtime.run(input, shutdown).await;
    output.finish_line();
    result.map_err(ChatError::from)
}
