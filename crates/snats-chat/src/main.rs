//! Secure NATS chat binary.
//!
//! # Usage
//!
//! ```bash
//! # Join room "lobby" on the public demo server
//! snats-chat lobby 'correct horse battery staple'
//!
//! # Passphrase from the environment, own server, per-message nonces
//! SNATS_KEY=secret snats-chat lobby --name alice --server nats://localhost:4222 --protocol 2
//! ```

use std::process::ExitCode;

use clap::Parser;
use snats_chat::{
    Args, ChatError, LineReader, TerminalOutput, listen_for_interrupt, prompt_name, run_chat,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout belongs to the chat, logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match chat(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        },
    }
}

async fn chat(args: Args) -> Result<(), ChatError> {
    let mut shutdown = listen_for_interrupt();
    let mut input = LineReader::stdin();

    let name = match args.display_name()? {
        Some(name) => name,
        None => match prompt_name(&mut input, &TerminalOutput::stdout(), &mut shutdown).await? {
            Some(name) => name,
            None => return Ok(()),
        },
    };

    let session = args.session_config(name)?;
    tracing::info!("joining room {} as {}", session.room, session.name);

    run_chat(args.runtime_config(), session, input, shutdown).await
}
