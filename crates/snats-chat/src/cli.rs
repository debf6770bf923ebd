//! Command line arguments.

use clap::Parser;
use snats_core::SessionConfig;
use snats_crypto::Passphrase;
use snats_proto::{DisplayName, ProtocolVersion};

use crate::{ChatError, ChatRuntimeConfig, DEFAULT_SERVER};

/// Encrypted group chat over NATS
#[derive(Parser, Debug)]
#[command(name = "snats-chat")]
#[command(about = "End-to-end encrypted group chat over NATS")]
#[command(version)]
pub struct Args {
    /// Room to join
    pub room: String,

    /// Shared passphrase for the room
    #[arg(env = "SNATS_KEY", hide_env_values = true)]
    pub passphrase: String,

    /// Display name (prompted for if omitted)
    #[arg(short, long, env = "SNATS_NAME")]
    pub name: Option<String>,

    /// NATS server URL
    #[arg(short, long, env = "SNATS_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Wire protocol version (1: session nonce, 2: per-message nonce)
    #[arg(short, long, default_value = "1")]
    pub protocol: ProtocolVersion,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Client runtime configuration.
    pub fn runtime_config(&self) -> ChatRuntimeConfig {
        ChatRuntimeConfig { server_url: self.server.clone(), ..Default::default() }
    }

    /// Display name given on the command line, if any.
    ///
    /// # Errors
    ///
    /// `ChatError::Config` if the name is blank.
    pub fn display_name(&self) -> Result<Option<DisplayName>, ChatError> {
        self.name
            .as_deref()
            .map(DisplayName::new)
            .transpose()
            .map_err(|e| ChatError::Config(e.to_string()))
    }

    /// Session configuration for `name`.
    ///
    /// # Errors
    ///
    /// `ChatError::Config` if the passphrase is empty.
    pub fn session_config(&self, name: DisplayName) -> Result<SessionConfig, ChatError> {
        if self.passphrase.is_empty() {
            return Err(ChatError::Config("passphrase must not be empty".to_string()));
        }

        let passphrase = Passphrase::from(self.passphrase.as_str());
        Ok(SessionConfig::new(self.room.clone(), passphrase, name).with_protocol(self.protocol))
    }
}
