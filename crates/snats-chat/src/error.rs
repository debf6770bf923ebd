//! Client error types.

use std::fmt;

use snats_core::SessionError;

/// Errors that can occur in the chat client.
#[derive(Debug)]
pub enum ChatError {
    /// Invalid command line or interactive input
    Config(String),

    /// Terminal I/O error
    Io(String),

    /// Session error
    Session(SessionError),
}

impl ChatError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) | Self::Session(_) => 1,
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Io(msg) => write!(f, "terminal error: {}", msg),
            Self::Session(err) => write!(f, "session error: {}", err),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Session(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SessionError> for ChatError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
