//! Session lifecycle.
//!
//! ```text
//! Connecting ──► Announcing ──► Active ──► Leaving ──► Terminated
//!      │              │                                    ▲
//!      └──────────────┴────────────────────────────────────┘
//!                      (connect or subscribe failure)
//! ```

use std::fmt;

use crate::error::SessionError;

/// Phase of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    /// Establishing the bus connection.
    #[default]
    Connecting,
    /// Subscribing and publishing the join notice.
    Announcing,
    /// Exchanging chat lines.
    Active,
    /// Publishing the departure notice and flushing.
    Leaving,
    /// Session over.
    Terminated,
}

impl SessionPhase {
    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// `SessionError::InvalidTransition` if `next` does not follow `self` in
    /// the lifecycle.
    pub fn advance(self, next: Self) -> Result<Self, SessionError> {
        let allowed = matches!(
            (self, next),
            (Self::Connecting | Self::Announcing, Self::Terminated)
                | (Self::Connecting, Self::Announcing)
                | (Self::Announcing, Self::Active)
                | (Self::Active, Self::Leaving)
                | (Self::Leaving, Self::Terminated)
        );

        if allowed {
            tracing::debug!("session phase {} -> {}", self, next);
            Ok(next)
        } else {
            Err(SessionError::InvalidTransition { from: self, to: next })
        }
    }

    /// True once the session can no longer send or receive.
    pub fn is_terminal(self) -> bool {
        self == Self::Terminated
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Announcing => "announcing",
            Self::Active => "active",
            Self::Leaving => "leaving",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
