//! Viewer error types

use crate::types::{ItemId, TransportFailure};
use thiserror::Error;

/// Main error type of the navigation core
#[derive(Error, Debug)]
pub enum NavError {
    // ===== Recoverable Errors (notify user, continue) =====
    #[error("Failed to fetch {id}: status {status}")]
    Transport { id: ItemId, status: u16 },

    #[error("Runtime channel closed: {0}")]
    ChannelClosed(String),

    // ===== Startup Errors =====
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

impl NavError {
    pub fn transport(id: ItemId, failure: &TransportFailure) -> Self {
        NavError::Transport {
            id,
            status: failure.status,
        }
    }

    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(self, NavError::Transport { .. } | NavError::ChannelClosed(_))
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            NavError::Transport { status, .. } => format!("Error: {}", status),
            NavError::Config(msg) => format!("Invalid settings: {}", msg),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NavError>;

/// Transient, user-visible notice shown by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    FetchFailed { id: ItemId, status: u16 },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::FetchFailed { id, status } => NavError::Transport { id: *id, status: *status }.user_message(),
        }
    }
}
