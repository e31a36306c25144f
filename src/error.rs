//! Error types for contact resolution, channel drivers and configuration.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial error taxonomy

use serde::Serialize;
use thiserror::Error;

/// Errors produced while resolving a contact reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// More than one equally good candidate (reserved, the matcher never produces it)
    #[error("Contact '{query}' is ambiguous: {}", candidates.join(", "))]
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },

    /// No contact matched the reference
    #[error("Contact '{0}' not found")]
    NotFound(String),
}

/// Errors a channel driver can report to the orchestrator.
///
/// These never escape `Dispatcher::dispatch`; they are recorded in the
/// outcome trail and turned into a fallback transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Window or session could not be found or opened
    #[error("Channel unavailable: {0}")]
    Unavailable(String),

    /// Expected UI surface never appeared within its bound
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// Surface found but an input or submit action failed
    #[error("Interaction failed: {0}")]
    InteractionFailed(String),
}

impl ChannelError {
    pub fn kind(&self) -> ChannelErrorKind {
        match self {
            ChannelError::Unavailable(_) => ChannelErrorKind::Unavailable,
            ChannelError::Timeout(_) => ChannelErrorKind::Timeout,
            ChannelError::InteractionFailed(_) => ChannelErrorKind::InteractionFailed,
        }
    }
}

/// Serializable tag for a [`ChannelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelErrorKind {
    Unavailable,
    Timeout,
    InteractionFailed,
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience alias for channel driver results.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
