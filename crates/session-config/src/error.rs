use session_shared::{FormatError, SessionError};
use thiserror::Error;

use crate::registry::ConfigHandle;

/// Errors produced by the config layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value failed validation before being stored.
    #[error(transparent)]
    Value(#[from] SessionError),

    /// No config object is registered under this handle (never created, or
    /// already freed).
    #[error("Unknown config handle {0}")]
    UnknownHandle(ConfigHandle),

    /// The handle refers to a different kind of config object.
    #[error("Config handle {handle} is a {actual}, not a {expected}")]
    WrongKind {
        handle: ConfigHandle,
        expected: &'static str,
        actual: &'static str,
    },

    /// The calling thread already holds the config lock.
    #[error("Config lock is already held by this thread")]
    Reentrant,
}

impl From<FormatError> for ConfigError {
    fn from(e: FormatError) -> Self {
        ConfigError::Value(e.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
