//! Error types for mtnav

use thiserror::Error;

/// Result type alias using the mtnav Error
pub type Result<T> = std::result::Result<T, Error>;

/// mtnav error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Destination not found: {destination} is not registered for {namespace}")]
    DestinationNotFound { namespace: String, destination: String },

    #[error("Capability not found: {0}")]
    CapabilityNotFound(String),

    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Transition to {destination} failed: {reason}")]
    Transition { destination: String, reason: String },

    #[error("WebDriver error: {error} - {message}")]
    WebDriver { error: String, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Coarse classification used by the navigation graph and callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Definition-time problems: missing views, duplicate registrations, cycles
    Configuration,
    /// Unknown destination or capability
    Lookup,
    /// An element the presence check relies on is missing
    Presence,
    /// Anything else, typically raised by a step transition or the driver
    Transition,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) | Error::TomlParse(_) | Error::TomlSerialize(_) => {
                ErrorKind::Configuration
            }
            Error::DestinationNotFound { .. } | Error::CapabilityNotFound(_) => ErrorKind::Lookup,
            Error::NoSuchElement(_) => ErrorKind::Presence,
            _ => ErrorKind::Transition,
        }
    }

    /// Shorthand for a step that wants to fail with a plain message
    pub fn transition(destination: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Transition {
            destination: destination.into(),
            reason: reason.into(),
        }
    }
}
