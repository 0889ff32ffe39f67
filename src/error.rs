//! Error types for address resolution and daemon setup.
//!
//! `ResolveError` is the internal failure taxonomy of the resolver. The display
//! never sees it: every variant collapses to an empty address, but the kind is
//! kept for logging. `AppError` covers settings loading and daemon wiring.
//!
//! Both serialize as `{ "kind": "...", "message": "..." }` so log consumers can
//! distinguish failure categories programmatically.

use serde::ser::SerializeStruct;

/// Why a single address lookup produced nothing.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The probe program is not installed or not on PATH.
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// The command ran but its output carried no address token.
    #[error("no address in output of {0}")]
    NoMatch(String),

    /// The command did not finish within the configured timeout.
    #[error("{0} timed out")]
    Timeout(String),

    /// An address-shaped token was found but failed the loose format check.
    #[error("malformed address {0:?}")]
    MalformedOutput(String),

    /// Any other spawn or pipe failure.
    #[error("{0}")]
    Io(String),
}

impl ResolveError {
    /// Returns the error kind as a string matching the variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::CommandNotFound(_) => "CommandNotFound",
            ResolveError::NoMatch(_) => "NoMatch",
            ResolveError::Timeout(_) => "Timeout",
            ResolveError::MalformedOutput(_) => "MalformedOutput",
            ResolveError::Io(_) => "Io",
        }
    }
}

impl serde::Serialize for ResolveError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("ResolveError", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

impl From<std::io::Error> for ResolveError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ResolveError::CommandNotFound(err.to_string()),
            _ => ResolveError::Io(err.to_string()),
        }
    }
}

/// Application-level error for settings and daemon setup.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The settings file could not be parsed.
    #[error("{0}")]
    Config(String),

    /// I/O and OS-level errors (settings file, signal handlers).
    #[error("{0}")]
    Io(String),

    /// Settings parsed but hold an unusable value.
    #[error("{0}")]
    InvalidInput(String),
}

impl AppError {
    /// Returns the error kind as a string matching the variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::Io(_) => "Io",
            AppError::InvalidInput(_) => "InvalidInput",
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

// ---- From implementations for ergonomic error conversion ----

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
