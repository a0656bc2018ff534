//! Unified error types for the Base3 adapter.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A service was requested under an identifier with no binding.
    UnknownService,
    /// An alias chain was too deep or ended at an unbound identifier.
    UnresolvableAlias,
    /// A shared factory resolved its own identifier while constructing.
    CircularDependency,
    /// A resolved service was not of the requested type.
    TypeMismatch,
    /// Discovery found no implementation where one was expected.
    MissingCapability,
    /// A hook listener failed while handling an event.
    ListenerFailure,
    /// The bootstrap was invoked more than once in this process.
    DuplicateBootstrap,
    /// The bootstrap sequencer was asked for an illegal transition.
    InvalidState,
    /// A sub-plugin failed during initialization.
    Plugin,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An I/O error occurred.
    Io,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownService => write!(f, "UNKNOWN_SERVICE"),
            Self::UnresolvableAlias => write!(f, "UNRESOLVABLE_ALIAS"),
            Self::CircularDependency => write!(f, "CIRCULAR_DEPENDENCY"),
            Self::TypeMismatch => write!(f, "TYPE_MISMATCH"),
            Self::MissingCapability => write!(f, "MISSING_CAPABILITY"),
            Self::ListenerFailure => write!(f, "LISTENER_FAILURE"),
            Self::DuplicateBootstrap => write!(f, "DUPLICATE_BOOTSTRAP"),
            Self::InvalidState => write!(f, "INVALID_STATE"),
            Self::Plugin => write!(f, "PLUGIN"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Io => write!(f, "IO"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified error used throughout the adapter.
///
/// Crate-specific failures are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unknown-service error for the given identifier.
    pub fn unknown_service(id: &str) -> Self {
        Self::new(
            ErrorKind::UnknownService,
            format!("No service bound under '{id}'"),
        )
    }

    /// Create an unresolvable-alias error.
    pub fn unresolvable_alias(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvableAlias, message)
    }

    /// Create a circular-dependency error for the given identifier.
    pub fn circular_dependency(id: &str) -> Self {
        Self::new(
            ErrorKind::CircularDependency,
            format!("Shared service '{id}' was requested while it was being constructed"),
        )
    }

    /// Create a type-mismatch error.
    pub fn type_mismatch(id: &str, expected: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("Service '{id}' is not of type '{expected}'"),
        )
    }

    /// Create a missing-capability error.
    pub fn missing_capability(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingCapability, message)
    }

    /// Create a listener-failure error.
    pub fn listener_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ListenerFailure, message)
    }

    /// Create a duplicate-bootstrap error.
    pub fn duplicate_bootstrap(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateBootstrap, message)
    }

    /// Create an invalid-state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState, message)
    }

    /// Create a plugin error.
    pub fn plugin(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Plugin, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns the headline shown to users when this error is rendered inline.
    pub fn headline(&self) -> &'static str {
        match self.kind {
            ErrorKind::UnknownService | ErrorKind::UnresolvableAlias => "Service not available",
            ErrorKind::CircularDependency | ErrorKind::TypeMismatch => "Service misconfigured",
            ErrorKind::MissingCapability => "Not found",
            ErrorKind::ListenerFailure | ErrorKind::Plugin => "Plugin error",
            ErrorKind::DuplicateBootstrap | ErrorKind::InvalidState => "Bootstrap error",
            ErrorKind::Configuration => "Configuration error",
            ErrorKind::Serialization | ErrorKind::Io | ErrorKind::Internal => "Internal error",
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Io, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::unknown_service("IRequest");
        assert_eq!(
            err.to_string(),
            "UNKNOWN_SERVICE: No service bound under 'IRequest'"
        );
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::from(io);
        assert!(std::error::Error::source(&err).is_some());

        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Io);
        assert!(std::error::Error::source(&cloned).is_none());
    }

    #[test]
    fn test_headline_for_missing_capability() {
        let err = AppError::missing_capability("no display 'x'");
        assert_eq!(err.headline(), "Not found");
    }
}
