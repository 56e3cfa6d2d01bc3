//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (`IntentError`, `TurnError`, `InitializationError`)
//! live next to the code that raises them. This module provides the shared
//! severity classification every one of them reports.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the world may accept a different intent right away
/// - **Validation**: malformed input that should not be retried unchanged
/// - **Internal**: unexpected state inconsistency, a bug to investigate
/// - **Fatal**: the world cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: destination unreachable, target not visible.
    Recoverable,

    /// Examples: cell out of bounds, empty speak message.
    Validation,

    /// Examples: two entities sharing a cell, active agent missing.
    Internal,

    /// Examples: board too small to host the requested layout.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// Provides a uniform interface for classification across error types so the
/// runtime can decide between retrying, forfeiting, or aborting.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(ErrorSeverity::Internal.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }
}
