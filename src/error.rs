//! Error types for view and schema operations.

use thiserror::Error;

/// Result type alias for loupe operations.
pub type LoupeResult<T> = Result<T, LoupeError>;

/// Errors that can occur during view, schema, and sequence operations.
///
/// All variants are programmer-usage faults raised synchronously at the call
/// site, before any state change becomes observable. Write arity and direct
/// snapshot mutation are unrepresentable in this API (reads and writes are
/// separate methods, and values are immutable by construction), so no error
/// variants exist for them.
#[derive(Debug, Error)]
pub enum LoupeError {
    /// A second tracking scope was started while one is active.
    #[error("tracking scope already active")]
    ReentrantTracking,

    /// An operation was applied to a value of the wrong kind.
    #[error("kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        /// The kind the operation requires.
        expected: &'static str,
        /// The kind actually found.
        found: &'static str,
    },

    /// A key was invoked that does not resolve to a callable method.
    #[error("not a method: {key}")]
    NotAMethod {
        /// The key that was invoked.
        key: String,
    },

    /// A behavior schema was attached to a record that already has one.
    #[error("schema already attached")]
    SchemaAlreadyAttached,
}

impl LoupeError {
    /// Create a kind mismatch error.
    #[inline]
    pub fn kind_mismatch(expected: &'static str, found: &'static str) -> Self {
        LoupeError::KindMismatch { expected, found }
    }

    /// Create a not-a-method error.
    #[inline]
    pub fn not_a_method(key: impl Into<String>) -> Self {
        LoupeError::NotAMethod { key: key.into() }
    }
}
