//! Domain error model.

use thiserror::Error;

/// Result type used across the domain and service layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error taxonomy.
///
/// Business-rule failures (`NotFound`, `InsufficientStock`,
/// `DuplicateRecord`) surface to callers unmodified. Unexpected store or
/// system faults are normalized to `Internal` at the workflow boundary so
/// internal error shapes never leak.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Requested quantity exceeds the units currently in stock.
    #[error("insufficient stock: only {available} left")]
    InsufficientStock { available: i64 },

    /// The (artist, album, format) uniqueness constraint was violated.
    #[error("a record with this artist, album, and format already exists")]
    DuplicateRecord,

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Unexpected store/system fault, carrying the cause's message.
    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn insufficient_stock(available: i64) -> Self {
        Self::InsufficientStock { available }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for business-rule failures that must reach the caller verbatim.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::InsufficientStock { .. } | Self::DuplicateRecord
        )
    }
}
