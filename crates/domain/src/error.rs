//! Unified error types for the domain layer
//!
//! Most editor failure modes degrade to "keep the previous valid state" and
//! never surface here. The errors below cover the operations that a caller
//! asked for explicitly and that could not be carried out.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., empty name)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An entity with the same name (ignoring case) already exists
    #[error("{kind} name already taken: {name}")]
    NameTaken { kind: &'static str, name: String },

    /// Entity not found
    #[error("Entity not found: {kind} at {at}")]
    NotFound { kind: &'static str, at: String },

    /// A parsed document did not have the expected shape
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// Parse error (for enum-like values)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for rejected input.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a name-taken error
    pub fn name_taken(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NameTaken {
            kind,
            name: name.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(kind: &'static str, at: impl ToString) -> Self {
        Self::NotFound {
            kind,
            at: at.to_string(),
        }
    }

    /// Create a malformed document error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for ComponentKind {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "trigger" => Ok(Self::Trigger),
    ///             _ => Err(DomainError::parse(format!("Unknown component type: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Check if this is a NameTaken error.
    pub fn is_name_taken(&self) -> bool {
        matches!(self, Self::NameTaken { .. })
    }
}
