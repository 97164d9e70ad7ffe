//! Error types for sketch operations

use std::fmt;

/// Errors that can occur while constructing or operating a sketch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// An argument to a constructor or method was out of its valid range
    InvalidArgument {
        /// Parameter name
        param: String,
        /// Invalid value provided
        value: String,
        /// Constraint that was violated
        constraint: String,
    },

    /// The requested table dimensions or counter width can't represent the
    /// requested error guarantees (e.g. a counter width too narrow to hold
    /// the table's own maximum possible count)
    SizingError {
        /// Description of why the requested sizing is infeasible
        reason: String,
    },

    /// A counter would wrap past its representable range
    Overflow {
        /// Context describing which counter/operation overflowed
        context: String,
    },
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::InvalidArgument {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "invalid argument '{}': value '{}' {}",
                    param, value, constraint
                )
            }
            SketchError::SizingError { reason } => write!(f, "sizing error: {}", reason),
            SketchError::Overflow { context } => write!(f, "counter overflow: {}", context),
        }
    }
}

impl std::error::Error for SketchError {}

/// Result type alias for sketch operations
pub type Result<T> = std::result::Result<T, SketchError>;
