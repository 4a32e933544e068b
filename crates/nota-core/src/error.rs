//! # Error Types
//!
//! Domain-specific error types for nota-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nota-core errors (this file)                                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── DocumentError    - Document rendering failures                    │
//! │                                                                         │
//! │  nota-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures, NotFound,         │
//! │                         Conflict (duplicate transaction_id)            │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → RPC layer → client reason string    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, type)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long for its column.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive (quantity).
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater (unit price, discount).
    #[error("{field} must be non-negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Document Error
// =============================================================================

/// Document rendering errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The requested document type is not one of the seven supported kinds.
    #[error("Unsupported document type: {0}")]
    UnsupportedType(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "school_name".to_string(),
        };
        assert_eq!(err.to_string(), "school_name is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_document_error_message() {
        let err = DocumentError::UnsupportedType("delivery-manifest".to_string());
        assert_eq!(err.to_string(), "Unsupported document type: delivery-manifest");
    }
}
