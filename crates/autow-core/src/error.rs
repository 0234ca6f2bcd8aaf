//! # Error Types
//!
//! Domain-specific error types for autow-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  autow-core errors (this file)                                      │
//! │  ├── CoreError        - Domain-level failures                       │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  autow-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → API layer            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, limit, reason)
//! 3. Errors are enum variants, never String
//! 4. Validation failures are reported before any persistence happens
//!
//! Not-found conditions are a persistence concern and live in
//! `autow-db`'s `DbError`; this crate's surface is validation.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent domain rule violations. They should be caught
/// and translated to user-facing messages by the consuming layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid UUID, non-finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "vehicle".to_string(),
        };
        assert_eq!(err.to_string(), "vehicle is required");

        let err = ValidationError::MustBeNonNegative {
            field: "miles".to_string(),
        };
        assert_eq!(err.to_string(), "miles must not be negative");

        let err = ValidationError::TooLong {
            field: "purpose".to_string(),
            max: 200,
        };
        assert_eq!(err.to_string(), "purpose must be at most 200 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "destination".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Validation error: destination is required");
    }
}
