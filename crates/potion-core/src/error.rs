//! # Error Types
//!
//! Domain-specific error types for potion-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  potion-core errors (this file)                                        │
//! │  ├── CoreError        - Domain errors (stock, gold, ml, carts)         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  potion-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError::InvalidInput → DbError → caller    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, color, amounts)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::types::Color;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input rejected at the boundary, before any planning or delivery.
    ///
    /// ## When This Occurs
    /// - Barrel proportions don't sum to 1.0 (within 1e-6)
    /// - Potion mix proportions don't sum to 100
    /// - Quantity, price or ml amount out of bounds
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Not enough gold to pay for a barrel delivery.
    #[error("Insufficient gold: required {required}, available {available}")]
    InsufficientGold { required: i64, available: i64 },

    /// Not enough ml of a color to bottle the delivered potions.
    ///
    /// ## User Workflow
    /// ```text
    /// Bottle delivery: 3 × [100,0,0,0]
    ///      │
    ///      ▼
    /// Needs 300 red ml, inventory has 250
    ///      │
    ///      ▼
    /// InsufficientMl { color: Red, required: 300, available: 250 }
    /// ```
    #[error("Insufficient {color} ml: required {required}, available {available}")]
    InsufficientMl {
        color: Color,
        required: i64,
        available: i64,
    },

    /// Insufficient potion stock to complete a checkout.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// SKU is not present in potion inventory.
    #[error("Unknown SKU: {0}")]
    UnknownSku(String),

    /// Cart cannot be found.
    #[error("Cart not found: {0}")]
    CartNotFound(i64),

    /// Cart has already been checked out.
    #[error("Cart {0} has already been checked out")]
    CartClosed(i64),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet the shop's requirements.
/// They are raised before any business logic runs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., SKU with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Color proportions don't add up to the expected total.
    #[error("{field} must sum to {expected}, got {actual}")]
    InvalidProportions {
        field: String,
        expected: String,
        actual: String,
    },
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
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "RED_POTION_0".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for RED_POTION_0: available 3, requested 5"
        );

        let err = CoreError::InsufficientMl {
            color: Color::Green,
            required: 300,
            available: 250,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient green ml: required 300, available 250"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::InvalidProportions {
            field: "potion_type".to_string(),
            expected: "100".to_string(),
            actual: "90".to_string(),
        };
        assert_eq!(err.to_string(), "potion_type must sum to 100, got 90");
    }

    #[test]
    fn test_validation_converts_to_invalid_input() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::InvalidInput(_)));
    }
}
