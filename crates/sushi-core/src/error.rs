//! # Error Types
//!
//! Domain-specific error types for sushi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sushi-core errors (this file)                                         │
//! │  ├── CoreError        - Business conditions (cap, empty order, ...)    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  sushi-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  sushi-engine errors                                                   │
//! │  └── EngineError      - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                          DbError ───┴─► EngineError → UI message       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant that concerns a seating carries its table id so the caller
//! can tell the guest which table and which constraint was hit.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business conditions raised by the order lifecycle.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The seating already holds the maximum number of distinct dishes.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: 5 different dishes
    ///      │
    ///      ▼
    /// add_item(new dish)
    ///      │
    ///      ▼
    /// CapacityExceeded { table_id: "4", cap: 5 }
    ///      │
    ///      ▼
    /// UI: "You have ordered 5 dishes ... confirm them first"
    /// ```
    #[error(
        "Table {table_id} already has {cap} different dishes in the cart; \
         confirm the current order before adding a new dish"
    )]
    CapacityExceeded { table_id: String, cap: usize },

    /// Confirm was requested for an empty cart.
    #[error("Table {table_id} has no items to confirm")]
    EmptyOrder { table_id: String },

    /// Settlement was requested before anything was served.
    #[error("Table {table_id} has no served items; nothing to settle")]
    NoServedItems { table_id: String },

    /// Kitchen ticket does not exist (already done, cancelled or never queued).
    #[error("Kitchen ticket not found: {0}")]
    TicketNotFound(i64),

    /// Sale record does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the table this error concerns, when there is one.
    pub fn table_id(&self) -> Option<&str> {
        match self {
            CoreError::CapacityExceeded { table_id, .. }
            | CoreError::EmptyOrder { table_id }
            | CoreError::NoServedItems { table_id } => Some(table_id),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
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

    /// Invalid format.
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
    fn test_capacity_message_names_cap_and_table() {
        let err = CoreError::CapacityExceeded {
            table_id: "7".to_string(),
            cap: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("Table 7"));
        assert!(msg.contains("5 different dishes"));
        assert_eq!(err.table_id(), Some("7"));
    }

    #[test]
    fn test_error_messages() {
        let err = CoreError::NoServedItems {
            table_id: "2".to_string(),
        };
        assert_eq!(err.to_string(), "Table 2 has no served items; nothing to settle");

        let err = CoreError::TicketNotFound(42);
        assert_eq!(err.to_string(), "Kitchen ticket not found: 42");
        assert_eq!(err.table_id(), None);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "table_id".to_string(),
        };
        assert_eq!(validation_err.to_string(), "table_id is required");
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
