//! # Engine Error Type
//!
//! The one error type callers of [`OrderEngine`](crate::OrderEngine) see.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Sushi POS                              │
//! │                                                                         │
//! │  Presentation layer              sushi-engine                           │
//! │  ──────────────────              ────────────                           │
//! │                                                                         │
//! │  engine.add_item("4", ...)                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │  OrderEngine method → EngineResult<T>                            │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Bad input?      ─── ValidationError ──────┐                     │   │
//! │  │  Rule broken?    ─── CoreError ────────────┼──► EngineError      │   │
//! │  │  Store failed?   ─── DbError ──────────────┘        │            │   │
//! │  │                                                     ▼            │   │
//! │  │                                     ErrorResponse { code, ... }  │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  {                                                                      │
//! │    "code": "CAPACITY_EXCEEDED",                                         │
//! │    "message": "Table 4 already has 5 different dishes ...",             │
//! │    "tableId": "4"                                                       │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures never reach the guest verbatim. They are logged with
//! `tracing::error!` and replaced by a generic message.

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use sushi_core::{CoreError, ValidationError};
use sushi_db::DbError;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Everything an engine operation can fail with.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A business rule or input check failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store failed. Not retried.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(CoreError::Validation(err))
    }
}

impl EngineError {
    /// Machine-readable classification.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::Core(CoreError::CapacityExceeded { .. }) => ErrorCode::CapacityExceeded,
            EngineError::Core(CoreError::EmptyOrder { .. }) => ErrorCode::EmptyOrder,
            EngineError::Core(CoreError::NoServedItems { .. }) => ErrorCode::NoServedItems,
            EngineError::Core(CoreError::TicketNotFound(_))
            | EngineError::Core(CoreError::SaleNotFound(_)) => ErrorCode::NotFound,
            EngineError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            EngineError::Storage(DbError::NotFound { .. }) => ErrorCode::NotFound,
            EngineError::Storage(_) => ErrorCode::StorageFailure,
        }
    }

    /// The seating the failure concerns, if any.
    pub fn table_id(&self) -> Option<&str> {
        match self {
            EngineError::Core(err) => err.table_id(),
            EngineError::Storage(_) => None,
        }
    }

    /// True for conditions the guest can fix (remove a dish, confirm first).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.code(), ErrorCode::StorageFailure)
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Error codes for responses.
///
/// ## Usage in the Presentation Layer
/// ```typescript
/// switch (e.code) {
///   case 'CAPACITY_EXCEEDED':
///     alert(e.message);            // "confirm the current order first"
///     break;
///   case 'EMPTY_ORDER':
///   case 'NO_SERVED_ITEMS':
///     break;                       // nothing to do
///   default:
///     showError('An error occurred');
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Distinct-dish cap reached
    CapacityExceeded,

    /// Confirm on an empty cart
    EmptyOrder,

    /// Settle with nothing served
    NoServedItems,

    /// Ticket or sale does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Store I/O failed
    StorageFailure,
}

// =============================================================================
// Error Response
// =============================================================================

/// What the presentation layer receives when an operation fails.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message for display
    pub message: String,

    /// The seating concerned, when there is one
    pub table_id: Option<String>,
}

impl From<&EngineError> for ErrorResponse {
    fn from(err: &EngineError) -> Self {
        let message = match err {
            EngineError::Core(core) => core.to_string(),
            EngineError::Storage(db) => storage_message(db),
        };

        ErrorResponse {
            code: err.code(),
            message,
            table_id: err.table_id().map(str::to_string),
        }
    }
}

impl From<EngineError> for ErrorResponse {
    fn from(err: EngineError) -> Self {
        ErrorResponse::from(&err)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

/// Logs the real storage error and returns what the guest may see.
fn storage_message(err: &DbError) -> String {
    match err {
        DbError::NotFound { entity, id } => format!("{} not found: {}", entity, id),
        DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
            tracing::error!(error = %err, "Store unavailable");
            "The order system is temporarily unavailable".to_string()
        }
        DbError::MigrationFailed(e) => {
            tracing::error!("Database migration failed: {}", e);
            "The order system is temporarily unavailable".to_string()
        }
        DbError::TransactionFailed(e) => {
            tracing::error!("Transaction failed: {}", e);
            "The operation could not be completed; nothing was changed".to_string()
        }
        _ => {
            tracing::error!(error = %err, "Database operation failed");
            "Database operation failed".to_string()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
