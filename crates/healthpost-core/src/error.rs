//! # Error Types
//!
//! Domain-specific error types for healthpost-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  healthpost-core errors (this file)                                    │
//! │  ├── CoreError        - Ledger and catalog rule violations             │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── StoreError       - Persistence port failures (store.rs)           │
//! │                                                                         │
//! │  healthpost-db errors (separate crate)                                 │
//! │  └── DbError          - SQLite operation failures                      │
//! │                                                                         │
//! │  Kiosk errors (in app)                                                 │
//! │  └── ApiError         - What the front-end sees (serialized)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Kinds of Ledger Failure
//! Every rejected ledger operation is one of two kinds, reported by
//! [`CoreError::kind`]:
//! - `InvalidInput`: `add_line` with an unknown catalog item or quantity < 1
//! - `Validation`: `commit` with an empty draft or a blank patient name
//!
//! Both are recoverable: the draft is left unchanged and the user retries.

use serde::Serialize;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// A line item could not be added to the draft.
    ///
    /// ## When This Occurs
    /// - Catalog item id does not resolve
    /// - Quantity is zero or negative
    #[error("Invalid input: {0}")]
    InvalidInput(ValidationError),

    /// The draft could not be committed, or catalog input was rejected.
    ///
    /// ## When This Occurs
    /// - Draft has no line items
    /// - Patient name is empty or whitespace
    /// - Inventory edit with a blank name or negative price/stock
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Catalog item does not exist (inventory edits only).
    #[error("Catalog item not found: {0}")]
    CatalogItemNotFound(u32),

    /// Catalog item is still referenced by the draft or by a committed bill.
    #[error("Catalog item {0} is referenced by billing records and cannot be removed")]
    CatalogItemInUse(u32),
}

/// Coarse classification used by callers to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Validation,
    NotFound,
    Conflict,
}

impl CoreError {
    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::CatalogItemNotFound(_) => ErrorKind::NotFound,
            CoreError::CatalogItemInUse(_) => ErrorKind::Conflict,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or blank.
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
    Negative { field: String },

    /// Amount is above its ceiling.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: Money },

    /// A reference does not resolve (e.g. unknown catalog item id).
    #[error("{field} '{value}' does not exist")]
    UnknownReference { field: String, value: String },

    /// A collection that must have entries is empty.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },
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
        let err = CoreError::InvalidInput(ValidationError::UnknownReference {
            field: "catalog item".to_string(),
            value: "42".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Invalid input: catalog item '42' does not exist"
        );

        let err = CoreError::CatalogItemInUse(3);
        assert_eq!(
            err.to_string(),
            "Catalog item 3 is referenced by billing records and cannot be removed"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "patient name".to_string(),
        };
        assert_eq!(err.to_string(), "patient name is required");

        let err = ValidationError::Empty {
            field: "bill items".to_string(),
        };
        assert_eq!(err.to_string(), "bill items must contain at least one entry");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "patient name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_kinds() {
        let invalid = CoreError::InvalidInput(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
        assert_eq!(invalid.kind(), ErrorKind::InvalidInput);
        assert_eq!(CoreError::CatalogItemNotFound(9).kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::CatalogItemInUse(9).kind(), ErrorKind::Conflict);
    }
}
