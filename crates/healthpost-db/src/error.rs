//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (rusqlite::Error)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├──► StoreError (KeyValueStore port) ← Ledger logs and continues │
//! │       │                                                                 │
//! │       └──► ApiError (kiosk) ← Startup failures, DATABASE_ERROR         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use healthpost_core::StoreError;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Row not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Database file could not be opened or created.
    ///
    /// ## When This Occurs
    /// - Parent directory missing or not writable
    /// - File is not a SQLite database
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Another connection holds the lock past the busy timeout.
    #[error("Database is busy: {0}")]
    Busy(String),

    /// Schema setup failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Constraint violation (NOT NULL, PRIMARY KEY, ...).
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Any other SQL failure.
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Convert rusqlite errors to DbError.
///
/// ## Error Mapping
/// ```text
/// QueryReturnedNoRows              → DbError::NotFound
/// SqliteFailure(CannotOpen, ..)    → DbError::ConnectionFailed
/// SqliteFailure(Busy | Locked, ..) → DbError::Busy
/// SqliteFailure(Constraint, ..)    → DbError::Constraint
/// Other                            → DbError::QueryFailed
/// ```
impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
                ErrorCode::CannotOpen | ErrorCode::NotADatabase | ErrorCode::PermissionDenied => {
                    DbError::ConnectionFailed(err.to_string())
                }
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                    DbError::Busy(err.to_string())
                }
                ErrorCode::ConstraintViolation => DbError::Constraint(err.to_string()),
                _ => DbError::QueryFailed(err.to_string()),
            },

            _ => DbError::QueryFailed(err.to_string()),
        }
    }
}

/// Busy and unopenable databases are reported as unavailable; everything
/// else as a failed operation.
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) | DbError::Busy(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Failed(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
