//! # API Error Type
//!
//! Unified error type for bridge commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in HealthPost                             │
//! │                                                                         │
//! │  Front-end                   Rust Backend                               │
//! │  ─────────                   ────────────                               │
//! │                                                                         │
//! │  {"cmd":"add_line",...}                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad JSON / unknown cmd? ─── serde_json::Error ───┐              │  │
//! │  │         │                                         │              │  │
//! │  │         ▼                                         ▼              │  │
//! │  │  Ledger rejected it? ─── CoreError::InvalidInput ── ApiError ──► │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  {"id":7,"ok":false,"error":{"code":"INVALID_INPUT","message":"..."}}   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use healthpost_core::CoreError;
use healthpost_db::DbError;
use serde::Serialize;

/// API error returned from bridge commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Bill not found: B042"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Line could not be added (unknown medicine, bad quantity)
    InvalidInput,

    /// Commit or inventory edit rejected
    ValidationError,

    /// Resource not found
    NotFound,

    /// Medicine still referenced by billing records
    Conflict,

    /// Database could not be opened or queried
    DatabaseError,

    /// Request line was not a valid command
    BadRequest,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidInput(_) => ApiError::new(ErrorCode::InvalidInput, message),
            CoreError::Validation(_) => ApiError::new(ErrorCode::ValidationError, message),
            CoreError::CatalogItemNotFound(id) => ApiError::not_found("Medicine", &id.to_string()),
            CoreError::CatalogItemInUse(_) => ApiError::new(ErrorCode::Conflict, message),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::Busy(_) => ApiError::new(ErrorCode::DatabaseError, "Database is busy"),
            DbError::Constraint(e) | DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Malformed request lines.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use healthpost_core::ValidationError;

    #[test]
    fn test_core_error_codes() {
        let err = ApiError::from(CoreError::InvalidInput(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.message, "Invalid input: quantity must be positive");

        let err = ApiError::from(CoreError::Validation(ValidationError::Required {
            field: "patient name".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(ApiError::from(CoreError::CatalogItemNotFound(9)).code, ErrorCode::NotFound);
        assert_eq!(ApiError::from(CoreError::CatalogItemInUse(2)).code, ErrorCode::Conflict);
    }

    #[test]
    fn test_db_error_hides_details() {
        let err = ApiError::from(DbError::QueryFailed("no such table: kv_slots".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::bad_request("unknown command")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "BAD_REQUEST", "message": "unknown command" })
        );
    }
}
