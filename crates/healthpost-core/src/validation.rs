//! # Validation Module
//!
//! Input validation for billing and inventory operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end form                                               │
//! │  ├── Quantity stepper starts at 1                                      │
//! │  └── Required markers on patient name                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Kiosk bridge (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Persistence boundary (history.rs)                            │
//! │  └── Stored records re-validated on load                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_LINE_QUANTITY, MAX_NAME_LEN, MAX_UNIT_PRICE, NO_PATIENT_REF};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a patient name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty or whitespace-only
/// - At most 200 characters
///
/// ```rust
/// use healthpost_core::validation::validate_patient_name;
///
/// assert_eq!(validate_patient_name("  Jane Doe ").unwrap(), "Jane Doe");
/// assert!(validate_patient_name("   ").is_err());
/// ```
pub fn validate_patient_name(name: &str) -> ValidationResult<String> {
    required_text("patient name", name)
}

/// Normalizes an optional patient reference.
///
/// Blank input and the `N/A` placeholder (any case) mean "no reference",
/// the same reading the history slot gives them on load.
///
/// ```rust
/// use healthpost_core::validation::normalize_patient_ref;
///
/// assert_eq!(normalize_patient_ref(Some(" P-102 ")).as_deref(), Some("P-102"));
/// assert_eq!(normalize_patient_ref(Some("n/a")), None);
/// ```
pub fn normalize_patient_ref(patient_ref: Option<&str>) -> Option<String> {
    patient_ref
        .map(str::trim)
        .filter(|r| !r.is_empty() && !r.eq_ignore_ascii_case(NO_PATIENT_REF))
        .map(str::to_string)
}

/// Validates a catalog item name and returns it trimmed.
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    required_text("name", name)
}

fn required_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (>= 1)
/// - Must not exceed MAX_LINE_QUANTITY
///
/// ## User Workflow
/// ```text
/// Quantity stepper: 2
///      │
///      ▼
/// validate_quantity(2) ← THIS FUNCTION
///      │
///      ├── qty <= 0?     → "quantity must be positive"
///      ├── qty too big?  → "quantity must be between 1 and 9999"
///      └── OK → Ledger::add_line continues
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free dispensing).
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_UNIT_PRICE
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if price > MAX_UNIT_PRICE {
        return Err(ValidationError::TooLarge {
            field: "price".to_string(),
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

/// Validates a stock count.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Search
// =============================================================================

/// Normalizes a search query for case-insensitive substring matching.
///
/// An empty result means "match everything".
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

// =============================================================================
// Unit Tests
// =============================================================================
