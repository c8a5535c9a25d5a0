//! # healthpost-core: Billing Ledger for the HealthPost Front Desk
//!
//! This crate holds the billing rules: the medicine catalog, the draft bill,
//! committing a draft into an immutable bill, and the persisted history.
//! Storage is reached only through the [`store::KeyValueStore`] trait.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     HealthPost Billing Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                healthpost-kiosk (JSON-lines bridge)             │   │
//! │  │    search_catalog, add_line, commit_bill, search_bills, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ healthpost-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  ledger   │  │  history  │  │ validation│  │   │
//! │  │   │  Catalog  │  │  Ledger   │  │ BillRecord│  │   rules   │  │   │
//! │  │   │  search   │  │  commit   │  │  decode   │  │  checks   │  │   │
//! │  │   └───────────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  │                        │ KeyValueStore                          │   │
//! │  └────────────────────────┼────────────────────────────────────────┘   │
//! │                           │                                             │
//! │  ┌────────────────────────▼────────────────────────────────────────┐   │
//! │  │              healthpost-db (SQLite slot store)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogItem, LineItem, Bill, ...)
//! - [`money`] - Money type with integer cents
//! - [`catalog`] - Medicine catalog lookup, search and inventory edits
//! - [`ledger`] - Draft bill, commit, history and search
//! - [`history`] - History slot format (JSON records)
//! - [`store`] - Persistence port and an in-memory store
//! - [`clock`] - Time source for bill timestamps
//! - [`seed`] - Default medicine list
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use healthpost_core::clock::FixedClock;
//! use healthpost_core::ledger::Ledger;
//! use healthpost_core::seed::default_catalog;
//! use healthpost_core::store::MemoryStore;
//!
//! let catalog = default_catalog();
//! let at = chrono::NaiveDate::from_ymd_opt(2023, 5, 15)
//!     .unwrap()
//!     .and_hms_opt(9, 45, 0)
//!     .unwrap();
//! let mut ledger = Ledger::with_clock(MemoryStore::new(), FixedClock(at));
//!
//! ledger.add_line(&catalog, 1, 2).unwrap(); // 2 × $5.00
//! ledger.add_line(&catalog, 3, 1).unwrap(); // 1 × $6.75
//! assert_eq!(ledger.current_total().cents(), 1675);
//!
//! let bill = ledger.commit("Jane Doe", None).unwrap();
//! assert_eq!(bill.bill_id, "B001");
//! assert!(ledger.draft().is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod clock;
pub mod error;
pub mod history;
pub mod ledger;
pub mod money;
pub mod seed;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use ledger::Ledger;
pub use money::Money;
pub use store::{KeyValueStore, MemoryStore, StoreError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage slot holding the bill history.
pub const HISTORY_KEY: &str = "healthpost-bills";

/// Prefix of every bill id ("B001").
pub const BILL_ID_PREFIX: &str = "B";

/// Stored in place of a missing patient reference.
pub const NO_PATIENT_REF: &str = "N/A";

/// Bill date format, `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Bill time format, 12-hour clock with AM/PM.
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Maximum quantity on a single line.
///
/// ## Business Reason
/// Catches keying slips such as 1000 instead of 10 at the front desk.
pub const MAX_LINE_QUANTITY: i64 = 9999;

/// Maximum unit price of a catalog item ($1,000,000.00).
///
/// ## Business Reason
/// Keeps `price × MAX_LINE_QUANTITY` and bill totals far inside the range
/// of integer cents.
pub const MAX_UNIT_PRICE: Money = Money::from_cents(100_000_000);

/// Maximum length of patient and medicine names, in characters.
pub const MAX_NAME_LEN: usize = 200;
