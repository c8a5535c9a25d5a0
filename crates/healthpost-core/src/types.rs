//! # Domain Types
//!
//! Core domain types used throughout HealthPost billing.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │    LineItem     │   │      Bill       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u32)       │◄──│  catalog_item_id│   │  bill_id "B001" │       │
//! │  │  name           │   │  line_id (UUID) │──►│  lines          │       │
//! │  │  unit_price     │   │  unit_price     │   │  patient_name   │       │
//! │  │  stock_qty      │   │  quantity       │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   BillStatus    │   │   DraftState    │                             │
//! │  │  Paid           │   │  Empty          │                             │
//! │  │  Pending        │   │  Building       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` copies the item name and unit price when it is added. Later
//! catalog edits never change a draft line or a committed bill.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Catalog Item
// =============================================================================

/// A medicine available for billing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogItem {
    /// Unique, stable identifier.
    pub id: u32,

    /// Display name, e.g. "Paracetamol 500mg".
    pub name: String,

    /// Dosage form shown on the inventory screen ("Tablet", "Capsule", ...).
    pub kind: String,

    /// Price per unit.
    pub unit_price: Money,

    /// Units in stock.
    pub stock_qty: i64,
}

/// Fields for a new catalog item. The catalog assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCatalogItem {
    pub name: String,
    pub kind: String,
    pub unit_price: Money,
    pub stock_qty: i64,
}

/// Partial update for a catalog item. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogItemPatch {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub unit_price: Option<Money>,
    pub stock_qty: Option<i64>,
}

// =============================================================================
// Line Item
// =============================================================================

/// Identifier of a line inside a draft bill.
///
/// Fresh lines get a UUID v4. Older history entries may carry other strings
/// (e.g. millisecond timestamps), which are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineId(String);

impl LineId {
    /// Generates a new unique line id.
    pub fn generate() -> Self {
        LineId(Uuid::new_v4().to_string())
    }

    /// Wraps an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        LineId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line on a bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub line_id: LineId,

    /// The catalog item this line was created from.
    pub catalog_item_id: u32,

    /// Item name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    pub unit_price_at_add_time: Money,

    /// Always >= 1.
    pub quantity: i64,
}

impl LineItem {
    /// Unit price × quantity. Computed, never stored.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price_at_add_time.multiply_quantity(self.quantity)
    }

    /// Unit price × quantity, `None` if it overflows.
    #[inline]
    pub fn checked_line_total(&self) -> Option<Money> {
        self.unit_price_at_add_time.checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Bill
// =============================================================================

/// Payment status of a committed bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BillStatus {
    Paid,
    Pending,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Paid => "Paid",
            BillStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed bill.
///
/// Bills are created once by `Ledger::commit` and never change afterwards.
/// The ledger only hands out shared references to its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Bill {
    /// Sequence id, "B" + 3-digit zero-padded ordinal ("B001").
    pub bill_id: String,

    pub patient_name: String,

    /// Optional patient number from the registration desk.
    pub patient_ref: Option<String>,

    /// Commit time, local wall clock, minute precision.
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,

    /// Lines as they were at commit time.
    pub lines: Vec<LineItem>,

    pub status: BillStatus,
}

impl Bill {
    /// Sum of all line totals.
    pub fn total_amount(&self) -> Money {
        self.lines.iter().map(LineItem::line_total).sum()
    }

    /// Commit date as `YYYY-MM-DD`.
    pub fn date_label(&self) -> String {
        self.created_at.format(crate::DATE_FORMAT).to_string()
    }

    /// Commit time as `hh:mm AM`.
    pub fn time_label(&self) -> String {
        self.created_at.format(crate::TIME_FORMAT).to_string()
    }

    /// Case-insensitive match on patient name or bill id.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.patient_name.to_lowercase().contains(needle_lowercase)
            || self.bill_id.to_lowercase().contains(needle_lowercase)
    }
}

/// Formats the bill id for a one-based sequence number.
///
/// ```rust
/// use healthpost_core::types::format_bill_id;
///
/// assert_eq!(format_bill_id(1), "B001");
/// assert_eq!(format_bill_id(1000), "B1000");
/// ```
pub fn format_bill_id(sequence: usize) -> String {
    format!("{}{:03}", crate::BILL_ID_PREFIX, sequence)
}

// =============================================================================
// Draft State
// =============================================================================

/// Where the draft bill is in its lifecycle.
///
/// ```text
/// Empty ──add_line──► Building ──commit──► (Committed) ──► Empty
///   ▲                    │
///   └── remove last line / discard_draft ──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DraftState {
    Empty,
    Building,
}

// =============================================================================
// Billing Summary
// =============================================================================

/// Figures shown above the bill history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillingSummary {
    pub total_bills: usize,
    pub total_revenue: Money,
    pub paid_bills: usize,
    pub pending_bills: usize,
}

impl BillingSummary {
    /// Summarizes a set of bills.
    pub fn from_bills<'a>(bills: impl IntoIterator<Item = &'a Bill>) -> Self {
        let mut summary = BillingSummary {
            total_bills: 0,
            total_revenue: Money::zero(),
            paid_bills: 0,
            pending_bills: 0,
        };

        for bill in bills {
            summary.total_bills += 1;
            summary.total_revenue += bill.total_amount();
            match bill.status {
                BillStatus::Paid => summary.paid_bills += 1,
                BillStatus::Pending => summary.pending_bills += 1,
            }
        }

        summary
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line(catalog_item_id: u32, price_cents: i64, quantity: i64) -> LineItem {
        LineItem {
            line_id: LineId::generate(),
            catalog_item_id,
            name: format!("Item {}", catalog_item_id),
            unit_price_at_add_time: Money::from_cents(price_cents),
            quantity,
        }
    }

    fn bill(id: &str, patient: &str, status: BillStatus, lines: Vec<LineItem>) -> Bill {
        Bill {
            bill_id: id.to_string(),
            patient_name: patient.to_string(),
            patient_ref: None,
            created_at: NaiveDate::from_ymd_opt(2023, 5, 15)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap(),
            lines,
            status,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(1, 500, 2).line_total().cents(), 1000);
        assert_eq!(line(3, 675, 1).line_total().cents(), 675);
    }

    #[test]
    fn test_bill_total_is_sum_of_lines() {
        let b = bill("B001", "Jane Doe", BillStatus::Paid, vec![line(1, 500, 2), line(3, 675, 1)]);
        assert_eq!(b.total_amount().cents(), 1675);
    }

    #[test]
    fn test_bill_labels() {
        let b = bill("B001", "Jane Doe", BillStatus::Paid, vec![]);
        assert_eq!(b.date_label(), "2023-05-15");
        assert_eq!(b.time_label(), "02:30 PM");
    }

    #[test]
    fn test_bill_matches_name_or_id() {
        let b = bill("B007", "Maria Garcia", BillStatus::Paid, vec![]);
        assert!(b.matches("garc"));
        assert!(b.matches("b007"));
        assert!(!b.matches("smith"));
    }

    #[test]
    fn test_format_bill_id() {
        assert_eq!(format_bill_id(1), "B001");
        assert_eq!(format_bill_id(42), "B042");
        assert_eq!(format_bill_id(999), "B999");
    }

    #[test]
    fn test_line_ids_are_unique() {
        assert_ne!(LineId::generate(), LineId::generate());
    }

    #[test]
    fn test_summary() {
        let bills = vec![
            bill("B001", "A", BillStatus::Paid, vec![line(1, 500, 2)]),
            bill("B002", "B", BillStatus::Pending, vec![line(2, 850, 1)]),
            bill("B003", "C", BillStatus::Paid, vec![line(3, 675, 3)]),
        ];

        let summary = BillingSummary::from_bills(&bills);
        assert_eq!(summary.total_bills, 3);
        assert_eq!(summary.paid_bills, 2);
        assert_eq!(summary.pending_bills, 1);
        assert_eq!(summary.total_revenue.cents(), 1000 + 850 + 2025);
    }
}
