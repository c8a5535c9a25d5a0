//! # Ledger
//!
//! The billing ledger: one draft bill being built at the desk, plus the
//! history of committed bills.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Ledger Operations                               │
//! │                                                                         │
//! │  Desk Action              Ledger Call             State Change          │
//! │  ───────────              ───────────             ────────────          │
//! │                                                                         │
//! │  Pick medicine ─────────► add_line() ───────────► draft.push(line)      │
//! │                                                                         │
//! │  Click remove ──────────► remove_line() ────────► draft.retain(..)      │
//! │                                                                         │
//! │  Generate bill ─────────► commit() ─────────────► history.push(bill)    │
//! │                                                   draft.clear()         │
//! │                                                   store.write(history)  │
//! │                                                                         │
//! │  Search history ────────► find_history() ───────► (read only)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every draft line has quantity >= 1 and a price frozen at add time
//! - `current_total()` always equals the sum of draft line totals
//! - Committed bills are never modified; history only grows
//! - Bill ids are `B` + the 1-based history position, zero-padded to 3 digits
//!
//! ## Persistence
//! History is loaded once when the ledger is built and rewritten in full
//! after every commit. A failed write is logged and the commit still
//! succeeds; the bill stays in memory for the session.

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::clock::{truncate_to_minute, Clock, SystemClock};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::history::{decode_history, encode_history};
use crate::money::Money;
use crate::store::KeyValueStore;
use crate::types::{format_bill_id, Bill, BillStatus, BillingSummary, DraftState, LineId, LineItem};
use crate::validation::{normalize_patient_ref, normalize_query, validate_patient_name, validate_quantity};
use crate::HISTORY_KEY;

/// Draft bill plus committed history, backed by a key-value store.
#[derive(Debug)]
pub struct Ledger<S, C = SystemClock> {
    store: S,
    clock: C,
    history_key: String,
    draft: Vec<LineItem>,
    history: Vec<Bill>,
}

impl<S: KeyValueStore> Ledger<S, SystemClock> {
    /// Opens a ledger on `store` using the local system clock.
    pub fn new(store: S) -> Self {
        Ledger::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> Ledger<S, C> {
    /// Opens a ledger with an explicit clock.
    pub fn with_clock(store: S, clock: C) -> Self {
        Ledger::open(store, clock, HISTORY_KEY)
    }

    /// Opens a ledger reading history from `history_key`.
    ///
    /// A missing, unreadable or malformed slot yields an empty history.
    pub fn open(store: S, clock: C, history_key: impl Into<String>) -> Self {
        let history_key = history_key.into();
        let history = load_history(&store, &history_key);

        info!(key = %history_key, bills = history.len(), "Ledger opened");

        Ledger {
            store,
            clock,
            history_key,
            draft: Vec::new(),
            history,
        }
    }

    // =========================================================================
    // Draft
    // =========================================================================

    /// Adds a line for `catalog_item_id` to the draft.
    ///
    /// The catalog name and price are copied onto the line; later catalog
    /// edits do not reach it. Adding the same item twice gives two lines.
    ///
    /// ## Errors
    /// `CoreError::InvalidInput` when the quantity is below 1 (or above
    /// `MAX_LINE_QUANTITY`), the id is not in the catalog, or the line would
    /// push the total past what integer cents can hold. The draft is
    /// unchanged.
    pub fn add_line(
        &mut self,
        catalog: &Catalog,
        catalog_item_id: u32,
        quantity: i64,
    ) -> CoreResult<LineItem> {
        validate_quantity(quantity).map_err(CoreError::InvalidInput)?;

        let item = catalog.find_by_id(catalog_item_id).ok_or_else(|| {
            CoreError::InvalidInput(ValidationError::UnknownReference {
                field: "catalog item".to_string(),
                value: catalog_item_id.to_string(),
            })
        })?;

        let line = LineItem {
            line_id: LineId::generate(),
            catalog_item_id: item.id,
            name: item.name.clone(),
            unit_price_at_add_time: item.unit_price,
            quantity,
        };

        // Catalogs built with `from_items` skip price validation.
        line.checked_line_total()
            .and_then(|total| self.current_total().checked_add(total))
            .ok_or_else(|| {
                CoreError::InvalidInput(ValidationError::TooLarge {
                    field: "bill total".to_string(),
                    max: Money::from_cents(i64::MAX),
                })
            })?;

        debug!(
            line_id = %line.line_id,
            catalog_item_id,
            quantity,
            line_total = %line.line_total(),
            "Line added to draft"
        );

        self.draft.push(line.clone());
        Ok(line)
    }

    /// Removes a draft line. Unknown ids are a no-op and return `None`.
    pub fn remove_line(&mut self, line_id: &LineId) -> Option<LineItem> {
        let index = self.draft.iter().position(|line| &line.line_id == line_id)?;
        let removed = self.draft.remove(index);
        debug!(line_id = %removed.line_id, "Line removed from draft");
        Some(removed)
    }

    /// Drops every draft line and returns how many there were.
    pub fn discard_draft(&mut self) -> usize {
        let count = self.draft.len();
        self.draft.clear();
        if count > 0 {
            debug!(lines = count, "Draft discarded");
        }
        count
    }

    /// Sum of draft line totals.
    pub fn current_total(&self) -> Money {
        self.draft.iter().map(LineItem::line_total).sum()
    }

    /// Draft lines in insertion order.
    pub fn draft(&self) -> &[LineItem] {
        &self.draft
    }

    pub fn draft_state(&self) -> DraftState {
        if self.draft.is_empty() {
            DraftState::Empty
        } else {
            DraftState::Building
        }
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Turns the draft into a paid bill and appends it to history.
    ///
    /// ```text
    /// draft empty?          → Validation(Empty "bill items")
    /// patient name blank?   → Validation(Required "patient name")
    /// OK → bill B{n:03}, history.push, draft cleared, history persisted
    /// ```
    ///
    /// On error nothing changes.
    pub fn commit(&mut self, patient_name: &str, patient_ref: Option<&str>) -> CoreResult<Bill> {
        if self.draft.is_empty() {
            return Err(ValidationError::Empty {
                field: "bill items".to_string(),
            }
            .into());
        }

        let patient_name = validate_patient_name(patient_name)?;

        let bill = Bill {
            bill_id: format_bill_id(self.history.len() + 1),
            patient_name,
            patient_ref: normalize_patient_ref(patient_ref),
            created_at: truncate_to_minute(self.clock.now()),
            lines: std::mem::take(&mut self.draft),
            status: BillStatus::Paid,
        };

        info!(
            bill_id = %bill.bill_id,
            lines = bill.lines.len(),
            total = %bill.total_amount(),
            "Bill committed"
        );

        self.history.push(bill.clone());
        self.persist();

        Ok(bill)
    }

    fn persist(&mut self) {
        let blob = match encode_history(&self.history) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to encode bill history");
                return;
            }
        };

        match self.store.write(&self.history_key, &blob) {
            Ok(()) => debug!(key = %self.history_key, bills = self.history.len(), "History saved"),
            Err(e) => warn!(key = %self.history_key, error = %e, "Failed to save bill history"),
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Committed bills, oldest first.
    pub fn history(&self) -> &[Bill] {
        &self.history
    }

    /// Bills whose patient name or bill id contains `query`, ignoring case.
    ///
    /// An empty query returns the whole history.
    pub fn find_history(&self, query: &str) -> Vec<&Bill> {
        let needle = normalize_query(query);
        self.history
            .iter()
            .filter(|bill| needle.is_empty() || bill.matches(&needle))
            .collect()
    }

    /// Looks a bill up by its exact id.
    pub fn find_bill(&self, bill_id: &str) -> Option<&Bill> {
        let bill_id = bill_id.trim();
        self.history.iter().find(|bill| bill.bill_id == bill_id)
    }

    /// Totals over the whole history.
    pub fn summary(&self) -> BillingSummary {
        BillingSummary::from_bills(&self.history)
    }

    /// True if the draft or any committed bill has a line for the item.
    pub fn references_catalog_item(&self, catalog_item_id: u32) -> bool {
        self.draft
            .iter()
            .chain(self.history.iter().flat_map(|bill| bill.lines.iter()))
            .any(|line| line.catalog_item_id == catalog_item_id)
    }

    // =========================================================================
    // Store Access
    // =========================================================================

    pub fn history_key(&self) -> &str {
        &self.history_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the ledger and hands back its store.
    pub fn into_store(self) -> S {
        self.store
    }
}

fn load_history<S: KeyValueStore>(store: &S, key: &str) -> Vec<Bill> {
    match store.read(key) {
        Ok(Some(blob)) => decode_history(&blob),
        Ok(None) => {
            debug!(key, "No saved history");
            Vec::new()
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to read bill history, starting empty");
            Vec::new()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
