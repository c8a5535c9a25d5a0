//! # State Module
//!
//! Everything the bridge commands operate on.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────────────┐  ┌──────────────────┐  │
//! │  │   Catalog    │  │         Ledger           │  │   KioskConfig    │  │
//! │  │              │  │                          │  │                  │  │
//! │  │  medicines   │  │  draft lines             │  │  facility_name   │  │
//! │  │  (seeded)    │  │  history ◄─► store slot  │  │  currency        │  │
//! │  └──────────────┘  └──────────────────────────┘  └──────────────────┘  │
//! │                                                                         │
//! │  The bridge handles one request at a time, so commands take            │
//! │  `&mut AppState` directly; no locking.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::KioskConfig;

use healthpost_core::clock::{Clock, SystemClock};
use healthpost_core::seed::default_catalog;
use healthpost_core::{Catalog, KeyValueStore, Ledger, MemoryStore};

/// Ledger over whichever store and clock the kiosk was started with.
pub type KioskLedger = Ledger<Box<dyn KeyValueStore>, Box<dyn Clock>>;

/// Kiosk session state.
pub struct AppState {
    pub config: KioskConfig,
    pub catalog: Catalog,
    pub ledger: KioskLedger,
}

impl AppState {
    /// Builds the state, loading bill history from `store`.
    pub fn new(
        config: KioskConfig,
        catalog: Catalog,
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let ledger = Ledger::open(store, clock, config.history_key.clone());
        AppState {
            config,
            catalog,
            ledger,
        }
    }

    /// Seed catalog, in-memory history, system clock.
    pub fn in_memory(config: KioskConfig) -> Self {
        AppState::new(
            config,
            default_catalog(),
            Box::new(MemoryStore::new()),
            Box::new(SystemClock),
        )
    }

    /// Formats an amount with the configured currency.
    pub fn format_money(&self, amount: healthpost_core::Money) -> String {
        self.config.format_currency(amount.cents())
    }
}
