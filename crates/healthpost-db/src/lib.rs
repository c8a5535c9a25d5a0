//! # healthpost-db: SQLite Storage for HealthPost Billing
//!
//! This crate gives the ledger a durable [`KeyValueStore`](healthpost_core::KeyValueStore):
//! a SQLite file with one table of named text slots.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      HealthPost Data Flow                               │
//! │                                                                         │
//! │  Ledger::commit → store.write("healthpost-bills", json)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  healthpost-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │ (database.rs) │◄───│   (slot.rs)   │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/healthpost/healthpost.db                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use healthpost_core::Ledger;
//! use healthpost_db::Database;
//!
//! let db = Database::in_memory().unwrap();
//! let ledger = Ledger::new(db);
//! assert!(ledger.history().is_empty());
//! ```

pub mod database;
pub mod error;
pub mod migrations;
pub mod repository;

pub use database::{Database, DbConfig};
pub use error::{DbError, DbResult};
pub use repository::slot::SlotRepository;
