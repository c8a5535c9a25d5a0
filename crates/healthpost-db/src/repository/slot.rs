//! # Slot Repository
//!
//! Named text slots in the `kv_slots` table.
//!
//! ```text
//! kv_slots
//! ┌────────────────────┬──────────────────────────┬─────────────────────┐
//! │ key (PK)           │ value                    │ updated_at          │
//! ├────────────────────┼──────────────────────────┼─────────────────────┤
//! │ healthpost-bills   │ [{"id":"B001",...}, ...] │ 2023-05-15 09:45:00 │
//! └────────────────────┴──────────────────────────┴─────────────────────┘
//! ```
//!
//! Writes are upserts: a slot holds exactly one value.

use chrono::Local;
use healthpost_core::{KeyValueStore, StoreError};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::database::Database;
use crate::error::DbResult;

/// Slot operations over a borrowed connection.
pub struct SlotRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SlotRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        SlotRepository { conn }
    }

    /// Reads a slot value.
    pub fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Writes a slot value, replacing any previous one.
    pub fn put(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Local::now().naive_local().format("%Y-%m-%d %H:%M:%S").to_string();

        self.conn.execute(
            r#"
            INSERT INTO kv_slots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, now],
        )?;

        debug!(key, bytes = value.len(), "Slot written");
        Ok(())
    }
}

// =============================================================================
// KeyValueStore
// =============================================================================

impl KeyValueStore for Database {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots().get(key)?)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(self.slots().put(key, value)?)
    }
}
