//! # Database Migrations
//!
//! Embedded SQL migrations for the HealthPost store.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  Database::open                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PRAGMA user_version  → number of migrations already applied           │
//! │       │                                                                 │
//! │       ├── 1 kv_slots   ✓ (already applied)                             │
//! │       └── 2 ...        ⬜ (pending)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Run pending migrations in order, one transaction each,                │
//! │  bumping user_version after each                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! Append to [`MIGRATIONS`]. **NEVER** modify an existing entry.

use rusqlite::Connection;
use tracing::info;

use crate::error::{DbError, DbResult};

/// Ordered migrations. Entry `i` brings the schema to version `i + 1`.
pub const MIGRATIONS: &[(&str, &str)] = &[(
    "kv_slots",
    r#"
    CREATE TABLE IF NOT EXISTS kv_slots (
        key         TEXT PRIMARY KEY NOT NULL,
        value       TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );
    "#,
)];

/// Runs all pending migrations.
///
/// Idempotent: safe to run on every open.
pub fn run_migrations(conn: &mut Connection) -> DbResult<()> {
    let applied = schema_version(conn)?;

    if applied > MIGRATIONS.len() {
        return Err(DbError::MigrationFailed(format!(
            "database schema version {} is newer than this build ({})",
            applied,
            MIGRATIONS.len()
        )));
    }

    for (index, (name, sql)) in MIGRATIONS.iter().enumerate().skip(applied) {
        let version = index + 1;
        info!(version, name, "Applying migration");

        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| DbError::MigrationFailed(format!("{name}: {e}")))?;
        tx.pragma_update(None, "user_version", version as i64)?;
        tx.commit()?;
    }

    info!(version = MIGRATIONS.len(), "Schema up to date");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
pub fn migration_status(conn: &Connection) -> DbResult<(usize, usize)> {
    Ok((MIGRATIONS.len(), schema_version(conn)?))
}

fn schema_version(conn: &Connection) -> DbResult<usize> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version.max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_apply_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(migration_status(&conn).unwrap(), (MIGRATIONS.len(), 0));

        run_migrations(&mut conn).unwrap();
        assert_eq!(
            migration_status(&conn).unwrap(),
            (MIGRATIONS.len(), MIGRATIONS.len())
        );

        // Second run is a no-op
        run_migrations(&mut conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert!(tables.contains(&"kv_slots".to_string()));
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", 99i64).unwrap();

        let err = run_migrations(&mut conn).unwrap_err();
        assert!(matches!(err, DbError::MigrationFailed(_)));
    }
}
