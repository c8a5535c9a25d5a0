//! # Database Connection
//!
//! Opening and configuring the SQLite file.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection                                │
//! │                                                                         │
//! │  Kiosk Startup                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure busy timeout, migrations              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::open(config) ← Open file + pragmas + migrations             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ledger::new(db) ← Database implements KeyValueStore                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode so a second process (a reporting tool,
//! another desk) can read while the kiosk writes.

use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::slot::SlotRepository;

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use healthpost_db::DbConfig;
///
/// let config = DbConfig::new("./healthpost.db").busy_timeout_ms(2_000);
/// assert_eq!(config.busy_timeout.as_millis(), 2_000);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// How long to wait on a locked database before failing.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations on open.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration for a database file. The file is created if
    /// it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Creates an in-memory database configuration (for testing).
    pub fn in_memory() -> Self {
        DbConfig::new(MEMORY_PATH)
    }

    /// Sets the busy timeout in milliseconds.
    pub fn busy_timeout_ms(mut self, ms: u64) -> Self {
        self.busy_timeout = Duration::from_millis(ms);
        self
    }

    /// Sets whether to run migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn is_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open SQLite database.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database and brings the schema up to date.
    ///
    /// ## What This Does
    /// 1. Opens the file read-write, creating it if missing
    /// 2. Sets the busy timeout and, for files, WAL + NORMAL synchronous
    /// 3. Runs migrations (if enabled)
    pub fn open(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening database"
        );

        let mut conn = if config.is_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open_with_flags(
                &config.database_path,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
        }
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        conn.busy_timeout(config.busy_timeout)?;

        if !config.is_memory() {
            // journal_mode returns the resulting mode as a row
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            debug!(journal_mode = %mode, "Connection pragmas configured");
        }

        if config.run_migrations {
            migrations::run_migrations(&mut conn)?;
        }

        info!("Database ready");
        Ok(Database { conn })
    }

    /// Opens a fresh in-memory database.
    pub fn in_memory() -> DbResult<Self> {
        Database::open(DbConfig::in_memory())
    }

    /// Checks that the database answers a trivial query.
    pub fn health_check(&self) -> bool {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }

    /// Returns `(total_migrations, applied_migrations)`.
    pub fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.conn)
    }

    /// Key-value slot access.
    pub fn slots(&self) -> SlotRepository<'_> {
        SlotRepository::new(&self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_database() {
        let db = Database::in_memory().unwrap();
        assert!(db.health_check());

        let (total, applied) = db.migration_status().unwrap();
        assert_eq!(total, applied);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .busy_timeout_ms(250)
            .run_migrations(false);

        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.run_migrations);
        assert!(!config.is_memory());
        assert!(DbConfig::in_memory().is_memory());
    }

    #[test]
    fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("healthpost.db");

        let db = Database::open(DbConfig::new(&path)).unwrap();
        assert!(db.health_check());
        assert!(path.exists());

        drop(db);

        // WAL is a property of the file, so a second connection sees it
        let mode: String = Connection::open(&path)
            .unwrap()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("healthpost.db");

        let err = Database::open(DbConfig::new(path)).unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }
}
