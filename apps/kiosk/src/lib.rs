//! # HealthPost Kiosk Library
//!
//! Front-desk billing backend. Reads one JSON command per stdin line and
//! answers on stdout.
//!
//! ## Module Organization
//! ```text
//! healthpost_kiosk/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── bridge.rs       ◄─── JSON-lines request loop
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState (catalog, ledger, config)
//! │   └── config.rs   ◄─── KioskConfig
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command enum + dispatch
//! │   ├── catalog.rs  ◄─── Medicine search / inventory commands
//! │   ├── billing.rs  ◄─── Draft + commit commands
//! │   ├── history.rs  ◄─── Bill history commands
//! │   └── config.rs   ◄─── Config command
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod bridge;
pub mod commands;
pub mod error;
pub mod state;

use directories::ProjectDirs;
use std::io;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use healthpost_core::clock::SystemClock;
use healthpost_core::seed::default_catalog;
use healthpost_core::{KeyValueStore, MemoryStore};
use healthpost_db::{Database, DbConfig};

use error::{ApiError, ErrorCode};
use state::{AppState, KioskConfig};

/// Runs the kiosk until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Kiosk Startup                                     │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,healthpost=debug, override with RUST_LOG            │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • KioskConfig::from_env (HEALTHPOST_* variables)                    │
/// │                                                                         │
/// │  3. Open Database ────────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │     • On failure: in-memory store, history lasts for this session       │
/// │                                                                         │
/// │  4. Build State ──────────────────────────────────────────────────────► │
/// │     • Seed catalog, Ledger loads history from the store                 │
/// │                                                                         │
/// │  5. Serve stdin → stdout until EOF                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> io::Result<()> {
    init_tracing();

    info!("Starting HealthPost kiosk");

    let config = KioskConfig::from_env();
    let store = open_store(&config);
    let mut state = AppState::new(config, default_catalog(), store, Box::new(SystemClock));

    info!(
        facility = %state.config.facility_name,
        bills = state.ledger.history().len(),
        "State initialized"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    bridge::serve(stdin.lock(), stdout.lock(), &mut state)?;

    Ok(())
}

/// Opens the SQLite store, falling back to memory when it cannot be opened
/// or fails its health check.
fn open_store(config: &KioskConfig) -> Box<dyn KeyValueStore> {
    let opened = get_database_path(config).and_then(|path| {
        info!(?path, "Database path determined");
        let db = Database::open(DbConfig::new(path))?;

        if !db.health_check() {
            return Err(ApiError::new(ErrorCode::DatabaseError, "Database failed health check"));
        }

        let (total, applied) = db.migration_status()?;
        info!(total, applied, "Schema version checked");

        Ok(db)
    });

    match opened {
        Ok(db) => Box::new(db),
        Err(e) => {
            error!(code = ?e.code, message = %e.message, "Database unavailable");
            warn!("Bills will only be kept for this session");
            Box::new(MemoryStore::new())
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=healthpost_core=trace` - Trace the ledger only
/// - Default: `info,healthpost=debug`
///
/// Output goes to stderr; stdout carries the bridge protocol.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,healthpost=debug"));

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/org.healthpost.kiosk/healthpost.db`
/// - **Windows**: `%APPDATA%\healthpost\kiosk\data\healthpost.db`
/// - **Linux**: `~/.local/share/kiosk/healthpost.db`
///
/// ## Override
/// `HEALTHPOST_DB_PATH` (see [`KioskConfig`]) wins when set.
pub fn get_database_path(config: &KioskConfig) -> Result<PathBuf, ApiError> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("org", "healthpost", "kiosk")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir)
        .map_err(|e| ApiError::internal(format!("Could not create {}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join("healthpost.db"))
}
