//! # HealthPost Kiosk Entry Point
//!
//! ```text
//! ┌──────────────────────┐  JSON lines   ┌──────────────────────────────┐
//! │  HealthPost web UI   │ ────stdin───► │  healthpost-kiosk            │
//! │  (billing, history)  │ ◄──stdout──── │  commands → core → SQLite    │
//! └──────────────────────┘               └──────────────────────────────┘
//!                                           logs → stderr
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match healthpost_kiosk::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("healthpost-kiosk: {e}");
            ExitCode::FAILURE
        }
    }
}
