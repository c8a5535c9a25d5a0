//! # Config Commands

use tracing::debug;

use crate::state::{AppState, KioskConfig};

/// Gets the kiosk configuration.
///
/// ## When Used
/// - Front-end startup (facility name, currency)
pub fn get_config(state: &AppState) -> KioskConfig {
    debug!("get_config command");
    state.config.clone()
}
