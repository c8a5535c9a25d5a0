//! # Configuration State
//!
//! Kiosk configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`HEALTHPOST_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after startup.

use serde::Serialize;
use std::path::PathBuf;

use healthpost_core::HISTORY_KEY;

/// Kiosk configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskConfig {
    /// Facility name shown on bills
    pub facility_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Database file. `None` means the platform data directory.
    #[serde(skip)]
    pub database_path: Option<PathBuf>,

    /// Storage slot holding the bill history
    pub history_key: String,
}

impl Default for KioskConfig {
    /// ## Default Values
    /// - Facility: "HealthPost Clinic"
    /// - Currency: USD ($)
    /// - Database: platform data directory
    fn default() -> Self {
        KioskConfig {
            facility_name: "HealthPost Clinic".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            database_path: None,
            history_key: HISTORY_KEY.to_string(),
        }
    }
}

impl KioskConfig {
    /// Creates a configuration from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `HEALTHPOST_FACILITY_NAME`: Override facility name
    /// - `HEALTHPOST_CURRENCY_CODE`: Override currency code
    /// - `HEALTHPOST_CURRENCY_SYMBOL`: Override currency symbol
    /// - `HEALTHPOST_DB_PATH`: Database file path
    /// - `HEALTHPOST_HISTORY_KEY`: History slot name
    pub fn from_env() -> Self {
        KioskConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`KioskConfig::from_env`] with a custom variable source.
    /// Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = KioskConfig::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(name) = var("HEALTHPOST_FACILITY_NAME") {
            config.facility_name = name;
        }

        if let Some(code) = var("HEALTHPOST_CURRENCY_CODE") {
            config.currency_code = code.trim().to_uppercase();
        }

        if let Some(symbol) = var("HEALTHPOST_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(path) = var("HEALTHPOST_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = var("HEALTHPOST_HISTORY_KEY") {
            config.history_key = key;
        }

        config
    }

    /// Formats a cent amount as a currency string.
    ///
    /// Amounts are always held in hundredths, so two decimals are shown.
    ///
    /// ## Example
    /// ```rust
    /// use healthpost_kiosk::state::KioskConfig;
    ///
    /// let config = KioskConfig::default();
    /// assert_eq!(config.format_currency(1675), "$16.75");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let magnitude = cents.unsigned_abs();

        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            magnitude / 100,
            magnitude % 100
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_currency() {
        let config = KioskConfig::default();
        assert_eq!(config.format_currency(1675), "$16.75");
        assert_eq!(config.format_currency(500), "$5.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-1250), "-$12.50");
        assert_eq!(config.format_currency(i64::MIN), "-$92233720368547758.08");
    }

    #[test]
    fn test_format_currency_custom_symbol() {
        let config = KioskConfig {
            currency_symbol: "Rs ".to_string(),
            ..KioskConfig::default()
        };
        assert_eq!(config.format_currency(123456), "Rs 1234.56");
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("HEALTHPOST_FACILITY_NAME", "Riverside Health Post"),
            ("HEALTHPOST_DB_PATH", "/var/lib/healthpost/bills.db"),
            ("HEALTHPOST_CURRENCY_CODE", " npr "),
            ("HEALTHPOST_CURRENCY_SYMBOL", "Rs "),
            ("HEALTHPOST_HISTORY_KEY", "  "),
        ]
        .into_iter()
        .collect();

        let config = KioskConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.facility_name, "Riverside Health Post");
        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/var/lib/healthpost/bills.db"))
        );
        assert_eq!(config.currency_code, "NPR");
        assert_eq!(config.currency_symbol, "Rs ");
        // Blank values fall back to defaults
        assert_eq!(config.history_key, HISTORY_KEY);
    }
}
