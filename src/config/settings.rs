//! User settings for Shopkeeper
//!
//! Display and report preferences. Runtime flags that the store itself
//! persists (demo mode, insights) live in the key-value store instead, see
//! [`crate::storage::Preferences`].

use serde::{Deserialize, Serialize};

use super::paths::ShopPaths;
use crate::error::ShopError;

/// User settings for Shopkeeper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version of the settings file
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Products at or below this stock (and above zero) are flagged
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,

    /// How many overdue orders the dashboard lists
    #[serde(default = "default_overdue_preview_limit")]
    pub overdue_preview_limit: usize,

    /// How many best sellers the dashboard lists
    #[serde(default = "default_dashboard_top_items")]
    pub dashboard_top_items: usize,

    /// How many best sellers the billing report lists
    #[serde(default = "default_report_top_items")]
    pub report_top_items: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_low_stock_threshold() -> i64 {
    5
}

fn default_overdue_preview_limit() -> usize {
    3
}

fn default_dashboard_top_items() -> usize {
    3
}

fn default_report_top_items() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            low_stock_threshold: default_low_stock_threshold(),
            overdue_preview_limit: default_overdue_preview_limit(),
            dashboard_top_items: default_dashboard_top_items(),
            report_top_items: default_report_top_items(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ShopPaths) -> Result<Self, ShopError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| ShopError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ShopError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ShopPaths) -> Result<(), ShopError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ShopError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ShopError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "R$");
        assert_eq!(settings.low_stock_threshold, 5);
        assert_eq!(settings.overdue_preview_limit, 3);
        assert_eq!(settings.report_top_items, 10);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ShopPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.low_stock_threshold = 2;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.low_stock_threshold, 2);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "US$"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "US$");
        assert_eq!(settings.date_format, "%d/%m/%Y");
        assert_eq!(settings.dashboard_top_items, 3);
    }
}
