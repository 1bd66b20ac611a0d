//! Runtime flags persisted next to the collections

use crate::error::{ShopError, ShopResult};

use super::keys;
use super::kv::KeyValueStore;

/// Flags stored as JSON booleans in the key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    /// Seed the fixed demo dataset and never write collections
    pub demo_mode: bool,
    /// Show generated insights on the dashboard
    pub show_insights: bool,
}

impl Preferences {
    /// Read both flags; absent keys read as `false`
    pub fn load(store: &dyn KeyValueStore) -> ShopResult<Self> {
        Ok(Self {
            demo_mode: read_flag(store, keys::DEMO_MODE)?,
            show_insights: read_flag(store, keys::SHOW_INSIGHTS)?,
        })
    }

    /// Persist the demo-mode flag
    pub fn save_demo_mode(store: &dyn KeyValueStore, enabled: bool) -> ShopResult<()> {
        write_flag(store, keys::DEMO_MODE, enabled)
    }

    /// Persist the insights flag
    pub fn save_show_insights(store: &dyn KeyValueStore, enabled: bool) -> ShopResult<()> {
        write_flag(store, keys::SHOW_INSIGHTS, enabled)
    }
}

fn read_flag(store: &dyn KeyValueStore, key: &str) -> ShopResult<bool> {
    match store.get(key)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map_err(|e| ShopError::Storage(format!("Failed to parse {}: {}", key, e))),
        None => Ok(false),
    }
}

fn write_flag(store: &dyn KeyValueStore, key: &str, value: bool) -> ShopResult<()> {
    let bytes = serde_json::to_vec(&value)?;
    store.set(key, &bytes)
}
