//! Key-value persistence boundary
//!
//! The store only ever needs `get`/`set`/`remove` of byte strings under fixed
//! keys. The file backend keeps one `<key>.json` file per key; the memory
//! backend serves tests and throwaway sessions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{ShopError, ShopResult};

use super::file_io::{read_bytes, remove_file, write_bytes_atomic};

/// Byte-string key-value store
pub trait KeyValueStore {
    /// Read the value under `key`, `None` if absent
    fn get(&self, key: &str) -> ShopResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &[u8]) -> ShopResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> ShopResult<()>;
}

/// Stores each key as a JSON file in a directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> ShopResult<Option<Vec<u8>>> {
        read_bytes(self.path_for(key))
    }

    fn set(&self, key: &str, value: &[u8]) -> ShopResult<()> {
        write_bytes_atomic(self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> ShopResult<()> {
        remove_file(self.path_for(key))
    }
}

/// In-memory store, counting writes so callers can assert on them
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    data: RwLock<HashMap<String, Vec<u8>>>,
    writes: RwLock<usize>,
}

impl MemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` and `remove` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.read().map(|w| *w).unwrap_or(0)
    }

    /// Keys currently present, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .data
            .read()
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn bump_writes(&self) -> ShopResult<()> {
        let mut writes = self
            .writes
            .write()
            .map_err(|e| ShopError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *writes += 1;
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> ShopResult<Option<Vec<u8>>> {
        let data = self
            .data
            .read()
            .map_err(|e| ShopError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> ShopResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ShopError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.insert(key.to_string(), value.to_vec());
        drop(data);
        self.bump_writes()
    }

    fn remove(&self, key: &str) -> ShopResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ShopError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.remove(key);
        drop(data);
        self.bump_writes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(store: &dyn KeyValueStore) {
        assert!(store.get("upa_clients").unwrap().is_none());

        store.set("upa_clients", b"[]").unwrap();
        assert_eq!(store.get("upa_clients").unwrap().unwrap(), b"[]");

        store.set("upa_clients", b"[1]").unwrap();
        assert_eq!(store.get("upa_clients").unwrap().unwrap(), b"[1]");

        store.remove("upa_clients").unwrap();
        assert!(store.get("upa_clients").unwrap().is_none());
        store.remove("upa_clients").unwrap();
    }

    #[test]
    fn test_file_store_contract() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());
        exercise(&store);
    }

    #[test]
    fn test_file_store_layout() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());

        store.set("upa_orders", b"[]").unwrap();
        assert!(temp_dir.path().join("upa_orders.json").exists());
    }

    #[test]
    fn test_memory_store_contract() {
        let store = MemoryKeyValueStore::new();
        exercise(&store);
        assert_eq!(store.write_count(), 4);
        assert!(store.keys().is_empty());
    }
}
