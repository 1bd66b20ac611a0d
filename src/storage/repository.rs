//! Generic in-memory collection mirrored to one key-value key
//!
//! Records are kept in insertion order and looked up by linear scan.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{ShopError, ShopResult};
use crate::models::{
    CashFlowEntry, CashFlowId, Client, ClientId, OrderId, Product, ProductId, Service, ServiceId,
    ServiceOrder,
};

use super::kv::KeyValueStore;

/// A record that can live in a [`Repository`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + std::fmt::Display;

    /// Name used in errors and the audit log
    const ENTITY_NAME: &'static str;

    fn id(&self) -> Self::Id;

    /// Check whether a user-typed identifier refers to this record
    fn matches_identifier(&self, identifier: &str) -> bool;
}

impl Record for Client {
    type Id = ClientId;
    const ENTITY_NAME: &'static str = "Client";

    fn id(&self) -> ClientId {
        self.id
    }

    fn matches_identifier(&self, identifier: &str) -> bool {
        self.id.matches(identifier) || self.name.eq_ignore_ascii_case(identifier.trim())
    }
}

impl Record for Product {
    type Id = ProductId;
    const ENTITY_NAME: &'static str = "Product";

    fn id(&self) -> ProductId {
        self.id
    }

    fn matches_identifier(&self, identifier: &str) -> bool {
        self.id.matches(identifier) || self.name.eq_ignore_ascii_case(identifier.trim())
    }
}

impl Record for Service {
    type Id = ServiceId;
    const ENTITY_NAME: &'static str = "Service";

    fn id(&self) -> ServiceId {
        self.id
    }

    fn matches_identifier(&self, identifier: &str) -> bool {
        self.id.matches(identifier) || self.name.eq_ignore_ascii_case(identifier.trim())
    }
}

impl Record for ServiceOrder {
    type Id = OrderId;
    const ENTITY_NAME: &'static str = "Service order";

    fn id(&self) -> OrderId {
        self.id
    }

    fn matches_identifier(&self, identifier: &str) -> bool {
        self.id.matches(identifier) || self.number.eq_ignore_ascii_case(identifier.trim())
    }
}

impl Record for CashFlowEntry {
    type Id = CashFlowId;
    const ENTITY_NAME: &'static str = "Cash-flow entry";

    fn id(&self) -> CashFlowId {
        self.id
    }

    fn matches_identifier(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
}

/// Ordered collection of records persisted as a JSON array under `key`
pub struct Repository<T: Record> {
    key: &'static str,
    data: RwLock<Vec<T>>,
}

impl<T: Record> Repository<T> {
    /// Create an empty repository bound to `key`
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            data: RwLock::new(Vec::new()),
        }
    }

    /// The key this collection is stored under
    pub fn key(&self) -> &'static str {
        self.key
    }

    fn read(&self) -> ShopResult<RwLockReadGuard<'_, Vec<T>>> {
        self.data
            .read()
            .map_err(|e| ShopError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> ShopResult<RwLockWriteGuard<'_, Vec<T>>> {
        self.data
            .write()
            .map_err(|e| ShopError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Replace the contents with what is stored under the key; missing key loads empty
    pub fn load(&self, store: &dyn KeyValueStore) -> ShopResult<()> {
        let records: Vec<T> = match store.get(self.key)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ShopError::Storage(format!("Failed to parse {}: {}", self.key, e))
            })?,
            None => Vec::new(),
        };
        self.replace_all(records)
    }

    /// Write the whole collection under the key
    pub fn save(&self, store: &dyn KeyValueStore) -> ShopResult<()> {
        let data = self.read()?;
        let bytes = serde_json::to_vec(&*data)
            .map_err(|e| ShopError::Storage(format!("Failed to serialize {}: {}", self.key, e)))?;
        drop(data);
        store.set(self.key, &bytes)
    }

    /// Replace the contents wholesale
    pub fn replace_all(&self, records: Vec<T>) -> ShopResult<()> {
        *self.write()? = records;
        Ok(())
    }

    /// Get a record by ID
    pub fn get(&self, id: T::Id) -> ShopResult<Option<T>> {
        Ok(self.read()?.iter().find(|r| r.id() == id).cloned())
    }

    /// Find a record by ID, short ID or name
    pub fn find(&self, identifier: &str) -> ShopResult<Option<T>> {
        Ok(self
            .read()?
            .iter()
            .find(|r| r.matches_identifier(identifier))
            .cloned())
    }

    /// All records in insertion order
    pub fn get_all(&self) -> ShopResult<Vec<T>> {
        Ok(self.read()?.clone())
    }

    /// Append a record
    pub fn push(&self, record: T) -> ShopResult<()> {
        self.write()?.push(record);
        Ok(())
    }

    /// Mutate the record with `id` in place, returning the updated copy
    ///
    /// Returns `None` without touching anything when the ID is unknown.
    pub fn update<F>(&self, id: T::Id, f: F) -> ShopResult<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut data = self.write()?;
        Ok(data.iter_mut().find(|r| r.id() == id).map(|record| {
            f(record);
            record.clone()
        }))
    }

    /// Count records
    pub fn count(&self) -> ShopResult<usize> {
        Ok(self.read()?.len())
    }
}
