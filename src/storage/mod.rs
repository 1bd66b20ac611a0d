//! Storage layer for Shopkeeper
//!
//! Five record collections held in memory and mirrored to a key-value store,
//! one JSON array per key. In demo mode the collections are seeded from a
//! fixed dataset and nothing but the preference flags is ever written.

pub mod demo;
pub mod file_io;
pub mod keys;
pub mod kv;
pub mod preferences;
pub mod repository;

pub use demo::DemoData;
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use preferences::Preferences;
pub use repository::{Record, Repository};

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::ShopPaths;
use crate::error::ShopResult;
use crate::models::{CashFlowEntry, Client, Product, Service, ServiceOrder};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    kv: Arc<dyn KeyValueStore>,
    audit: Option<AuditLogger>,
    preferences: Preferences,
    pub clients: Repository<Client>,
    pub products: Repository<Product>,
    pub services: Repository<Service>,
    pub orders: Repository<ServiceOrder>,
    pub cash_flow: Repository<CashFlowEntry>,
}

impl Storage {
    /// Open the file-backed store under `paths` and load every collection
    pub fn open(paths: &ShopPaths) -> ShopResult<Self> {
        paths.ensure_directories()?;
        let kv = Arc::new(FileKeyValueStore::new(paths.data_dir()));
        let mut storage = Self::empty(kv);
        storage.audit = Some(AuditLogger::new(paths.audit_log()));
        storage.load_all()?;
        Ok(storage)
    }

    /// Build storage over an arbitrary backend, without audit logging
    pub fn with_store(kv: Arc<dyn KeyValueStore>) -> ShopResult<Self> {
        let mut storage = Self::empty(kv);
        storage.load_all()?;
        Ok(storage)
    }

    fn empty(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            audit: None,
            preferences: Preferences::default(),
            clients: Repository::new(keys::CLIENTS),
            products: Repository::new(keys::PRODUCTS),
            services: Repository::new(keys::SERVICES),
            orders: Repository::new(keys::ORDERS),
            cash_flow: Repository::new(keys::CASH_FLOW),
        }
    }

    /// Re-read the flags, then load the collections (or the demo dataset)
    pub fn load_all(&mut self) -> ShopResult<()> {
        self.preferences = Preferences::load(self.kv.as_ref())?;

        if self.preferences.demo_mode {
            let demo = DemoData::build(Utc::now());
            self.clients.replace_all(demo.clients)?;
            self.products.replace_all(demo.products)?;
            self.services.replace_all(demo.services)?;
            self.orders.replace_all(demo.orders)?;
            self.cash_flow.replace_all(demo.cash_flow)?;
            return Ok(());
        }

        let kv = self.kv.as_ref();
        self.clients.load(kv)?;
        self.products.load(kv)?;
        self.services.load(kv)?;
        self.orders.load(kv)?;
        self.cash_flow.load(kv)?;
        Ok(())
    }

    /// Write one collection back to the store; a no-op in demo mode
    pub fn persist<T: Record>(&self, repository: &Repository<T>) -> ShopResult<()> {
        if self.preferences.demo_mode {
            return Ok(());
        }
        repository.save(self.kv.as_ref())
    }

    /// Current preference flags
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Whether the demo dataset is active
    pub fn is_demo(&self) -> bool {
        self.preferences.demo_mode
    }

    /// Persist the demo flag and reload the collections accordingly
    pub fn set_demo_mode(&mut self, enabled: bool) -> ShopResult<()> {
        Preferences::save_demo_mode(self.kv.as_ref(), enabled)?;
        self.load_all()
    }

    /// Persist the insights flag
    pub fn set_show_insights(&mut self, enabled: bool) -> ShopResult<()> {
        Preferences::save_show_insights(self.kv.as_ref(), enabled)?;
        self.preferences.show_insights = enabled;
        Ok(())
    }

    /// The audit logger, if this storage is audited
    pub fn audit_logger(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    fn audit_target(&self) -> Option<&AuditLogger> {
        if self.preferences.demo_mode {
            None
        } else {
            self.audit.as_ref()
        }
    }

    /// Record a creation in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> ShopResult<()> {
        match self.audit_target() {
            Some(logger) => logger.append(&AuditEntry::create(
                entity_type,
                entity_id,
                entity_name,
                entity,
            )),
            None => Ok(()),
        }
    }

    /// Record an update in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> ShopResult<()> {
        match self.audit_target() {
            Some(logger) => logger.append(&AuditEntry::update(
                entity_type,
                entity_id,
                entity_name,
                before,
                after,
                diff_summary,
            )),
            None => Ok(()),
        }
    }
}
