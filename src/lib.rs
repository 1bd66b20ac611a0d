//! Shopkeeper - records for a shoe-repair and cleaning shop
//!
//! This library provides the core functionality for the Shopkeeper
//! application: a client registry, a product and service catalog, service
//! orders with payments and status history, and a cash-flow ledger. Every
//! collection is kept in memory and written through a key-value store.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (clients, catalog, orders, ledger)
//! - `storage`: Key-value persistence, collections and demo data
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `reports`: Dashboard and financial reports
//! - `insights`: Business summary and suggestion providers
//! - `contact`: WhatsApp links for clients
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use shopkeeper::config::{ShopPaths, Settings};
//! use shopkeeper::storage::Storage;
//!
//! let paths = ShopPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod contact;
pub mod display;
pub mod error;
pub mod insights;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ShopError, ShopResult};
