//! Service layer for Shopkeeper
//!
//! The store operations. Services borrow the [`Storage`](crate::storage::Storage),
//! keep derived fields (paid amounts, status history, mirrored ledger entries)
//! consistent, persist the touched collections and write the audit log.
//! They do not validate input; the forms in the CLI do.

pub mod cash_flow;
pub mod catalog;
pub mod client;
pub mod order;

pub use cash_flow::{CashFlowFilter, CashFlowService, CashFlowSummary};
pub use catalog::{CatalogService, CreateProductInput, CreateServiceInput};
pub use client::{ClientFilter, ClientService, CreateClientInput};
pub use order::{OrderFilter, OrderService, RecordedPayment};
