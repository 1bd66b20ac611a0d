//! Core data models for Shopkeeper
//!
//! This module contains the data structures of the shop domain: clients, the
//! product and service catalog, service orders with their payments and status
//! history, and the cash-flow ledger.

pub mod cash_flow;
pub mod client;
pub mod ids;
pub mod money;
pub mod order;
pub mod product;
pub mod service;

pub use cash_flow::{CashFlowEntry, EntryKind, NewCashFlowEntry, ORDER_REVENUE_CATEGORY};
pub use client::{Client, ClientPatch};
pub use ids::{
    CashFlowId, ClientId, LineItemId, OrderId, PaymentId, ProductId, ServiceId, StatusChangeId,
};
pub use money::Money;
pub use order::{
    validate_payment, ItemKind, LineItem, NewOrder, OrderStatus, OrderValidationError, Payment,
    PaymentMethod, ServiceOrder, StatusChange, OPENING_NOTE,
};
pub use product::{Product, ProductPatch};
pub use service::{Service, ServicePatch};
