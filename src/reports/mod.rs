//! Reports for Shopkeeper
//!
//! Derived views over the collections: the dashboard, monthly financials,
//! revenue by payment method and the best sellers ranking. Every report is
//! computed on demand and never persisted.

pub mod dashboard;
pub mod financial;
pub mod sales;

pub use dashboard::{DashboardReport, OverdueOrder};
pub use financial::{MonthRow, MonthlyReport, PaymentMethodReport};
pub use sales::{rank_items, top_client, ItemSales, TopClient, TopItemsReport};
