//! Display formatting for terminal output
//!
//! Provides utilities for formatting shop records for terminal display as
//! tables and detail views.

pub mod cash_flow;
pub mod catalog;
pub mod client;
pub mod order;

pub use cash_flow::{format_cash_flow_list, format_categories};
pub use catalog::{format_product_list, format_service_list};
pub use client::{format_client_details, format_client_list};
pub use order::{format_order_details, format_order_list};
