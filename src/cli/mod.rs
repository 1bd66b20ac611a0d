//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.
//!
//! Validation of user input happens here, before any service call; the
//! services themselves store whatever they are given.

pub mod cashflow;
pub mod catalog;
pub mod client;
pub mod order;
pub mod report;
pub mod toggles;

pub use cashflow::{handle_cashflow_command, CashflowCommands};
pub use catalog::{handle_product_command, handle_service_command, ProductCommands, ServiceCommands};
pub use client::{handle_client_command, ClientCommands};
pub use order::{handle_order_command, OrderCommands};
pub use report::{handle_report_command, ReportCommands};
pub use toggles::{handle_demo_command, handle_insights_command, DemoCommands, InsightsCommands};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{ShopError, ShopResult};
use crate::models::{Money, PaymentMethod};

/// Parse a user-typed amount such as `85,00` or `R$ 1.234,56`
pub(crate) fn parse_money(input: &str) -> ShopResult<Money> {
    Money::parse(input).map_err(|e| {
        ShopError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '85,00' or '85'. Error: {}",
            input, e
        ))
    })
}

/// Parse a `YYYY-MM-DD` date
pub(crate) fn parse_date(input: &str) -> ShopResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        ShopError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", input))
    })
}

/// Parse a `YYYY-MM-DD` date as noon UTC of that day
pub(crate) fn parse_day(input: &str) -> ShopResult<DateTime<Utc>> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    Ok(parse_date(input)?.and_time(noon).and_utc())
}

pub(crate) fn parse_method(input: &str) -> ShopResult<PaymentMethod> {
    PaymentMethod::parse(input).ok_or_else(|| {
        ShopError::Validation(format!(
            "Invalid payment method: '{}'. Valid methods: pix, cash, card",
            input
        ))
    })
}

/// Turn an empty optional text into `None`
pub(crate) fn non_blank(input: Option<String>) -> Option<String> {
    input.filter(|s| !s.trim().is_empty())
}
