//! Dashboard
//!
//! The shop at a glance: money in and out, open work, best sellers, the
//! best-paying client and the alerts that need attention (low stock,
//! overdue orders).

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::error::ShopResult;
use crate::models::{Money, OrderStatus, Product, ServiceOrder};
use crate::services::CashFlowSummary;
use crate::storage::Storage;

use super::sales::{rank_items, top_client, truncate, ItemSales, TopClient};

/// An order past its expected date
#[derive(Debug, Clone)]
pub struct OverdueOrder {
    pub number: String,
    pub client_name: Option<String>,
    pub status: OrderStatus,
    pub expected_date: DateTime<Utc>,
    pub balance_due: Money,
}

/// Dashboard figures
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    /// Totals over the whole ledger
    pub cash_flow: CashFlowSummary,
    /// Orders not yet delivered
    pub active_orders: usize,
    pub orders_by_status: Vec<(OrderStatus, usize)>,
    pub top_client: Option<TopClient>,
    pub top_items: Vec<ItemSales>,
    pub low_stock: Vec<Product>,
    /// First overdue orders, in collection order
    pub overdue: Vec<OverdueOrder>,
    /// How many orders are overdue in total
    pub overdue_count: usize,
}

impl DashboardReport {
    /// Compute the dashboard as of `now`
    pub fn generate(storage: &Storage, settings: &Settings, now: DateTime<Utc>) -> ShopResult<Self> {
        let orders = storage.orders.get_all()?;
        let clients = storage.clients.get_all()?;
        let ledger = storage.cash_flow.get_all()?;

        let overdue_orders: Vec<&ServiceOrder> =
            orders.iter().filter(|o| o.is_overdue(now)).collect();
        let overdue = overdue_orders
            .iter()
            .take(settings.overdue_preview_limit)
            .map(|order| OverdueOrder {
                number: order.number.clone(),
                client_name: clients
                    .iter()
                    .find(|c| c.id == order.client_id)
                    .map(|c| c.name.clone()),
                status: order.status,
                expected_date: order.expected_date,
                balance_due: order.balance_due(),
            })
            .collect();

        let low_stock = storage
            .products
            .get_all()?
            .into_iter()
            .filter(|p| p.is_low_stock(settings.low_stock_threshold))
            .collect();

        Ok(Self {
            generated_at: now,
            cash_flow: CashFlowSummary::from_entries(&ledger),
            active_orders: orders.iter().filter(|o| !o.is_delivered()).count(),
            orders_by_status: OrderStatus::all()
                .into_iter()
                .map(|status| (status, orders.iter().filter(|o| o.status == status).count()))
                .collect(),
            top_client: top_client(&orders, &clients),
            top_items: rank_items(&orders, settings.dashboard_top_items),
            low_stock,
            overdue_count: overdue_orders.len(),
            overdue,
        })
    }

    /// Format the dashboard for terminal display
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let symbol = &settings.currency_symbol;
        let mut output = String::new();

        output.push_str(&format!(
            "Dashboard ({})\n",
            self.generated_at.format(&settings.date_format)
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Revenue:  {:>18}\n",
            self.cash_flow.revenue.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "Expenses: {:>18}\n",
            self.cash_flow.expenses.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "Balance:  {:>18}\n",
            self.cash_flow.balance.format_with_symbol(symbol)
        ));
        output.push_str(&format!("Active orders: {}\n", self.active_orders));
        for (status, count) in &self.orders_by_status {
            output.push_str(&format!("  {:<16} {:>4}\n", status, count));
        }

        output.push_str("\nTop client\n");
        match &self.top_client {
            Some(top) => output.push_str(&format!(
                "  {} ({})\n",
                top.client.name,
                top.total_paid.format_with_symbol(symbol)
            )),
            None => output.push_str("  No payments yet\n"),
        }

        output.push_str("\nBest sellers\n");
        if self.top_items.is_empty() {
            output.push_str("  No items sold yet\n");
        }
        for item in &self.top_items {
            output.push_str(&format!(
                "  {:<30} {:<8} {:>16}\n",
                truncate(&item.name, 30),
                item.kind,
                item.revenue.format_with_symbol(symbol)
            ));
        }

        output.push_str("\nLow stock\n");
        if self.low_stock.is_empty() {
            output.push_str("  Stock OK\n");
        }
        for product in &self.low_stock {
            output.push_str(&format!(
                "  {:<30} {:>4} left\n",
                truncate(&product.name, 30),
                product.stock
            ));
        }

        output.push_str(&format!("\nOverdue orders ({})\n", self.overdue_count));
        if self.overdue.is_empty() {
            output.push_str("  Nothing overdue\n");
        }
        for order in &self.overdue {
            output.push_str(&format!(
                "  {:<10} {:<24} due {}  {}\n",
                order.number,
                truncate(order.client_name.as_deref().unwrap_or("(unknown client)"), 24),
                order.expected_date.format(&settings.date_format),
                order.status
            ));
        }

        output
    }
}
