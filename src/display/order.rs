//! Service order display formatting
//!
//! Formats service orders as a register table and as a full detail view
//! with items, payments and status history.

use std::collections::HashMap;

use crate::config::Settings;
use crate::models::{Client, ClientId, ServiceOrder};
use crate::reports::sales::truncate;

/// Format a list of orders as a table
///
/// `clients` resolves client names; unknown clients show as `?`.
pub fn format_order_list(orders: &[ServiceOrder], clients: &[Client], settings: &Settings) -> String {
    if orders.is_empty() {
        return "No service orders found.".to_string();
    }

    let names: HashMap<ClientId, &str> = clients.iter().map(|c| (c.id, c.name.as_str())).collect();
    let symbol = &settings.currency_symbol;

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<10}  {:<22}  {:<15}  {:>14}  {:>14}  {:<10}\n",
        "Number", "Intake", "Client", "Status", "Total", "Balance", "Expected"
    ));
    output.push_str(&format!(
        "{:-<10}  {:-<10}  {:-<22}  {:-<15}  {:->14}  {:->14}  {:-<10}\n",
        "", "", "", "", "", "", ""
    ));

    for order in orders {
        let client = names.get(&order.client_id).copied().unwrap_or("?");
        output.push_str(&format!(
            "{:<10}  {:<10}  {:<22}  {:<15}  {:>14}  {:>14}  {:<10}\n",
            order.number,
            order.intake_date.format(&settings.date_format).to_string(),
            truncate(client, 22),
            order.status.to_string(),
            order.total.format_with_symbol(symbol),
            order.balance_due().format_with_symbol(symbol),
            order.expected_date.format(&settings.date_format).to_string(),
        ));
    }

    output.push_str(&format!("\n{} order(s)\n", orders.len()));
    output
}

/// Format a single order with its items, payments and history
pub fn format_order_details(
    order: &ServiceOrder,
    client: Option<&Client>,
    settings: &Settings,
) -> String {
    let symbol = &settings.currency_symbol;
    let date = |d: &chrono::DateTime<chrono::Utc>| d.format(&settings.date_format).to_string();

    let mut output = String::new();
    output.push_str(&format!("Service Order {}\n", order.number));
    output.push_str(&"=".repeat(60));
    output.push('\n');
    match client {
        Some(client) => output.push_str(&format!(
            "  Client:         {} ({})\n",
            client.name, client.contact
        )),
        None => output.push_str("  Client:         (unknown client)\n"),
    }
    output.push_str(&format!("  Status:         {}\n", order.status));
    output.push_str(&format!("  Intake:         {}\n", date(&order.intake_date)));
    output.push_str(&format!("  Expected:       {}\n", date(&order.expected_date)));
    output.push_str(&format!("  Payment method: {}\n", order.payment_method));
    output.push_str(&format!("  ID:             {}\n", order.id));
    if let Some(note) = &order.note {
        output.push_str(&format!("  Note:           {}\n", note));
    }

    output.push_str("\nItems\n");
    for item in &order.items {
        output.push_str(&format!(
            "  {:>3} x {:<30} {:<8} {:>14} {:>14}\n",
            item.quantity,
            truncate(&item.name, 30),
            item.kind.to_string(),
            item.unit_price.format_with_symbol(symbol),
            item.subtotal().format_with_symbol(symbol),
        ));
    }
    output.push_str(&format!(
        "  {:<49} {:>14}\n",
        "Total",
        order.total.format_with_symbol(symbol)
    ));

    output.push_str("\nPayments\n");
    if order.payments.is_empty() {
        output.push_str("  No payments yet\n");
    }
    for payment in &order.payments {
        output.push_str(&format!(
            "  {:<10} {:<6} {:>14}  {}\n",
            date(&payment.date),
            payment.method.to_string(),
            payment.amount.format_with_symbol(symbol),
            payment.note.as_deref().unwrap_or(""),
        ));
    }
    output.push_str(&format!(
        "  Paid: {}   Balance due: {}\n",
        order.paid.format_with_symbol(symbol),
        order.balance_due().format_with_symbol(symbol)
    ));

    output.push_str("\nHistory\n");
    for change in &order.history {
        output.push_str(&format!(
            "  {}  {:<15}  {}\n",
            change.date.format("%d/%m/%Y %H:%M"),
            change.status.to_string(),
            change.note.as_deref().unwrap_or(""),
        ));
    }

    output
}
