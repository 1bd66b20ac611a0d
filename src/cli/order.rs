//! Service order CLI commands
//!
//! Opening orders, moving them through their statuses and taking payments.

use chrono::Utc;
use clap::Subcommand;

use super::{non_blank, parse_date, parse_day, parse_method, parse_money};
use crate::config::Settings;
use crate::contact::{status_update_message, whatsapp_link};
use crate::display::order::{format_order_details, format_order_list};
use crate::error::{ShopError, ShopResult};
use crate::models::{validate_payment, LineItem, Money, NewOrder, OrderStatus};
use crate::services::{CatalogService, ClientService, OrderFilter, OrderService, RecordedPayment};
use crate::storage::Storage;

/// Service order subcommands
#[derive(Subcommand)]
pub enum OrderCommands {
    /// Open a new service order
    Create {
        /// Client name or ID
        client: String,
        /// Service to perform, as NAME or NAME:QTY (repeatable)
        #[arg(short, long = "service")]
        services: Vec<String>,
        /// Product to sell, as NAME or NAME:QTY (repeatable)
        #[arg(short, long = "product")]
        products: Vec<String>,
        /// Expected delivery date (YYYY-MM-DD)
        #[arg(short, long)]
        expected: String,
        /// Payment method (pix, cash, card)
        #[arg(short, long, default_value = "pix")]
        method: String,
        /// Order number (generated when omitted)
        #[arg(short, long)]
        number: Option<String>,
        /// Note
        #[arg(long)]
        note: Option<String>,
        /// Entry payment taken when the order is opened
        #[arg(short, long)]
        initial_payment: Option<String>,
    },
    /// List service orders
    List {
        /// Filter by status
        #[arg(short, long)]
        status: Option<String>,
        /// Filter by client name (partial match)
        #[arg(short, long)]
        client: Option<String>,
        /// Filter by order number (partial match)
        #[arg(short, long)]
        number: Option<String>,
        /// Intake on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Intake on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show an order with items, payments and history
    Show {
        /// Order number or ID
        order: String,
    },
    /// Change an order's status
    Status {
        /// Order number or ID
        order: String,
        /// New status (received, in_progress, awaiting_client, delivered)
        status: String,
        /// Note for the history entry
        #[arg(long)]
        note: Option<String>,
    },
    /// Record a payment against an order
    Pay {
        /// Order number or ID
        order: String,
        /// Amount (e.g., "50,00")
        amount: String,
        /// Payment method (defaults to the order's)
        #[arg(short, long)]
        method: Option<String>,
        /// Note
        #[arg(long)]
        note: Option<String>,
    },
}

/// Split `NAME:QTY` into the name and quantity; a bare name means one unit
fn parse_item_arg(arg: &str) -> ShopResult<(&str, u32)> {
    let numeric = |qty: &str| !qty.is_empty() && qty.chars().all(|c| c.is_ascii_digit());
    match arg.rsplit_once(':') {
        Some((name, qty)) if numeric(qty.trim()) => {
            let quantity = qty.trim().parse::<u32>().map_err(|_| {
                ShopError::Validation(format!("Invalid quantity in '{}'", arg))
            })?;
            Ok((name.trim(), quantity))
        }
        _ => Ok((arg.trim(), 1)),
    }
}

fn parse_status(input: &str) -> ShopResult<OrderStatus> {
    OrderStatus::parse(input).ok_or_else(|| {
        ShopError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: received, in_progress, awaiting_client, delivered",
            input
        ))
    })
}

/// The payment is saved either way; only its audit trail is missing
fn warn_unaudited(recorded: &RecordedPayment) {
    if let Some(error) = &recorded.audit_error {
        println!(
            "Warning: payment on {} was saved but not audited: {}",
            recorded.order.number, error
        );
    }
}

/// Handle a service order command
pub fn handle_order_command(
    storage: &Storage,
    settings: &Settings,
    cmd: OrderCommands,
) -> ShopResult<()> {
    let service = OrderService::new(storage);
    let symbol = &settings.currency_symbol;

    match cmd {
        OrderCommands::Create {
            client,
            services,
            products,
            expected,
            method,
            number,
            note,
            initial_payment,
        } => {
            let client = ClientService::new(storage)
                .find(&client)?
                .ok_or_else(|| ShopError::client_not_found(&client))?;
            let catalog = CatalogService::new(storage);

            let mut items = Vec::new();
            for arg in &services {
                let (name, quantity) = parse_item_arg(arg)?;
                let found = catalog
                    .find_service(name)?
                    .ok_or_else(|| ShopError::service_not_found(name))?;
                items.push(LineItem::from_service(&found, quantity));
            }
            for arg in &products {
                let (name, quantity) = parse_item_arg(arg)?;
                let found = catalog
                    .find_product(name)?
                    .ok_or_else(|| ShopError::product_not_found(name))?;
                items.push(LineItem::from_product(&found, quantity));
            }

            let initial_payment = match initial_payment {
                Some(amount) => parse_money(&amount)?,
                None => Money::zero(),
            };

            let new_order = NewOrder {
                number: non_blank(number),
                client_id: client.id,
                intake_date: Utc::now(),
                expected_date: parse_day(&expected)?,
                payment_method: parse_method(&method)?,
                items,
                note: non_blank(note),
            };
            new_order
                .validate(initial_payment)
                .map_err(|e| ShopError::Validation(e.to_string()))?;

            let mut order = service.create_order(new_order)?;
            if initial_payment.is_positive() {
                if let Some(recorded) =
                    service.add_payment(order.id, initial_payment, order.payment_method, None)?
                {
                    warn_unaudited(&recorded);
                    order = recorded.order;
                }
            }

            println!("Opened service order {} for {}", order.number, client.name);
            println!("  Total: {}", order.total.format_with_symbol(symbol));
            println!("  Paid: {}", order.paid.format_with_symbol(symbol));
            println!("  Balance due: {}", order.balance_due().format_with_symbol(symbol));
            println!(
                "  Expected: {}",
                order.expected_date.format(&settings.date_format)
            );
        }

        OrderCommands::List {
            status,
            client,
            number,
            from,
            to,
        } => {
            let mut filter = OrderFilter::new();
            if let Some(status) = status {
                filter = filter.status(parse_status(&status)?);
            }
            if let Some(client) = client {
                filter = filter.client_name(client);
            }
            if let Some(number) = number {
                filter = filter.number(number);
            }
            let start = from.as_deref().map(parse_date).transpose()?;
            let end = to.as_deref().map(parse_date).transpose()?;
            filter = filter.date_range(start, end);

            let orders = service.list(&filter)?;
            let clients = storage.clients.get_all()?;
            print!("{}", format_order_list(&orders, &clients, settings));
        }

        OrderCommands::Show { order } => {
            let found = service
                .find(&order)?
                .ok_or_else(|| ShopError::order_not_found(&order))?;
            let client = storage.clients.get(found.client_id)?;
            print!("{}", format_order_details(&found, client.as_ref(), settings));
        }

        OrderCommands::Status {
            order,
            status,
            note,
        } => {
            let status = parse_status(&status)?;
            let found = service
                .find(&order)?
                .ok_or_else(|| ShopError::order_not_found(&order))?;

            let note =
                non_blank(note).unwrap_or_else(|| format!("Status atualizado para {}", status));
            let updated = service
                .update_order_status(found.id, status, Some(note))?
                .ok_or_else(|| ShopError::order_not_found(&order))?;

            println!("{} is now {}", updated.number, updated.status);

            if let Some(client) = storage.clients.get(updated.client_id)? {
                let message =
                    status_update_message(Some(&client.name), &updated.number, updated.status);
                println!(
                    "Notify the client: {}",
                    whatsapp_link(&client.contact, Some(&message), None)
                );
            }
        }

        OrderCommands::Pay {
            order,
            amount,
            method,
            note,
        } => {
            let amount = parse_money(&amount)?;
            validate_payment(amount).map_err(|e| ShopError::Validation(e.to_string()))?;

            let found = service
                .find(&order)?
                .ok_or_else(|| ShopError::order_not_found(&order))?;
            let method = match method {
                Some(method) => parse_method(&method)?,
                None => found.payment_method,
            };

            let recorded = service
                .add_payment(found.id, amount, method, non_blank(note))?
                .ok_or_else(|| ShopError::order_not_found(&order))?;
            warn_unaudited(&recorded);

            println!(
                "Recorded {} via {} on {}",
                recorded.payment.amount.format_with_symbol(symbol),
                recorded.payment.method,
                recorded.order.number
            );
            println!(
                "  Paid: {}   Balance due: {}",
                recorded.order.paid.format_with_symbol(symbol),
                recorded.order.balance_due().format_with_symbol(symbol)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_arg() {
        assert_eq!(parse_item_arg("Lavagem Premium").unwrap(), ("Lavagem Premium", 1));
        assert_eq!(parse_item_arg("Cadarço Branco:2").unwrap(), ("Cadarço Branco", 2));
        assert_eq!(parse_item_arg("Kit: Limpeza").unwrap(), ("Kit: Limpeza", 1));
        assert!(parse_item_arg("Graxa:99999999999").is_err());
    }

    #[test]
    fn test_status_parse_error() {
        assert_eq!(parse_status("entregue").unwrap(), OrderStatus::Delivered);
        assert!(parse_status("lost").unwrap_err().is_validation());
    }
}
