//! Service order model
//!
//! A service order ("OS") tracks a repair or cleaning job for a client: the
//! priced line items, the payments received against it and every status
//! change it went through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ClientId, LineItemId, OrderId, PaymentId, ProductId, ServiceId, StatusChangeId};
use super::money::Money;
use super::product::Product;
use super::service::Service;

/// Note recorded on the first history entry of every order
pub const OPENING_NOTE: &str = "Abertura de OS";

/// Lifecycle status of a service order
///
/// The usual flow is Received → InProgress → AwaitingClient → Delivered, but
/// any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Shoes dropped off, work not started
    Received,
    /// Work in progress
    InProgress,
    /// Waiting on the client (approval or pickup)
    AwaitingClient,
    /// Handed back to the client
    Delivered,
}

impl OrderStatus {
    /// All statuses in their usual order
    pub fn all() -> [Self; 4] {
        [
            Self::Received,
            Self::InProgress,
            Self::AwaitingClient,
            Self::Delivered,
        ]
    }

    /// Parse a status from user input (English or Portuguese)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "received" | "recebido" => Some(Self::Received),
            "in_progress" | "em_andamento" | "progress" => Some(Self::InProgress),
            "awaiting_client" | "aguardando_cliente" | "awaiting" => Some(Self::AwaitingClient),
            "delivered" | "entregue" => Some(Self::Delivered),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => f.pad("Received"),
            Self::InProgress => f.pad("In progress"),
            Self::AwaitingClient => f.pad("Awaiting client"),
            Self::Delivered => f.pad("Delivered"),
        }
    }
}

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Instant bank transfer
    Pix,
    /// Cash
    #[default]
    Cash,
    /// Debit or credit card
    Card,
}

impl PaymentMethod {
    /// Parse a payment method from user input (English or Portuguese)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pix" => Some(Self::Pix),
            "cash" | "dinheiro" => Some(Self::Cash),
            "card" | "cartao" | "cartão" => Some(Self::Card),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pix => f.pad("Pix"),
            Self::Cash => f.pad("Cash"),
            Self::Card => f.pad("Card"),
        }
    }
}

/// What a line item was priced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Product,
    Service,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product => f.pad("Product"),
            Self::Service => f.pad("Service"),
        }
    }
}

/// A priced entry on an order
///
/// Name and unit price are copied from the catalog when the item is added;
/// later catalog edits do not change existing orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,

    /// ID of the catalog product or service this was priced from
    pub item_id: String,

    pub kind: ItemKind,

    /// Catalog name at the time the item was added
    pub name: String,

    pub quantity: u32,

    /// Catalog price at the time the item was added
    pub unit_price: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LineItem {
    /// Snapshot a product into a line item
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self::snapshot(
            product_key(product.id),
            ItemKind::Product,
            &product.name,
            product.price,
            quantity,
            product.description.clone(),
        )
    }

    /// Snapshot a service into a line item
    pub fn from_service(service: &Service, quantity: u32) -> Self {
        Self::snapshot(
            service_key(service.id),
            ItemKind::Service,
            &service.name,
            service.price,
            quantity,
            service.description.clone(),
        )
    }

    fn snapshot(
        item_id: String,
        kind: ItemKind,
        name: &str,
        unit_price: Money,
        quantity: u32,
        description: Option<String>,
    ) -> Self {
        Self {
            id: LineItemId::new(),
            item_id,
            kind,
            name: name.to_string(),
            quantity,
            unit_price,
            description,
        }
    }

    /// Price times quantity
    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

fn product_key(id: ProductId) -> String {
    id.as_uuid().to_string()
}

fn service_key(id: ServiceId) -> String {
    id.as_uuid().to_string()
}

/// A payment received against an order. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub date: DateTime<Utc>,
    pub amount: Money,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One entry of an order's append-only status history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub id: StatusChangeId,
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A service order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    /// Unique identifier
    pub id: OrderId,

    /// Human-readable sequential number (e.g. "OS-1001")
    pub number: String,

    /// The client who owns the order
    pub client_id: ClientId,

    /// When the items were dropped off
    pub intake_date: DateTime<Utc>,

    /// When the job is expected to be done
    pub expected_date: DateTime<Utc>,

    /// Payment method chosen when the order was opened
    pub payment_method: PaymentMethod,

    /// Current status
    pub status: OrderStatus,

    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub payments: Vec<Payment>,

    /// Append-only status history; the first entry is always the opening
    #[serde(default)]
    pub history: Vec<StatusChange>,

    /// Sum of line item subtotals
    pub total: Money,

    /// Running sum of payments
    pub paid: Money,

    /// Free-text note about the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceOrder {
    /// Sum of line item subtotals, recomputed from the items
    pub fn items_total(&self) -> Money {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Sum of recorded payments, recomputed from the payments
    pub fn payments_total(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Amount still owed
    pub fn balance_due(&self) -> Money {
        self.total - self.paid
    }

    /// Check whether the order has been handed back
    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }

    /// Not delivered and past its expected date
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_delivered() && self.expected_date < now
    }
}

impl fmt::Display for ServiceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.number, self.status, self.total)
    }
}

/// Data needed to open a service order
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Caller-chosen number; generated when absent or blank
    pub number: Option<String>,
    pub client_id: ClientId,
    pub intake_date: DateTime<Utc>,
    pub expected_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub items: Vec<LineItem>,
    pub note: Option<String>,
}

impl NewOrder {
    /// Sum of the line item subtotals
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Validate the order form, including an optional entry payment
    pub fn validate(&self, initial_payment: Money) -> Result<(), OrderValidationError> {
        if self.items.is_empty() {
            return Err(OrderValidationError::NoItems);
        }
        if self.items.iter().any(|item| item.quantity == 0) {
            return Err(OrderValidationError::ZeroQuantity);
        }
        if initial_payment.is_negative() {
            return Err(OrderValidationError::NonPositivePayment);
        }
        let total = self.total();
        if initial_payment > total {
            return Err(OrderValidationError::PaymentExceedsTotal {
                payment: initial_payment,
                total,
            });
        }
        Ok(())
    }
}

/// Validate a payment amount typed by the user
pub fn validate_payment(amount: Money) -> Result<(), OrderValidationError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(OrderValidationError::NonPositivePayment)
    }
}

/// Validation errors for service orders and payments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    NoItems,
    ZeroQuantity,
    NonPositivePayment,
    PaymentExceedsTotal { payment: Money, total: Money },
}

impl fmt::Display for OrderValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoItems => write!(f, "An order needs at least one item"),
            Self::ZeroQuantity => write!(f, "Item quantity must be at least 1"),
            Self::NonPositivePayment => write!(f, "Payment amount must be greater than zero"),
            Self::PaymentExceedsTotal { payment, total } => write!(
                f,
                "Initial payment ({}) cannot exceed the order total ({})",
                payment, total
            ),
        }
    }
}

impl std::error::Error for OrderValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_items() -> Vec<LineItem> {
        let wash = Service::new("Lavagem Premium", Money::from_cents(8500));
        let laces = Product::new("Cadarço Branco", Money::from_cents(1500), 50);
        vec![
            LineItem::from_service(&wash, 1),
            LineItem::from_product(&laces, 2),
        ]
    }

    fn sample_new_order() -> NewOrder {
        let now = Utc::now();
        NewOrder {
            number: None,
            client_id: ClientId::new(),
            intake_date: now,
            expected_date: now + Duration::days(2),
            payment_method: PaymentMethod::Pix,
            items: sample_items(),
            note: None,
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(OrderStatus::parse("received"), Some(OrderStatus::Received));
        assert_eq!(OrderStatus::parse("Em andamento"), Some(OrderStatus::InProgress));
        assert_eq!(OrderStatus::parse("awaiting-client"), Some(OrderStatus::AwaitingClient));
        assert_eq!(OrderStatus::parse("ENTREGUE"), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::parse("lost"), None);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(PaymentMethod::parse("PIX"), Some(PaymentMethod::Pix));
        assert_eq!(PaymentMethod::parse("dinheiro"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::parse("cartão"), Some(PaymentMethod::Card));
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }

    #[test]
    fn test_line_item_snapshot() {
        let mut laces = Product::new("Cadarço Branco", Money::from_cents(1500), 50);
        let item = LineItem::from_product(&laces, 2);

        laces.price = Money::from_cents(9999);
        laces.name = "Renamed".into();

        assert_eq!(item.unit_price.cents(), 1500);
        assert_eq!(item.name, "Cadarço Branco");
        assert_eq!(item.subtotal().cents(), 3000);
        assert_eq!(item.kind, ItemKind::Product);
    }

    #[test]
    fn test_new_order_total() {
        assert_eq!(sample_new_order().total().cents(), 11500);
    }

    #[test]
    fn test_new_order_validation() {
        let order = sample_new_order();
        assert!(order.validate(Money::zero()).is_ok());
        assert!(order.validate(Money::from_cents(11500)).is_ok());
        assert!(matches!(
            order.validate(Money::from_cents(11501)),
            Err(OrderValidationError::PaymentExceedsTotal { .. })
        ));

        let mut empty = sample_new_order();
        empty.items.clear();
        assert_eq!(empty.validate(Money::zero()), Err(OrderValidationError::NoItems));
    }

    #[test]
    fn test_validate_payment() {
        assert!(validate_payment(Money::from_cents(1)).is_ok());
        assert_eq!(
            validate_payment(Money::zero()),
            Err(OrderValidationError::NonPositivePayment)
        );
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&OrderStatus::AwaitingClient).unwrap();
        assert_eq!(json, "\"awaiting_client\"");
        let method = serde_json::to_string(&PaymentMethod::Pix).unwrap();
        assert_eq!(method, "\"pix\"");
    }
}
