//! Demonstration dataset
//!
//! A fixed sample shop used in demo mode. Dates are relative to the moment
//! the data is built so the dashboard always has something current, overdue
//! and delivered to show.

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    CashFlowEntry, CashFlowId, Client, EntryKind, LineItem, Money, OrderId, OrderStatus, Payment,
    PaymentId, PaymentMethod, Product, Service, ServiceOrder, StatusChange, StatusChangeId,
    ORDER_REVENUE_CATEGORY,
};
use crate::models::order::OPENING_NOTE;

/// All five collections of the demo shop
#[derive(Debug, Clone)]
pub struct DemoData {
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
    pub services: Vec<Service>,
    pub orders: Vec<ServiceOrder>,
    pub cash_flow: Vec<CashFlowEntry>,
}

fn client(name: &str, contact: &str, vip: bool, now: DateTime<Utc>) -> Client {
    let mut client = Client::new(name, contact);
    client.vip = vip;
    client.accepts_offers = vip;
    client.created_at = now;
    client.updated_at = now;
    client
}

fn product(name: &str, description: &str, cents: i64, stock: i64, now: DateTime<Utc>) -> Product {
    let mut product = Product::new(name, Money::from_cents(cents), stock);
    product.description = Some(description.to_string());
    product.created_at = now;
    product.updated_at = now;
    product
}

fn service(name: &str, description: &str, cents: i64, now: DateTime<Utc>) -> Service {
    let mut service = Service::new(name, Money::from_cents(cents));
    service.description = Some(description.to_string());
    service.created_at = now;
    service.updated_at = now;
    service
}

fn status_change(
    order_id: OrderId,
    status: OrderStatus,
    date: DateTime<Utc>,
    note: &str,
) -> StatusChange {
    StatusChange {
        id: StatusChangeId::new(),
        order_id,
        status,
        date,
        note: Some(note.to_string()),
    }
}

fn payment(order_id: OrderId, cents: i64, method: PaymentMethod, date: DateTime<Utc>) -> Payment {
    Payment {
        id: PaymentId::new(),
        order_id,
        date,
        amount: Money::from_cents(cents),
        method,
        note: None,
    }
}

fn payment_entry(order: &ServiceOrder, payment: &Payment) -> CashFlowEntry {
    CashFlowEntry {
        id: CashFlowId::new(),
        kind: EntryKind::Revenue,
        category: ORDER_REVENUE_CATEGORY.to_string(),
        date: payment.date,
        amount: payment.amount,
        description: format!("Pagamento ref. OS #{}", order.number),
        order_id: Some(order.id),
        method: Some(payment.method),
    }
}

fn expense(category: &str, description: &str, cents: i64, date: DateTime<Utc>) -> CashFlowEntry {
    CashFlowEntry {
        id: CashFlowId::new(),
        kind: EntryKind::Expense,
        category: category.to_string(),
        date,
        amount: Money::from_cents(cents),
        description: description.to_string(),
        order_id: None,
        method: None,
    }
}

fn order(
    number: &str,
    client: &Client,
    intake: DateTime<Utc>,
    expected: DateTime<Utc>,
    method: PaymentMethod,
    items: Vec<LineItem>,
    note: &str,
) -> ServiceOrder {
    let id = OrderId::new();
    let total = items.iter().map(LineItem::subtotal).sum();
    ServiceOrder {
        id,
        number: number.to_string(),
        client_id: client.id,
        intake_date: intake,
        expected_date: expected,
        payment_method: method,
        status: OrderStatus::Received,
        items,
        payments: Vec::new(),
        history: vec![status_change(id, OrderStatus::Received, intake, OPENING_NOTE)],
        total,
        paid: Money::zero(),
        note: Some(note.to_string()),
        created_at: intake,
        updated_at: intake,
    }
}

fn move_to(order: &mut ServiceOrder, status: OrderStatus, date: DateTime<Utc>, note: &str) {
    order.history.push(status_change(order.id, status, date, note));
    order.status = status;
    order.updated_at = date;
}

fn pay(order: &mut ServiceOrder, cents: i64, date: DateTime<Utc>) {
    let payment = payment(order.id, cents, order.payment_method, date);
    order.paid += payment.amount;
    order.payments.push(payment);
}

impl DemoData {
    /// Build the demo shop as of `now`
    pub fn build(now: DateTime<Utc>) -> Self {
        let days = Duration::days;

        let clients = vec![
            client("João Silva", "(11) 98888-7777", true, now),
            client("Maria Oliveira", "(11) 97777-6666", false, now),
            client("Carlos Souza", "(11) 96666-5555", true, now),
            client("Ana Costa", "(11) 95555-4444", false, now),
        ];

        let products = vec![
            product("Cadarço Branco", "Cadarço de algodão para tênis brancos", 1500, 50, now),
            product("Palmilha de Silicone", "Palmilha anatômica de silicone para conforto extra", 4500, 20, now),
            product("Spray Impermeabilizante", "Protege contra água e manchas", 6000, 30, now),
            product("Escova de Limpeza Premium", "Escova de cerdas macias para limpeza delicada", 3500, 40, now),
        ];

        let services = vec![
            service("Lavagem Premium", "Lavagem completa com hidratação", 8500, now),
            service("Pintura de Entressola", "Restauração da cor original da entressola", 12000, now),
            service("Impermeabilização", "Aplicação de produto impermeabilizante", 4000, now),
            service("Troca de Cadarço", "Substituição de cadarços (par)", 1500, now),
        ];

        let mut first = order(
            "OS-1001",
            &clients[0],
            now - days(5),
            now + days(2),
            PaymentMethod::Pix,
            vec![
                LineItem::from_service(&services[0], 1),
                LineItem::from_product(&products[0], 1),
            ],
            "Tênis branco, modelo casual. Cliente solicitou urgência.",
        );
        pay(&mut first, 5000, now - days(5));
        move_to(&mut first, OrderStatus::InProgress, now - days(4), "Início da lavagem");

        let mut second = order(
            "OS-1002",
            &clients[1],
            now - days(10),
            now - days(3),
            PaymentMethod::Card,
            vec![LineItem::from_service(&services[1], 1)],
            "Entressola de tênis esportivo. Cor preta.",
        );
        pay(&mut second, 12000, now - days(10));
        move_to(&mut second, OrderStatus::InProgress, now - days(8), "Início da pintura");
        move_to(
            &mut second,
            OrderStatus::Delivered,
            now - days(3),
            "Serviço finalizado e entregue",
        );

        let mut third = order(
            "OS-1003",
            &clients[0],
            now - days(2),
            now + days(5),
            PaymentMethod::Cash,
            vec![
                LineItem::from_service(&services[2], 2),
                LineItem::from_product(&products[1], 1),
            ],
            "Cliente ainda não aprovou orçamento para impermeabilização de 2 pares.",
        );
        move_to(
            &mut third,
            OrderStatus::AwaitingClient,
            now - days(1),
            "Aguardando aprovação do orçamento",
        );

        let mut cash_flow = Vec::new();
        for order in [&first, &second] {
            for payment in &order.payments {
                cash_flow.push(payment_entry(order, payment));
            }
        }
        cash_flow.push(expense(
            "Material de Limpeza",
            "Compra de produtos de limpeza",
            2500,
            now - days(7),
        ));
        cash_flow.push(expense("Aluguel", "Aluguel mensal da loja", 15000, now - days(1)));

        Self {
            clients,
            products,
            services,
            orders: vec![first, second, third],
            cash_flow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_sizes() {
        let data = DemoData::build(Utc::now());
        assert_eq!(data.clients.len(), 4);
        assert_eq!(data.products.len(), 4);
        assert_eq!(data.services.len(), 4);
        assert_eq!(data.orders.len(), 3);
        assert_eq!(data.cash_flow.len(), 4);
    }

    #[test]
    fn test_demo_orders_are_consistent() {
        let data = DemoData::build(Utc::now());
        for order in &data.orders {
            assert_eq!(order.total, order.items_total());
            assert_eq!(order.paid, order.payments_total());
            assert_eq!(order.history[0].status, OrderStatus::Received);
            assert_eq!(order.history.last().map(|h| h.status), Some(order.status));
            assert!(order.history.iter().all(|h| h.order_id == order.id));
        }
        assert_eq!(data.orders[0].total.cents(), 10000);
        assert_eq!(data.orders[2].total.cents(), 12500);
    }

    #[test]
    fn test_every_demo_payment_has_a_ledger_entry() {
        let data = DemoData::build(Utc::now());
        for order in &data.orders {
            let mirrored: Money = data
                .cash_flow
                .iter()
                .filter(|e| e.order_id == Some(order.id))
                .map(|e| e.amount)
                .sum();
            assert_eq!(mirrored, order.paid);
        }
    }

    #[test]
    fn test_delivered_order_past_due_is_not_overdue() {
        let now = Utc::now();
        let data = DemoData::build(now);
        assert!(data.orders.iter().all(|o| !o.is_overdue(now)));
        assert!(data.orders[1].expected_date < now);
    }
}
