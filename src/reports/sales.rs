//! Sales rankings
//!
//! Best-selling catalog items and the best-paying client, computed from the
//! service orders.

use std::collections::HashMap;

use crate::config::Settings;
use crate::error::ShopResult;
use crate::models::{Client, ClientId, ItemKind, Money, ServiceOrder};
use crate::storage::Storage;

/// Revenue of one catalog item across every order
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSales {
    pub kind: ItemKind,
    pub item_id: String,
    /// Name on the first line item seen for this catalog entry
    pub name: String,
    pub quantity: u64,
    pub revenue: Money,
}

/// Rank line items by revenue, grouped by catalog entry
///
/// Ties keep the order in which items were first seen.
pub fn rank_items(orders: &[ServiceOrder], limit: usize) -> Vec<ItemSales> {
    let mut ranking: Vec<ItemSales> = Vec::new();
    let mut index: HashMap<(ItemKind, &str), usize> = HashMap::new();

    for item in orders.iter().flat_map(|o| &o.items) {
        let key = (item.kind, item.item_id.as_str());
        match index.get(&key) {
            Some(&i) => {
                ranking[i].quantity += u64::from(item.quantity);
                ranking[i].revenue += item.subtotal();
            }
            None => {
                index.insert(key, ranking.len());
                ranking.push(ItemSales {
                    kind: item.kind,
                    item_id: item.item_id.clone(),
                    name: item.name.clone(),
                    quantity: u64::from(item.quantity),
                    revenue: item.subtotal(),
                });
            }
        }
    }

    ranking.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranking.truncate(limit);
    ranking
}

/// The client who paid the most across all orders
#[derive(Debug, Clone, PartialEq)]
pub struct TopClient {
    pub client: Client,
    pub total_paid: Money,
}

/// Find the client with the greatest positive sum of payments
///
/// Clients are visited in order of their first order; a later client must
/// pay strictly more to take the lead. Returns `None` when nobody has paid
/// anything or the leading client is no longer registered.
pub fn top_client(orders: &[ServiceOrder], clients: &[Client]) -> Option<TopClient> {
    let mut totals: Vec<(ClientId, Money)> = Vec::new();
    for order in orders {
        let paid = order.payments_total();
        match totals.iter_mut().find(|(id, _)| *id == order.client_id) {
            Some((_, total)) => *total += paid,
            None => totals.push((order.client_id, paid)),
        }
    }

    let mut leader: Option<(ClientId, Money)> = None;
    for (id, total) in totals {
        let best = leader.map_or(Money::zero(), |(_, best)| best);
        if total > best {
            leader = Some((id, total));
        }
    }

    let (id, total_paid) = leader?;
    clients
        .iter()
        .find(|c| c.id == id)
        .map(|client| TopClient {
            client: client.clone(),
            total_paid,
        })
}

/// Best sellers report
#[derive(Debug, Clone)]
pub struct TopItemsReport {
    pub items: Vec<ItemSales>,
    /// Revenue of all line items, ranked or not
    pub total_revenue: Money,
}

impl TopItemsReport {
    /// Rank every line item ever sold
    pub fn generate(storage: &Storage, limit: usize) -> ShopResult<Self> {
        let orders = storage.orders.get_all()?;
        Ok(Self {
            total_revenue: orders.iter().map(ServiceOrder::items_total).sum(),
            items: rank_items(&orders, limit),
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let symbol = &settings.currency_symbol;
        let mut output = String::new();

        output.push_str("Best Sellers\n");
        output.push_str(&"=".repeat(70));
        output.push('\n');

        if self.items.is_empty() {
            output.push_str("No items sold yet.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<4} {:<32} {:<8} {:>6} {:>16}\n",
            "#", "Item", "Kind", "Qty", "Revenue"
        ));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for (rank, item) in self.items.iter().enumerate() {
            output.push_str(&format!(
                "{:<4} {:<32} {:<8} {:>6} {:>16}\n",
                rank + 1,
                truncate(&item.name, 32),
                item.kind.to_string(),
                item.quantity,
                item.revenue.format_with_symbol(symbol)
            ));
        }

        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{:<53} {:>16}\n",
            "TOTAL BILLED",
            self.total_revenue.format_with_symbol(symbol)
        ));

        output
    }
}

pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineItem, Payment, PaymentId, PaymentMethod, Product, Service};
    use crate::storage::DemoData;
    use chrono::Utc;

    fn pay(order: &mut ServiceOrder, cents: i64) {
        order.payments.push(Payment {
            id: PaymentId::new(),
            order_id: order.id,
            date: Utc::now(),
            amount: Money::from_cents(cents),
            method: PaymentMethod::Cash,
            note: None,
        });
    }

    #[test]
    fn test_rank_items_groups_by_catalog_entry() {
        let lavagem = Service::new("Lavagem Premium", Money::from_cents(8500));
        let cadarco = Product::new("Cadarço Branco", Money::from_cents(1500), 50);
        let mut demo = DemoData::build(Utc::now()).orders;
        demo.truncate(1);
        let mut order = demo.remove(0);
        order.items = vec![
            LineItem::from_service(&lavagem, 1),
            LineItem::from_product(&cadarco, 3),
            LineItem::from_service(&lavagem, 2),
        ];

        let ranking = rank_items(&[order], 10);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].name, "Lavagem Premium");
        assert_eq!(ranking[0].quantity, 3);
        assert_eq!(ranking[0].revenue.cents(), 25500);
        assert_eq!(ranking[1].revenue.cents(), 4500);

        assert_eq!(rank_items(&[], 3), Vec::new());
    }

    #[test]
    fn test_rank_items_truncates() {
        let demo = DemoData::build(Utc::now());
        let ranking = rank_items(&demo.orders, 3);
        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].name, "Pintura de Entressola");
        assert!(ranking.windows(2).all(|w| w[0].revenue >= w[1].revenue));
    }

    #[test]
    fn test_top_client_uses_payments() {
        let demo = DemoData::build(Utc::now());
        let top = top_client(&demo.orders, &demo.clients).unwrap();

        assert_eq!(top.client.name, "Maria Oliveira");
        assert_eq!(top.total_paid.cents(), 12000);
    }

    #[test]
    fn test_top_client_first_reached_wins_ties() {
        let demo = DemoData::build(Utc::now());
        let mut orders = demo.orders.clone();
        for order in &mut orders {
            order.payments.clear();
        }
        pay(&mut orders[0], 5000);
        pay(&mut orders[1], 5000);

        let top = top_client(&orders, &demo.clients).unwrap();
        assert_eq!(top.client.id, orders[0].client_id);
    }

    #[test]
    fn test_top_client_none_without_payments_or_client() {
        let demo = DemoData::build(Utc::now());
        let mut orders = demo.orders.clone();
        for order in &mut orders {
            order.payments.clear();
        }
        assert!(top_client(&orders, &demo.clients).is_none());
        assert!(top_client(&demo.orders, &[]).is_none());
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Impermeabilização", 10), "Imperme...");
        assert_eq!(truncate("Curto", 10), "Curto");
    }
}
