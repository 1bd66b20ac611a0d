//! Service order service
//!
//! Opening orders, moving them through their statuses and recording payments.
//! A payment always touches two collections: the order itself and the
//! cash-flow ledger, which receives a mirrored revenue entry.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use crate::audit::{diff_records, EntityType};
use crate::error::{ShopError, ShopResult};
use crate::models::order::OPENING_NOTE;
use crate::models::{
    CashFlowEntry, CashFlowId, ClientId, EntryKind, Money, NewOrder, OrderId, OrderStatus,
    Payment, PaymentId, PaymentMethod, ServiceOrder, StatusChange, StatusChangeId,
    ORDER_REVENUE_CATEGORY,
};
use crate::storage::Storage;

use super::client::contains_ignore_case;

/// First number handed out when the caller does not supply one
const FIRST_ORDER_NUMBER: usize = 1001;

/// Filter options for listing orders
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Case-insensitive substring of the client's name
    pub client_name: Option<String>,
    /// Case-insensitive substring of the order number
    pub number: Option<String>,
    /// Intake date range start (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Intake date range end (inclusive)
    pub end_date: Option<NaiveDate>,
}

impl OrderFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Filter by intake date range; either end may be open
    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    fn matches(&self, order: &ServiceOrder, client_names: &HashMap<ClientId, String>) -> bool {
        if self.status.is_some_and(|s| s != order.status) {
            return false;
        }
        if let Some(number) = &self.number {
            if !contains_ignore_case(&order.number, number) {
                return false;
            }
        }
        if let Some(name) = &self.client_name {
            match client_names.get(&order.client_id) {
                Some(client_name) if contains_ignore_case(client_name, name) => {}
                _ => return false,
            }
        }
        let intake = order.intake_date.date_naive();
        if self.start_date.is_some_and(|start| intake < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| intake > end) {
            return false;
        }
        true
    }
}

/// Everything written by a successful [`OrderService::add_payment`]
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    pub order: ServiceOrder,
    pub payment: Payment,
    pub entry: CashFlowEntry,
    /// Set when the payment was saved but its audit entries were not
    pub audit_error: Option<String>,
}

/// Service for service order management
pub struct OrderService<'a> {
    storage: &'a Storage,
}

impl<'a> OrderService<'a> {
    /// Create a new order service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Open a service order
    ///
    /// The number is taken from the input when it is non-blank, otherwise
    /// generated from the current order count. The total is always computed
    /// from the items.
    pub fn create_order(&self, input: NewOrder) -> ShopResult<ServiceOrder> {
        let number = match input.number.as_deref().map(str::trim) {
            Some(number) if !number.is_empty() => number.to_string(),
            _ => format!("OS-{}", self.storage.orders.count()? + FIRST_ORDER_NUMBER),
        };

        let now = Utc::now();
        let id = OrderId::new();
        let total = input.total();
        let order = ServiceOrder {
            id,
            number,
            client_id: input.client_id,
            intake_date: input.intake_date,
            expected_date: input.expected_date,
            payment_method: input.payment_method,
            status: OrderStatus::Received,
            items: input.items,
            payments: Vec::new(),
            history: vec![StatusChange {
                id: StatusChangeId::new(),
                order_id: id,
                status: OrderStatus::Received,
                date: now,
                note: Some(OPENING_NOTE.to_string()),
            }],
            total,
            paid: Money::zero(),
            note: input.note,
            created_at: now,
            updated_at: now,
        };

        self.storage.orders.push(order.clone())?;
        self.storage.persist(&self.storage.orders)?;

        self.storage.log_create(
            EntityType::ServiceOrder,
            order.id.to_string(),
            Some(order.number.clone()),
            &order,
        )?;

        Ok(order)
    }

    /// Set the status and append a history record
    ///
    /// Any transition is allowed, including to the current status.
    pub fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        note: Option<String>,
    ) -> ShopResult<Option<ServiceOrder>> {
        let Some(before) = self.storage.orders.get(id)? else {
            return Ok(None);
        };

        let now = Utc::now();
        let updated = self.storage.orders.update(id, |order| {
            order.status = status;
            order.history.push(StatusChange {
                id: StatusChangeId::new(),
                order_id: id,
                status,
                date: now,
                note,
            });
            order.updated_at = now;
        })?;
        let Some(order) = updated else {
            return Ok(None);
        };
        self.storage.persist(&self.storage.orders)?;

        self.storage.log_update(
            EntityType::ServiceOrder,
            order.id.to_string(),
            Some(order.number.clone()),
            &before,
            &order,
            diff_records(&before, &order),
        )?;

        Ok(Some(order))
    }

    /// Record a payment against an order and mirror it in the ledger
    ///
    /// Both collections change together: if either fails to persist, the
    /// in-memory collections are restored and the error is returned.
    /// Auditing happens after both are saved, so an audit failure does not
    /// fail the payment; it is reported in [`RecordedPayment::audit_error`].
    pub fn add_payment(
        &self,
        id: OrderId,
        amount: Money,
        method: PaymentMethod,
        note: Option<String>,
    ) -> ShopResult<Option<RecordedPayment>> {
        let Some(before) = self.storage.orders.get(id)? else {
            return Ok(None);
        };
        let orders_snapshot = self.storage.orders.get_all()?;
        let ledger_snapshot = self.storage.cash_flow.get_all()?;

        let now = Utc::now();
        let payment = Payment {
            id: PaymentId::new(),
            order_id: id,
            date: now,
            amount,
            method,
            note,
        };
        let entry = CashFlowEntry {
            id: CashFlowId::new(),
            kind: EntryKind::Revenue,
            category: ORDER_REVENUE_CATEGORY.to_string(),
            date: now,
            amount,
            description: format!("Pagamento ref. OS #{}", before.number),
            order_id: Some(id),
            method: Some(method),
        };

        let updated = self.storage.orders.update(id, |order| {
            order.payments.push(payment.clone());
            order.paid += amount;
            order.updated_at = now;
        })?;
        let Some(order) = updated else {
            return Ok(None);
        };
        self.storage.cash_flow.push(entry.clone())?;

        let persisted = self
            .storage
            .persist(&self.storage.orders)
            .and_then(|()| self.storage.persist(&self.storage.cash_flow));
        if let Err(e) = persisted {
            self.storage.orders.replace_all(orders_snapshot)?;
            self.storage.cash_flow.replace_all(ledger_snapshot)?;
            // The orders key may already hold the new payment
            if let Err(restore) = self.storage.persist(&self.storage.orders) {
                return Err(ShopError::Storage(format!(
                    "{}; restoring saved orders also failed: {}",
                    e, restore
                )));
            }
            return Err(e);
        }

        let audited = self
            .storage
            .log_update(
                EntityType::ServiceOrder,
                order.id.to_string(),
                Some(order.number.clone()),
                &before,
                &order,
                diff_records(&before, &order),
            )
            .and_then(|()| {
                self.storage.log_create(
                    EntityType::CashFlowEntry,
                    entry.id.to_string(),
                    Some(entry.description.clone()),
                    &entry,
                )
            });

        Ok(Some(RecordedPayment {
            order,
            payment,
            entry,
            audit_error: audited.err().map(|e| e.to_string()),
        }))
    }

    /// Get an order by ID
    pub fn get(&self, id: OrderId) -> ShopResult<Option<ServiceOrder>> {
        self.storage.orders.get(id)
    }

    /// Find an order by ID or number
    pub fn find(&self, identifier: &str) -> ShopResult<Option<ServiceOrder>> {
        self.storage.orders.find(identifier)
    }

    /// List orders passing the filter, newest intake first
    pub fn list(&self, filter: &OrderFilter) -> ShopResult<Vec<ServiceOrder>> {
        let client_names: HashMap<ClientId, String> = self
            .storage
            .clients
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut orders: Vec<ServiceOrder> = self
            .storage
            .orders
            .get_all()?
            .into_iter()
            .filter(|o| filter.matches(o, &client_names))
            .collect();
        orders.sort_by(|a, b| b.intake_date.cmp(&a.intake_date));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShopPaths;
    use crate::models::{Client, LineItem, Service};
    use crate::storage::{keys, KeyValueStore, MemoryKeyValueStore};
    use chrono::{Duration, TimeZone};
    use std::sync::{Arc, RwLock};
    use tempfile::TempDir;

    /// Memory store whose writes to chosen keys can be made to fail
    struct FlakyStore {
        inner: MemoryKeyValueStore,
        /// Key -> successful writes still allowed before it starts failing
        failing: RwLock<HashMap<&'static str, usize>>,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryKeyValueStore::new(),
                failing: RwLock::new(HashMap::new()),
            }
        }

        fn fail_writes_to(&self, key: &'static str) {
            self.fail_writes_to_after(key, 0);
        }

        fn fail_writes_to_after(&self, key: &'static str, allowed: usize) {
            self.failing.write().unwrap().insert(key, allowed);
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> ShopResult<Option<Vec<u8>>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> ShopResult<()> {
            if let Some(allowed) = self.failing.write().unwrap().get_mut(key) {
                if *allowed == 0 {
                    return Err(ShopError::Storage(format!("disk full writing {}", key)));
                }
                *allowed -= 1;
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> ShopResult<()> {
            self.inner.remove(key)
        }
    }

    fn memory_storage() -> (Arc<MemoryKeyValueStore>, Storage) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let storage = Storage::with_store(kv.clone()).unwrap();
        (kv, storage)
    }

    fn new_order(storage: &Storage) -> NewOrder {
        let client = Client::new("João Silva", "(11) 98888-7777");
        let client_id = client.id;
        storage.clients.push(client).unwrap();

        let service = Service::new("Lavagem Premium", Money::from_cents(8500));
        let now = Utc::now();
        NewOrder {
            number: None,
            client_id,
            intake_date: now,
            expected_date: now + Duration::days(2),
            payment_method: PaymentMethod::Pix,
            items: vec![LineItem::from_service(&service, 2)],
            note: None,
        }
    }

    #[test]
    fn test_create_order_initial_state() {
        let (_kv, storage) = memory_storage();
        let service = OrderService::new(&storage);

        let order = service.create_order(new_order(&storage)).unwrap();

        assert_eq!(order.number, "OS-1001");
        assert_eq!(order.status, OrderStatus::Received);
        assert_eq!(order.history.len(), 1);
        assert_eq!(order.history[0].note.as_deref(), Some(OPENING_NOTE));
        assert!(order.payments.is_empty());
        assert!(order.paid.is_zero());
        assert_eq!(order.total.cents(), 17000);
    }

    #[test]
    fn test_order_numbers_follow_count_unless_given() {
        let (_kv, storage) = memory_storage();
        let service = OrderService::new(&storage);

        service.create_order(new_order(&storage)).unwrap();
        let mut custom = new_order(&storage);
        custom.number = Some("BALCÃO-7".into());
        assert_eq!(service.create_order(custom).unwrap().number, "BALCÃO-7");

        let mut blank = new_order(&storage);
        blank.number = Some("   ".into());
        assert_eq!(service.create_order(blank).unwrap().number, "OS-1003");
    }

    #[test]
    fn test_status_updates_append_history() {
        let (_kv, storage) = memory_storage();
        let service = OrderService::new(&storage);
        let order = service.create_order(new_order(&storage)).unwrap();

        service
            .update_order_status(order.id, OrderStatus::Delivered, None)
            .unwrap();
        let order = service
            .update_order_status(order.id, OrderStatus::InProgress, Some("Retrabalho".into()))
            .unwrap()
            .unwrap();

        let statuses: Vec<_> = order.history.iter().map(|h| h.status).collect();
        assert_eq!(
            statuses,
            vec![OrderStatus::Received, OrderStatus::Delivered, OrderStatus::InProgress]
        );
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.history[2].note.as_deref(), Some("Retrabalho"));
    }

    #[test]
    fn test_payments_accumulate_and_mirror_to_ledger() {
        let (_kv, storage) = memory_storage();
        let service = OrderService::new(&storage);
        let order = service.create_order(new_order(&storage)).unwrap();

        for cents in [5000, 3000, 2500] {
            service
                .add_payment(order.id, Money::from_cents(cents), PaymentMethod::Cash, None)
                .unwrap()
                .unwrap();
        }

        let order = service.get(order.id).unwrap().unwrap();
        assert_eq!(order.paid.cents(), 10500);
        assert_eq!(order.paid, order.payments_total());

        let ledger = storage.cash_flow.get_all().unwrap();
        assert_eq!(ledger.len(), 3);
        for entry in &ledger {
            assert_eq!(entry.kind, EntryKind::Revenue);
            assert_eq!(entry.category, ORDER_REVENUE_CATEGORY);
            assert_eq!(entry.order_id, Some(order.id));
            assert_eq!(entry.description, "Pagamento ref. OS #OS-1001");
        }
    }

    #[test]
    fn test_payment_on_unknown_order_writes_nothing() {
        let (kv, storage) = memory_storage();
        let service = OrderService::new(&storage);
        service.create_order(new_order(&storage)).unwrap();
        let writes = kv.write_count();

        let result = service
            .add_payment(OrderId::new(), Money::from_cents(100), PaymentMethod::Pix, None)
            .unwrap();

        assert!(result.is_none());
        assert_eq!(storage.cash_flow.count().unwrap(), 0);
        assert_eq!(kv.write_count(), writes);
    }

    #[test]
    fn test_failed_ledger_write_rolls_back_payment() {
        let kv = Arc::new(FlakyStore::new());
        let storage = Storage::with_store(kv.clone()).unwrap();
        let service = OrderService::new(&storage);
        let order = service.create_order(new_order(&storage)).unwrap();
        let persisted_orders = kv.get(keys::ORDERS).unwrap();

        kv.fail_writes_to(keys::CASH_FLOW);
        let err = service
            .add_payment(order.id, Money::from_cents(5000), PaymentMethod::Pix, None)
            .unwrap_err();

        assert!(matches!(err, ShopError::Storage(_)));
        let order = service.get(order.id).unwrap().unwrap();
        assert!(order.paid.is_zero());
        assert!(order.payments.is_empty());
        assert_eq!(storage.cash_flow.count().unwrap(), 0);
        assert_eq!(kv.get(keys::ORDERS).unwrap(), persisted_orders);
    }

    #[test]
    fn test_failed_order_write_leaves_ledger_untouched() {
        let kv = Arc::new(FlakyStore::new());
        let storage = Storage::with_store(kv.clone()).unwrap();
        let service = OrderService::new(&storage);
        let order = service.create_order(new_order(&storage)).unwrap();

        kv.fail_writes_to(keys::ORDERS);
        assert!(service
            .add_payment(order.id, Money::from_cents(5000), PaymentMethod::Pix, None)
            .is_err());

        assert!(service.get(order.id).unwrap().unwrap().payments.is_empty());
        assert_eq!(storage.cash_flow.count().unwrap(), 0);
        assert!(kv.get(keys::CASH_FLOW).unwrap().is_none());
    }

    #[test]
    fn test_rollback_reports_when_orders_cannot_be_restored() {
        let kv = Arc::new(FlakyStore::new());
        let storage = Storage::with_store(kv.clone()).unwrap();
        let service = OrderService::new(&storage);
        let order = service.create_order(new_order(&storage)).unwrap();

        // The order write goes through, the ledger write and the restore do not
        kv.fail_writes_to(keys::CASH_FLOW);
        kv.fail_writes_to_after(keys::ORDERS, 1);
        let err = service
            .add_payment(order.id, Money::from_cents(5000), PaymentMethod::Pix, None)
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains(&format!("disk full writing {}", keys::CASH_FLOW)));
        assert!(message.contains("restoring saved orders also failed"));
        assert!(service.get(order.id).unwrap().unwrap().payments.is_empty());
        assert_eq!(storage.cash_flow.count().unwrap(), 0);
    }

    #[test]
    fn test_payment_survives_audit_log_failure() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ShopPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths).unwrap();
        let service = OrderService::new(&storage);
        let order = service.create_order(new_order(&storage)).unwrap();

        // A directory where the log file should be makes every append fail
        std::fs::remove_file(paths.audit_log()).unwrap();
        std::fs::create_dir(paths.audit_log()).unwrap();

        let recorded = service
            .add_payment(order.id, Money::from_cents(5000), PaymentMethod::Cash, None)
            .unwrap()
            .unwrap();

        assert!(recorded.audit_error.is_some());
        assert_eq!(recorded.order.paid.cents(), 5000);

        let reopened = Storage::open(&paths).unwrap();
        assert_eq!(reopened.orders.get(order.id).unwrap().unwrap().paid.cents(), 5000);
        assert_eq!(reopened.cash_flow.count().unwrap(), 1);
    }

    #[test]
    fn test_audited_payment_has_no_audit_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ShopPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths).unwrap();
        let service = OrderService::new(&storage);
        let order = service.create_order(new_order(&storage)).unwrap();

        let recorded = service
            .add_payment(order.id, Money::from_cents(2000), PaymentMethod::Pix, None)
            .unwrap()
            .unwrap();

        assert!(recorded.audit_error.is_none());
        let entries = storage.audit_logger().unwrap().entries().unwrap();
        assert!(entries
            .iter()
            .any(|e| e.entity_type == EntityType::CashFlowEntry));
    }

    #[test]
    fn test_list_filters_and_sorts_newest_first() {
        let (_kv, storage) = memory_storage();
        let service = OrderService::new(&storage);

        let mut older = new_order(&storage);
        older.intake_date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let older = service.create_order(older).unwrap();

        let mut newer = new_order(&storage);
        newer.intake_date = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let newer = service.create_order(newer).unwrap();
        service
            .update_order_status(newer.id, OrderStatus::AwaitingClient, None)
            .unwrap();

        let all = service.list(&OrderFilter::new()).unwrap();
        assert_eq!(all[0].id, newer.id);
        assert_eq!(all[1].id, older.id);

        let waiting = service
            .list(&OrderFilter::new().status(OrderStatus::AwaitingClient))
            .unwrap();
        assert_eq!(waiting.len(), 1);

        let by_client = service.list(&OrderFilter::new().client_name("joão")).unwrap();
        assert_eq!(by_client.len(), 2);

        let by_number = service.list(&OrderFilter::new().number("1001")).unwrap();
        assert_eq!(by_number[0].id, older.id);

        let march_first = NaiveDate::from_ymd_opt(2024, 3, 1);
        let ranged = service
            .list(&OrderFilter::new().date_range(march_first, march_first))
            .unwrap();
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].id, older.id);
    }

    #[test]
    fn test_demo_payments_are_not_persisted() {
        let (kv, mut storage) = memory_storage();
        storage.set_demo_mode(true).unwrap();
        let writes = kv.write_count();
        let service = OrderService::new(&storage);

        let order = service.find("OS-1003").unwrap().unwrap();
        let recorded = service
            .add_payment(order.id, Money::from_cents(1000), PaymentMethod::Cash, None)
            .unwrap()
            .unwrap();

        assert_eq!(recorded.order.paid.cents(), 1000);
        assert_eq!(kv.write_count(), writes);
    }
}
