//! Cash-flow service
//!
//! Manual ledger entries, the ledger view filters and their totals. Entries
//! mirrored from order payments are written by the order service.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::ShopResult;
use crate::models::{CashFlowEntry, CashFlowId, EntryKind, Money, NewCashFlowEntry};
use crate::storage::Storage;

/// Filter options for the ledger view
///
/// Dates are compared on the UTC calendar day of each entry.
#[derive(Debug, Clone, Default)]
pub struct CashFlowFilter {
    pub kind: Option<EntryKind>,
    /// Range start (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Range end (inclusive)
    pub end_date: Option<NaiveDate>,
}

impl CashFlowFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Only entries dated `today`
    pub fn on(self, today: NaiveDate) -> Self {
        self.date_range(Some(today), Some(today))
    }

    /// Filter by date range; either end may be open
    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Check whether an entry passes every set criterion
    pub fn matches(&self, entry: &CashFlowEntry) -> bool {
        let day = entry.date.date_naive();
        self.kind.map_or(true, |k| k == entry.kind)
            && self.start_date.map_or(true, |start| day >= start)
            && self.end_date.map_or(true, |end| day <= end)
    }
}

/// Totals over a set of ledger entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CashFlowSummary {
    pub revenue: Money,
    pub expenses: Money,
    /// Revenue minus expenses
    pub balance: Money,
}

impl CashFlowSummary {
    /// Sum revenue and expenses over `entries`
    pub fn from_entries<'e>(entries: impl IntoIterator<Item = &'e CashFlowEntry>) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry.kind {
                EntryKind::Revenue => summary.revenue += entry.amount,
                EntryKind::Expense => summary.expenses += entry.amount,
            }
        }
        summary.balance = summary.revenue - summary.expenses;
        summary
    }
}

/// Service for the cash-flow ledger
pub struct CashFlowService<'a> {
    storage: &'a Storage,
}

impl<'a> CashFlowService<'a> {
    /// Create a new cash-flow service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Append a free-standing ledger entry
    pub fn add_transaction(&self, input: NewCashFlowEntry) -> ShopResult<CashFlowEntry> {
        let entry = input.into_entry();

        self.storage.cash_flow.push(entry.clone())?;
        self.storage.persist(&self.storage.cash_flow)?;

        self.storage.log_create(
            EntityType::CashFlowEntry,
            entry.id.to_string(),
            Some(entry.description.clone()),
            &entry,
        )?;

        Ok(entry)
    }

    /// Get an entry by ID
    pub fn get(&self, id: CashFlowId) -> ShopResult<Option<CashFlowEntry>> {
        self.storage.cash_flow.get(id)
    }

    /// List entries passing the filter, newest first
    pub fn list(&self, filter: &CashFlowFilter) -> ShopResult<Vec<CashFlowEntry>> {
        let mut entries: Vec<CashFlowEntry> = self
            .storage
            .cash_flow
            .get_all()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    /// Totals over the entries passing the filter
    pub fn summary(&self, filter: &CashFlowFilter) -> ShopResult<CashFlowSummary> {
        Ok(CashFlowSummary::from_entries(&self.list(filter)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShopPaths;
    use crate::models::PaymentMethod;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ShopPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths).unwrap();
        (temp_dir, storage)
    }

    fn entry(kind: EntryKind, category: &str, cents: i64, day: u32) -> NewCashFlowEntry {
        NewCashFlowEntry {
            kind,
            category: category.into(),
            date: Utc.with_ymd_and_hms(2024, 5, day, 15, 0, 0).unwrap(),
            amount: Money::from_cents(cents),
            description: format!("{} dia {}", category, day),
            order_id: None,
            method: None,
        }
    }

    #[test]
    fn test_add_transaction_persists_and_audits() {
        let (temp_dir, storage) = create_test_storage();
        let service = CashFlowService::new(&storage);

        let mut sale = entry(EntryKind::Revenue, "Venda Direta", 3500, 2);
        sale.method = Some(PaymentMethod::Card);
        let created = service.add_transaction(sale).unwrap();

        assert_eq!(service.get(created.id).unwrap(), Some(created.clone()));
        assert!(created.order_id.is_none());
        assert!(temp_dir
            .path()
            .join("data")
            .join("upa_cashflow.json")
            .exists());
        assert_eq!(storage.audit_logger().unwrap().count().unwrap(), 1);
    }

    #[test]
    fn test_list_newest_first_with_totals() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CashFlowService::new(&storage);

        service
            .add_transaction(entry(EntryKind::Expense, "Aluguel", 15000, 1))
            .unwrap();
        service
            .add_transaction(entry(EntryKind::Revenue, "Venda Direta", 20000, 3))
            .unwrap();
        service
            .add_transaction(entry(EntryKind::Expense, "Reparos", 2500, 2))
            .unwrap();

        let all = service.list(&CashFlowFilter::new()).unwrap();
        let categories: Vec<_> = all.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["Venda Direta", "Reparos", "Aluguel"]);

        let summary = service.summary(&CashFlowFilter::new()).unwrap();
        assert_eq!(summary.revenue.cents(), 20000);
        assert_eq!(summary.expenses.cents(), 17500);
        assert_eq!(summary.balance.cents(), 2500);
    }

    #[test]
    fn test_single_day_and_kind_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CashFlowService::new(&storage);

        service
            .add_transaction(entry(EntryKind::Expense, "Aluguel", 15000, 1))
            .unwrap();
        service
            .add_transaction(entry(EntryKind::Revenue, "Venda Direta", 4000, 2))
            .unwrap();
        service
            .add_transaction(entry(EntryKind::Expense, "Marketing", 1000, 2))
            .unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let today = service.summary(&CashFlowFilter::new().on(day)).unwrap();
        assert_eq!(today.revenue.cents(), 4000);
        assert_eq!(today.expenses.cents(), 1000);

        let expenses = service
            .list(&CashFlowFilter::new().kind(EntryKind::Expense))
            .unwrap();
        assert_eq!(expenses.len(), 2);
    }

    #[test]
    fn test_negative_balance() {
        let entries = vec![
            entry(EntryKind::Expense, "Aluguel", 15000, 1).into_entry(),
            entry(EntryKind::Revenue, "Outras Receitas", 5000, 1).into_entry(),
        ];
        let summary = CashFlowSummary::from_entries(&entries);
        assert_eq!(summary.balance.cents(), -10000);
    }
}
