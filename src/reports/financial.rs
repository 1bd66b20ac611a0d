//! Financial reports over the cash-flow ledger

use std::collections::BTreeMap;

use crate::config::Settings;
use crate::error::ShopResult;
use crate::models::{CashFlowEntry, EntryKind, Money, PaymentMethod};
use crate::storage::Storage;

/// Revenue, expenses and profit of one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRow {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: Money,
    pub expenses: Money,
    pub profit: Money,
}

/// Ledger grouped by month, oldest month first
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub months: Vec<MonthRow>,
}

impl MonthlyReport {
    /// Generate the report from the whole ledger
    pub fn generate(storage: &Storage) -> ShopResult<Self> {
        Ok(Self::from_entries(&storage.cash_flow.get_all()?))
    }

    /// Group entries by the `YYYY-MM` of their date
    pub fn from_entries(entries: &[CashFlowEntry]) -> Self {
        let mut months: BTreeMap<String, (Money, Money)> = BTreeMap::new();
        for entry in entries {
            let totals = months
                .entry(entry.date.format("%Y-%m").to_string())
                .or_insert((Money::zero(), Money::zero()));
            match entry.kind {
                EntryKind::Revenue => totals.0 += entry.amount,
                EntryKind::Expense => totals.1 += entry.amount,
            }
        }

        Self {
            months: months
                .into_iter()
                .map(|(month, (revenue, expenses))| MonthRow {
                    month,
                    revenue,
                    expenses,
                    profit: revenue - expenses,
                })
                .collect(),
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let symbol = &settings.currency_symbol;
        let mut output = String::new();

        output.push_str("Monthly Financials\n");
        output.push_str(&"=".repeat(70));
        output.push('\n');

        if self.months.is_empty() {
            output.push_str("No cash-flow entries yet.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<10} {:>18} {:>18} {:>18}\n",
            "Month", "Revenue", "Expenses", "Profit"
        ));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        let mut total = (Money::zero(), Money::zero());
        for row in &self.months {
            output.push_str(&format!(
                "{:<10} {:>18} {:>18} {:>18}\n",
                row.month,
                row.revenue.format_with_symbol(symbol),
                row.expenses.format_with_symbol(symbol),
                row.profit.format_with_symbol(symbol)
            ));
            total.0 += row.revenue;
            total.1 += row.expenses;
        }

        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>18} {:>18} {:>18}\n",
            "TOTAL",
            total.0.format_with_symbol(symbol),
            total.1.format_with_symbol(symbol),
            (total.0 - total.1).format_with_symbol(symbol)
        ));

        output
    }
}

/// Revenue received through each payment method
#[derive(Debug, Clone)]
pub struct PaymentMethodReport {
    /// Only methods with a positive total, in `Pix, Cash, Card` order
    pub methods: Vec<(PaymentMethod, Money)>,
}

impl PaymentMethodReport {
    /// Generate the report from the whole ledger
    pub fn generate(storage: &Storage) -> ShopResult<Self> {
        Ok(Self::from_entries(&storage.cash_flow.get_all()?))
    }

    /// Sum revenue entries that record a method
    pub fn from_entries(entries: &[CashFlowEntry]) -> Self {
        let mut totals: BTreeMap<PaymentMethod, Money> = BTreeMap::new();
        for entry in entries.iter().filter(|e| e.kind == EntryKind::Revenue) {
            if let Some(method) = entry.method {
                *totals.entry(method).or_insert(Money::zero()) += entry.amount;
            }
        }

        Self {
            methods: totals
                .into_iter()
                .filter(|(_, total)| total.is_positive())
                .collect(),
        }
    }

    /// Sum across all methods
    pub fn total(&self) -> Money {
        self.methods.iter().map(|(_, total)| *total).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let symbol = &settings.currency_symbol;
        let mut output = String::new();

        output.push_str("Revenue by Payment Method\n");
        output.push_str(&"=".repeat(50));
        output.push('\n');

        if self.methods.is_empty() {
            output.push_str("No revenue recorded with a payment method.\n");
            return output;
        }

        let total = self.total();
        for (method, amount) in &self.methods {
            let share = amount.cents() as f64 / total.cents() as f64 * 100.0;
            output.push_str(&format!(
                "{:<10} {:>18} {:>7.1}%\n",
                method,
                amount.format_with_symbol(symbol),
                share
            ));
        }

        output.push_str(&"-".repeat(50));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>18}\n",
            "TOTAL",
            total.format_with_symbol(symbol)
        ));

        output
    }
}
