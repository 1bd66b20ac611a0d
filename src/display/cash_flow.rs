//! Cash-flow display formatting

use crate::config::Settings;
use crate::models::{CashFlowEntry, EntryKind};
use crate::reports::sales::truncate;
use crate::services::CashFlowSummary;

/// Format ledger entries as a register with a totals footer
///
/// Expenses are shown as negative amounts.
pub fn format_cash_flow_list(
    entries: &[CashFlowEntry],
    summary: &CashFlowSummary,
    settings: &Settings,
) -> String {
    let symbol = &settings.currency_symbol;
    let mut output = String::new();

    if entries.is_empty() {
        output.push_str("No cash-flow entries found.\n");
    } else {
        output.push_str(&format!(
            "{:<10}  {:<8}  {:<20}  {:<34}  {:>14}  {:<6}\n",
            "Date", "Kind", "Category", "Description", "Amount", "Method"
        ));
        output.push_str(&format!(
            "{:-<10}  {:-<8}  {:-<20}  {:-<34}  {:->14}  {:-<6}\n",
            "", "", "", "", "", ""
        ));

        for entry in entries {
            output.push_str(&format!(
                "{:<10}  {:<8}  {:<20}  {:<34}  {:>14}  {:<6}\n",
                entry.date.format(&settings.date_format).to_string(),
                entry.kind.to_string(),
                truncate(&entry.category, 20),
                truncate(&entry.description, 34),
                entry.signed_amount().format_with_symbol(symbol),
                entry.method.map(|m| m.to_string()).unwrap_or_default(),
            ));
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "Revenue:  {:>16}\n",
        summary.revenue.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Expenses: {:>16}\n",
        summary.expenses.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Balance:  {:>16}\n",
        summary.balance.format_with_symbol(symbol)
    ));

    output
}

/// Format the suggested categories of both kinds
pub fn format_categories() -> String {
    let mut output = String::new();
    for kind in [EntryKind::Revenue, EntryKind::Expense] {
        output.push_str(&format!("{}\n", kind));
        for category in kind.suggested_categories() {
            output.push_str(&format!("  {}\n", category));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DemoData;
    use chrono::Utc;

    #[test]
    fn test_register_and_footer() {
        let demo = DemoData::build(Utc::now());
        let summary = CashFlowSummary::from_entries(&demo.cash_flow);

        let text = format_cash_flow_list(&demo.cash_flow, &summary, &Settings::default());
        let rent = text.lines().find(|l| l.contains("Aluguel")).unwrap();
        assert!(rent.contains("-R$ 150,00"));
        assert!(text.contains("Balance:"));
        assert!(text.contains("-R$ 5,00"));
    }

    #[test]
    fn test_empty_register_still_totals() {
        let empty: Vec<CashFlowEntry> = Vec::new();
        let summary = CashFlowSummary::from_entries(&empty);
        let text = format_cash_flow_list(&empty, &summary, &Settings::default());
        assert!(text.starts_with("No cash-flow entries found."));
        assert!(text.contains("R$ 0,00"));
    }

    #[test]
    fn test_categories() {
        let text = format_categories();
        assert!(text.starts_with("Revenue\n  Entrada OS\n"));
        assert!(text.contains("Expense\n  Aluguel\n"));
    }
}
