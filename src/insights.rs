//! Business insights
//!
//! A short summary of the shop's numbers and the prompt a text-generation
//! backend would answer with three strategic suggestions. No backend is
//! bundled: [`CannedInsights`] answers with fixed suggestions, and any
//! provider's failure degrades to a fixed error line instead of an error.

use crate::error::ShopResult;
use crate::models::{CashFlowEntry, EntryKind, Money, OrderStatus, ServiceOrder};

/// Suggestions shown when a provider answers with nothing
pub const CANNED_INSIGHTS: [&str; 3] = [
    "Mantenha o controle do seu estoque para não perder vendas.",
    "Considere promoções para pagamentos via PIX.",
    "Foque em finalizar as OS em atraso.",
];

/// Single suggestion shown when a provider fails
pub const INSIGHTS_UNAVAILABLE: &str = "Erro ao carregar insights inteligentes.";

/// Aggregate numbers handed to an insight provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessSummary {
    pub total_orders: usize,
    /// Orders not yet delivered
    pub active_orders: usize,
    pub revenue: Money,
    pub expenses: Money,
    /// Count per status, only statuses that occur
    pub status_counts: Vec<(OrderStatus, usize)>,
}

impl BusinessSummary {
    /// Summarize the orders and the ledger
    pub fn from_records(orders: &[ServiceOrder], ledger: &[CashFlowEntry]) -> Self {
        let sum_kind = |kind: EntryKind| -> Money {
            ledger
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| e.amount)
                .sum()
        };

        Self {
            total_orders: orders.len(),
            active_orders: orders.iter().filter(|o| !o.is_delivered()).count(),
            revenue: sum_kind(EntryKind::Revenue),
            expenses: sum_kind(EntryKind::Expense),
            status_counts: OrderStatus::all()
                .into_iter()
                .map(|status| (status, orders.iter().filter(|o| o.status == status).count()))
                .filter(|(_, count)| *count > 0)
                .collect(),
        }
    }

    /// The prompt sent to a text-generation backend
    pub fn prompt(&self) -> String {
        let statuses = self
            .status_counts
            .iter()
            .map(|(status, count)| format!("{}: {}", status, count))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Analise os seguintes dados de uma sapataria e forneça 3 insights estratégicos \
             curtos (máximo 2 frases cada) para o dono do negócio.\n\
             Dados Atuais:\n\
             - Total de OS: {}\n\
             - OS Ativas: {}\n\
             - Receita Total: {}\n\
             - Despesas Totais: {}\n\
             - Status: {}\n\n\
             Foque em lucratividade, fluxo de caixa ou retenção de clientes.",
            self.total_orders, self.active_orders, self.revenue, self.expenses, statuses
        )
    }
}

/// Something that turns a summary into short suggestions
pub trait InsightProvider {
    fn generate(&self, summary: &BusinessSummary) -> ShopResult<Vec<String>>;
}

/// Provider that always answers with [`CANNED_INSIGHTS`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedInsights;

impl InsightProvider for CannedInsights {
    fn generate(&self, _summary: &BusinessSummary) -> ShopResult<Vec<String>> {
        Ok(canned())
    }
}

fn canned() -> Vec<String> {
    CANNED_INSIGHTS.iter().map(|s| s.to_string()).collect()
}

/// Ask `provider` for insights, never failing
///
/// An empty answer falls back to the canned suggestions and an error to the
/// single unavailable line.
pub fn load_insights(provider: &dyn InsightProvider, summary: &BusinessSummary) -> Vec<String> {
    match provider.generate(summary) {
        Ok(insights) if insights.iter().any(|s| !s.trim().is_empty()) => insights,
        Ok(_) => canned(),
        Err(_) => vec![INSIGHTS_UNAVAILABLE.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShopError;
    use crate::storage::DemoData;
    use chrono::Utc;

    struct Failing;

    impl InsightProvider for Failing {
        fn generate(&self, _summary: &BusinessSummary) -> ShopResult<Vec<String>> {
            Err(ShopError::Insights("timeout".into()))
        }
    }

    struct Silent;

    impl InsightProvider for Silent {
        fn generate(&self, _summary: &BusinessSummary) -> ShopResult<Vec<String>> {
            Ok(vec![String::new()])
        }
    }

    fn demo_summary() -> BusinessSummary {
        let demo = DemoData::build(Utc::now());
        BusinessSummary::from_records(&demo.orders, &demo.cash_flow)
    }

    #[test]
    fn test_summary_of_demo_shop() {
        let summary = demo_summary();
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.active_orders, 2);
        assert_eq!(summary.revenue.cents(), 17000);
        assert_eq!(summary.expenses.cents(), 17500);
        assert_eq!(
            summary.status_counts,
            vec![
                (OrderStatus::InProgress, 1),
                (OrderStatus::AwaitingClient, 1),
                (OrderStatus::Delivered, 1),
            ]
        );
    }

    #[test]
    fn test_prompt_carries_the_numbers() {
        let prompt = demo_summary().prompt();
        assert!(prompt.contains("Total de OS: 3"));
        assert!(prompt.contains("OS Ativas: 2"));
        assert!(prompt.contains("Receita Total: R$ 170,00"));
        assert!(prompt.contains("Delivered: 1"));
    }

    #[test]
    fn test_fallbacks() {
        let summary = demo_summary();
        assert_eq!(load_insights(&CannedInsights, &summary).len(), 3);
        assert_eq!(load_insights(&Silent, &summary), canned());
        assert_eq!(
            load_insights(&Failing, &summary),
            vec![INSIGHTS_UNAVAILABLE.to_string()]
        );
    }
}
