//! Cash-flow ledger model
//!
//! Every movement of money in or out of the shop. Payments on service orders
//! are mirrored here automatically as revenue in the [`ORDER_REVENUE_CATEGORY`]
//! category; everything else is entered by hand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CashFlowId, OrderId};
use super::money::Money;
use super::order::PaymentMethod;

/// Category of the revenue entries mirrored from order payments
pub const ORDER_REVENUE_CATEGORY: &str = "Entrada OS";

/// Suggested revenue categories
pub const REVENUE_CATEGORIES: &[&str] = &[ORDER_REVENUE_CATEGORY, "Venda Direta", "Outras Receitas"];

/// Suggested expense categories
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Aluguel",
    "Salário",
    "Material de Limpeza",
    "Reparos",
    "Marketing",
    "Impostos",
    "Outras Despesas",
];

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money in
    Revenue,
    /// Money out
    Expense,
}

impl EntryKind {
    /// Parse an entry kind from user input (English or Portuguese)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "revenue" | "receita" | "in" => Some(Self::Revenue),
            "expense" | "despesa" | "out" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Suggested categories for this kind
    pub fn suggested_categories(&self) -> &'static [&'static str] {
        match self {
            Self::Revenue => REVENUE_CATEGORIES,
            Self::Expense => EXPENSE_CATEGORIES,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Revenue => f.pad("Revenue"),
            Self::Expense => f.pad("Expense"),
        }
    }
}

/// A ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    /// Unique identifier
    pub id: CashFlowId,

    /// Revenue or expense
    pub kind: EntryKind,

    /// Free-text category (see the suggested lists)
    pub category: String,

    /// When the money moved
    pub date: DateTime<Utc>,

    /// Always positive; the direction comes from `kind`
    pub amount: Money,

    pub description: String,

    /// Order this entry belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
}

impl CashFlowEntry {
    /// Amount with sign applied (expenses negative)
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            EntryKind::Revenue => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

/// Data for a new ledger entry; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewCashFlowEntry {
    pub kind: EntryKind,
    pub category: String,
    pub date: DateTime<Utc>,
    pub amount: Money,
    pub description: String,
    pub order_id: Option<OrderId>,
    pub method: Option<PaymentMethod>,
}

impl NewCashFlowEntry {
    /// Validate the entry form
    pub fn validate(&self) -> Result<(), CashFlowValidationError> {
        if self.category.trim().is_empty() {
            return Err(CashFlowValidationError::EmptyCategory);
        }
        if self.description.trim().is_empty() {
            return Err(CashFlowValidationError::EmptyDescription);
        }
        if !self.amount.is_positive() {
            return Err(CashFlowValidationError::NonPositiveAmount);
        }
        Ok(())
    }

    /// Turn the form into a stored entry
    pub fn into_entry(self) -> CashFlowEntry {
        CashFlowEntry {
            id: CashFlowId::new(),
            kind: self.kind,
            category: self.category,
            date: self.date,
            amount: self.amount,
            description: self.description,
            order_id: self.order_id,
            method: self.method,
        }
    }
}

/// Validation errors for ledger entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CashFlowValidationError {
    EmptyCategory,
    EmptyDescription,
    NonPositiveAmount,
}

impl fmt::Display for CashFlowValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Category is required"),
            Self::EmptyDescription => write!(f, "Description is required"),
            Self::NonPositiveAmount => write!(f, "Amount must be greater than zero"),
        }
    }
}

impl std::error::Error for CashFlowValidationError {}
