//! Product model
//!
//! Products are sold as line items on service orders. Stock is tracked
//! manually and is never decremented by an order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ProductId;
use super::money::Money;

/// A product in the shop's inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit price
    pub price: Money,

    /// Units in stock
    pub stock: i64,

    /// When the product was created
    pub created_at: DateTime<Utc>,

    /// When the product was last modified
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product
    pub fn new(name: impl Into<String>, price: Money, stock: i64) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            name: name.into(),
            description: None,
            price,
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether stock is positive but at or below `threshold`
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock > 0 && self.stock <= threshold
    }

    /// Validate the product
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.name.trim().is_empty() {
            return Err(CatalogValidationError::EmptyName);
        }
        if !self.price.is_positive() {
            return Err(CatalogValidationError::NonPositivePrice);
        }
        if self.stock < 0 {
            return Err(CatalogValidationError::NegativeStock(self.stock));
        }
        Ok(())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.price)
    }
}

/// Partial update for a product
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub price: Option<Money>,
    pub stock: Option<i64>,
}

impl ProductPatch {
    /// Check whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
    }

    /// Merge the patch into a product
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}

/// Validation errors shared by products and services
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValidationError {
    EmptyName,
    NonPositivePrice,
    NegativeStock(i64),
}

impl fmt::Display for CatalogValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name is required"),
            Self::NonPositivePrice => write!(f, "Price must be greater than zero"),
            Self::NegativeStock(stock) => {
                write!(f, "Stock cannot be negative (got {})", stock)
            }
        }
    }
}

impl std::error::Error for CatalogValidationError {}
