//! Service model
//!
//! A service the shop performs (washing, painting, waterproofing...). Unlike
//! products, services have no stock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ServiceId;
use super::money::Money;
use super::product::CatalogValidationError;

/// A service offered by the shop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier
    pub id: ServiceId,

    /// Service name
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit price
    pub price: Money,

    /// When the service was created
    pub created_at: DateTime<Utc>,

    /// When the service was last modified
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Create a new service
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        let now = Utc::now();
        Self {
            id: ServiceId::new(),
            name: name.into(),
            description: None,
            price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the service
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.name.trim().is_empty() {
            return Err(CatalogValidationError::EmptyName);
        }
        if !self.price.is_positive() {
            return Err(CatalogValidationError::NonPositivePrice);
        }
        Ok(())
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.price)
    }
}

/// Partial update for a service
#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub price: Option<Money>,
}

impl ServicePatch {
    /// Check whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }

    /// Merge the patch into a service
    pub fn apply(&self, service: &mut Service) {
        if let Some(name) = &self.name {
            service.name = name.clone();
        }
        if let Some(description) = &self.description {
            service.description = description.clone();
        }
        if let Some(price) = self.price {
            service.price = price;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_service() {
        let service = Service::new("Lavagem Premium", Money::from_cents(8500));
        assert_eq!(service.name, "Lavagem Premium");
        assert_eq!(service.price.cents(), 8500);
    }

    #[test]
    fn test_validation() {
        let mut service = Service::new("Pintura de Entressola", Money::from_cents(12000));
        assert!(service.validate().is_ok());

        service.price = Money::from_cents(-1);
        assert_eq!(
            service.validate(),
            Err(CatalogValidationError::NonPositivePrice)
        );

        service.name = " ".into();
        assert_eq!(service.validate(), Err(CatalogValidationError::EmptyName));
    }

    #[test]
    fn test_display() {
        let service = Service::new("Troca de Cadarço", Money::from_cents(1500));
        assert_eq!(service.to_string(), "Troca de Cadarço (R$ 15,00)");
    }
}
