//! Catalog service
//!
//! Products and services share the same lifecycle: added with a generated ID,
//! changed by partial patch, never removed.

use chrono::Utc;

use crate::audit::{diff_records, EntityType};
use crate::error::ShopResult;
use crate::models::{
    Money, Product, ProductId, ProductPatch, Service, ServiceId, ServicePatch,
};
use crate::storage::Storage;

/// Input for adding a product
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock: i64,
}

/// Input for adding a service
#[derive(Debug, Clone)]
pub struct CreateServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
}

/// Service for the product and service catalog
pub struct CatalogService<'a> {
    storage: &'a Storage,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a product to the inventory
    pub fn add_product(&self, input: CreateProductInput) -> ShopResult<Product> {
        let mut product = Product::new(input.name, input.price, input.stock);
        product.description = input.description;

        self.storage.products.push(product.clone())?;
        self.storage.persist(&self.storage.products)?;

        self.storage.log_create(
            EntityType::Product,
            product.id.to_string(),
            Some(product.name.clone()),
            &product,
        )?;

        Ok(product)
    }

    /// Merge a partial update into a product; `None` if the ID is unknown
    pub fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> ShopResult<Option<Product>> {
        let Some(before) = self.storage.products.get(id)? else {
            return Ok(None);
        };

        let updated = self.storage.products.update(id, |product| {
            patch.apply(product);
            product.updated_at = Utc::now();
        })?;
        let Some(product) = updated else {
            return Ok(None);
        };
        self.storage.persist(&self.storage.products)?;

        self.storage.log_update(
            EntityType::Product,
            product.id.to_string(),
            Some(product.name.clone()),
            &before,
            &product,
            diff_records(&before, &product),
        )?;

        Ok(Some(product))
    }

    pub fn get_product(&self, id: ProductId) -> ShopResult<Option<Product>> {
        self.storage.products.get(id)
    }

    /// Find a product by ID or name
    pub fn find_product(&self, identifier: &str) -> ShopResult<Option<Product>> {
        self.storage.products.find(identifier)
    }

    pub fn list_products(&self) -> ShopResult<Vec<Product>> {
        self.storage.products.get_all()
    }

    /// Products whose stock is positive but at or below `threshold`
    pub fn low_stock(&self, threshold: i64) -> ShopResult<Vec<Product>> {
        Ok(self
            .storage
            .products
            .get_all()?
            .into_iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect())
    }

    /// Add a service to the catalog
    pub fn add_service(&self, input: CreateServiceInput) -> ShopResult<Service> {
        let mut service = Service::new(input.name, input.price);
        service.description = input.description;

        self.storage.services.push(service.clone())?;
        self.storage.persist(&self.storage.services)?;

        self.storage.log_create(
            EntityType::Service,
            service.id.to_string(),
            Some(service.name.clone()),
            &service,
        )?;

        Ok(service)
    }

    /// Merge a partial update into a service; `None` if the ID is unknown
    pub fn update_service(
        &self,
        id: ServiceId,
        patch: &ServicePatch,
    ) -> ShopResult<Option<Service>> {
        let Some(before) = self.storage.services.get(id)? else {
            return Ok(None);
        };

        let updated = self.storage.services.update(id, |service| {
            patch.apply(service);
            service.updated_at = Utc::now();
        })?;
        let Some(service) = updated else {
            return Ok(None);
        };
        self.storage.persist(&self.storage.services)?;

        self.storage.log_update(
            EntityType::Service,
            service.id.to_string(),
            Some(service.name.clone()),
            &before,
            &service,
            diff_records(&before, &service),
        )?;

        Ok(Some(service))
    }

    pub fn get_service(&self, id: ServiceId) -> ShopResult<Option<Service>> {
        self.storage.services.get(id)
    }

    /// Find a service by ID or name
    pub fn find_service(&self, identifier: &str) -> ShopResult<Option<Service>> {
        self.storage.services.find(identifier)
    }

    pub fn list_services(&self) -> ShopResult<Vec<Service>> {
        self.storage.services.get_all()
    }
}
