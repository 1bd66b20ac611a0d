//! Product and service CLI commands

use clap::Subcommand;

use super::{non_blank, parse_money};
use crate::config::Settings;
use crate::display::catalog::{format_product_list, format_service_list};
use crate::error::{ShopError, ShopResult};
use crate::models::{Money, Product, ProductPatch, Service, ServicePatch};
use crate::services::{CatalogService, CreateProductInput, CreateServiceInput};
use crate::storage::Storage;

/// Product subcommands
#[derive(Subcommand)]
pub enum ProductCommands {
    /// Add a product to the inventory
    Add {
        /// Product name
        name: String,
        /// Unit price (e.g., "15,00")
        price: String,
        /// Units in stock
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        stock: i64,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List products
    List,
    /// List products running low on stock
    LowStock {
        /// Stock threshold (defaults to the configured one)
        #[arg(short, long)]
        threshold: Option<i64>,
    },
    /// Edit a product
    Edit {
        /// Product name or ID
        product: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New price
        #[arg(short, long)]
        price: Option<String>,
        /// New stock
        #[arg(short, long, allow_negative_numbers = true)]
        stock: Option<i64>,
        /// New description (empty to clear)
        #[arg(short, long)]
        description: Option<String>,
    },
}

/// Service subcommands
#[derive(Subcommand)]
pub enum ServiceCommands {
    /// Add a service to the catalog
    Add {
        /// Service name
        name: String,
        /// Price (e.g., "85,00")
        price: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List services
    List,
    /// Edit a service
    Edit {
        /// Service name or ID
        service: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New price
        #[arg(short, long)]
        price: Option<String>,
        /// New description (empty to clear)
        #[arg(short, long)]
        description: Option<String>,
    },
}

fn parse_optional_money(input: Option<String>) -> ShopResult<Option<Money>> {
    input.as_deref().map(parse_money).transpose()
}

/// Handle a product command
pub fn handle_product_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ProductCommands,
) -> ShopResult<()> {
    let service = CatalogService::new(storage);

    match cmd {
        ProductCommands::Add {
            name,
            price,
            stock,
            description,
        } => {
            let price = parse_money(&price)?;
            Product::new(name.as_str(), price, stock)
                .validate()
                .map_err(|e| ShopError::Validation(e.to_string()))?;

            let product = service.add_product(CreateProductInput {
                name,
                description: non_blank(description),
                price,
                stock,
            })?;

            println!("Added product: {}", product.name);
            println!("  Price: {}", product.price.format_with_symbol(&settings.currency_symbol));
            println!("  Stock: {}", product.stock);
            println!("  ID: {}", product.id);
        }

        ProductCommands::List => {
            let products = service.list_products()?;
            print!("{}", format_product_list(&products, settings));
        }

        ProductCommands::LowStock { threshold } => {
            let threshold = threshold.unwrap_or(settings.low_stock_threshold);
            let products = service.low_stock(threshold)?;
            if products.is_empty() {
                println!("Stock OK: no product at or below {} units.", threshold);
            } else {
                print!("{}", format_product_list(&products, settings));
            }
        }

        ProductCommands::Edit {
            product,
            name,
            price,
            stock,
            description,
        } => {
            let found = service
                .find_product(&product)?
                .ok_or_else(|| ShopError::product_not_found(&product))?;

            let patch = ProductPatch {
                name,
                description: description.map(|d| non_blank(Some(d))),
                price: parse_optional_money(price)?,
                stock,
            };
            if patch.is_empty() {
                println!("No changes specified. Use --name, --price, --stock or --description.");
                return Ok(());
            }

            let mut preview = found.clone();
            patch.apply(&mut preview);
            preview
                .validate()
                .map_err(|e| ShopError::Validation(e.to_string()))?;

            let updated = service
                .update_product(found.id, &patch)?
                .ok_or_else(|| ShopError::product_not_found(&product))?;
            println!("Updated product: {}", updated.name);
        }
    }

    Ok(())
}

/// Handle a service command
pub fn handle_service_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ServiceCommands,
) -> ShopResult<()> {
    let catalog = CatalogService::new(storage);

    match cmd {
        ServiceCommands::Add {
            name,
            price,
            description,
        } => {
            let price = parse_money(&price)?;
            Service::new(name.as_str(), price)
                .validate()
                .map_err(|e| ShopError::Validation(e.to_string()))?;

            let service = catalog.add_service(CreateServiceInput {
                name,
                description: non_blank(description),
                price,
            })?;

            println!("Added service: {}", service.name);
            println!("  Price: {}", service.price.format_with_symbol(&settings.currency_symbol));
            println!("  ID: {}", service.id);
        }

        ServiceCommands::List => {
            let services = catalog.list_services()?;
            print!("{}", format_service_list(&services, settings));
        }

        ServiceCommands::Edit {
            service,
            name,
            price,
            description,
        } => {
            let found = catalog
                .find_service(&service)?
                .ok_or_else(|| ShopError::service_not_found(&service))?;

            let patch = ServicePatch {
                name,
                description: description.map(|d| non_blank(Some(d))),
                price: parse_optional_money(price)?,
            };
            if patch.is_empty() {
                println!("No changes specified. Use --name, --price or --description.");
                return Ok(());
            }

            let mut preview = found.clone();
            patch.apply(&mut preview);
            preview
                .validate()
                .map_err(|e| ShopError::Validation(e.to_string()))?;

            let updated = catalog
                .update_service(found.id, &patch)?
                .ok_or_else(|| ShopError::service_not_found(&service))?;
            println!("Updated service: {}", updated.name);
        }
    }

    Ok(())
}
