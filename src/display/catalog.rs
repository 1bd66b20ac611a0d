//! Catalog display formatting
//!
//! Tables for products and services.

use crate::config::Settings;
use crate::models::{Product, Service};
use crate::reports::sales::truncate;

const DESCRIPTION_WIDTH: usize = 36;

/// Format products as a table, flagging low stock
pub fn format_product_list(products: &[Product], settings: &Settings) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }

    let name_width = products
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let symbol = &settings.currency_symbol;

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>14}  {:>6}  {:<12}  {}\n",
        "Name",
        "Price",
        "Stock",
        "ID",
        "Description",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->14}  {:->6}  {:-<12}  {:-<desc_width$}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        desc_width = DESCRIPTION_WIDTH,
    ));

    for product in products {
        let stock = if product.is_low_stock(settings.low_stock_threshold) {
            format!("{}!", product.stock)
        } else if product.stock == 0 {
            "out".to_string()
        } else {
            product.stock.to_string()
        };

        output.push_str(&format!(
            "{:<name_width$}  {:>14}  {:>6}  {:<12}  {}\n",
            product.name,
            product.price.format_with_symbol(symbol),
            stock,
            product.id.to_string(),
            truncate(product.description.as_deref().unwrap_or(""), DESCRIPTION_WIDTH),
            name_width = name_width,
        ));
    }

    output
}

/// Format services as a table
pub fn format_service_list(services: &[Service], settings: &Settings) -> String {
    if services.is_empty() {
        return "No services found.".to_string();
    }

    let name_width = services
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let symbol = &settings.currency_symbol;

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>14}  {:<12}  {}\n",
        "Name",
        "Price",
        "ID",
        "Description",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->14}  {:-<12}  {:-<desc_width$}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
        desc_width = DESCRIPTION_WIDTH,
    ));

    for service in services {
        output.push_str(&format!(
            "{:<name_width$}  {:>14}  {:<12}  {}\n",
            service.name,
            service.price.format_with_symbol(symbol),
            service.id.to_string(),
            truncate(service.description.as_deref().unwrap_or(""), DESCRIPTION_WIDTH),
            name_width = name_width,
        ));
    }

    output
}
