//! Fixed keys used in the key-value store

pub const CLIENTS: &str = "upa_clients";
pub const PRODUCTS: &str = "upa_products";
pub const SERVICES: &str = "upa_services";
pub const ORDERS: &str = "upa_orders";
pub const CASH_FLOW: &str = "upa_cashflow";

/// `bool`: seed demo data and never write collections
pub const DEMO_MODE: &str = "upa_useMockData";

/// `bool`: show generated insights on the dashboard
pub const SHOW_INSIGHTS: &str = "upa_showGeminiInsights";
