//! Configuration module for Shopkeeper
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::ShopPaths;
pub use settings::Settings;
