//! Demo mode and insights switches
//!
//! Both flags are stored in the key-value store, so they survive restarts
//! and are written even while demo mode is on.

use clap::Subcommand;

use crate::error::ShopResult;
use crate::insights::BusinessSummary;
use crate::storage::Storage;

/// Demo mode subcommands
#[derive(Subcommand)]
pub enum DemoCommands {
    /// Switch to the sample dataset; nothing is saved while it is on
    On,
    /// Return to the saved data
    Off,
    /// Show whether demo mode is on
    Status,
}

/// Insights subcommands
#[derive(Subcommand)]
pub enum InsightsCommands {
    /// Show insights on the dashboard
    On,
    /// Hide insights
    Off,
    /// Print the prompt a text-generation backend would receive
    Prompt,
}

/// Handle a demo mode command
pub fn handle_demo_command(storage: &mut Storage, cmd: DemoCommands) -> ShopResult<()> {
    match cmd {
        DemoCommands::On => {
            storage.set_demo_mode(true)?;
            println!("Demo mode on. Sample data loaded; changes will not be saved.");
        }
        DemoCommands::Off => {
            storage.set_demo_mode(false)?;
            println!("Demo mode off. Saved data restored.");
        }
        DemoCommands::Status => {
            println!(
                "Demo mode: {}",
                if storage.is_demo() { "on" } else { "off" }
            );
        }
    }

    Ok(())
}

/// Handle an insights command
pub fn handle_insights_command(storage: &mut Storage, cmd: InsightsCommands) -> ShopResult<()> {
    match cmd {
        InsightsCommands::On => {
            storage.set_show_insights(true)?;
            println!("Insights enabled.");
        }
        InsightsCommands::Off => {
            storage.set_show_insights(false)?;
            println!("Insights disabled.");
        }
        InsightsCommands::Prompt => {
            let summary = BusinessSummary::from_records(
                &storage.orders.get_all()?,
                &storage.cash_flow.get_all()?,
            );
            println!("{}", summary.prompt());
        }
    }

    Ok(())
}
