//! CLI commands for reports
//!
//! The dashboard and the financial and sales reports.

use chrono::Utc;
use clap::Subcommand;

use crate::config::Settings;
use crate::error::ShopResult;
use crate::insights::{load_insights, BusinessSummary, CannedInsights};
use crate::reports::{DashboardReport, MonthlyReport, PaymentMethodReport, TopItemsReport};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// The shop at a glance
    Dashboard,

    /// Revenue, expenses and profit per month
    Monthly,

    /// Revenue per payment method
    #[command(alias = "payment-methods")]
    Methods,

    /// Best-selling products and services
    #[command(alias = "top-items")]
    Items {
        /// How many items to list (defaults to the configured one)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> ShopResult<()> {
    match cmd {
        ReportCommands::Dashboard => handle_dashboard(storage, settings),
        ReportCommands::Monthly => {
            let report = MonthlyReport::generate(storage)?;
            println!("{}", report.format_terminal(settings));
            Ok(())
        }
        ReportCommands::Methods => {
            let report = PaymentMethodReport::generate(storage)?;
            println!("{}", report.format_terminal(settings));
            Ok(())
        }
        ReportCommands::Items { limit } => {
            let limit = limit.unwrap_or(settings.report_top_items);
            let report = TopItemsReport::generate(storage, limit)?;
            println!("{}", report.format_terminal(settings));
            Ok(())
        }
    }
}

/// Print the dashboard, followed by insights when they are enabled
fn handle_dashboard(storage: &Storage, settings: &Settings) -> ShopResult<()> {
    let report = DashboardReport::generate(storage, settings, Utc::now())?;
    print!("{}", report.format_terminal(settings));

    if storage.preferences().show_insights {
        let summary = BusinessSummary::from_records(
            &storage.orders.get_all()?,
            &storage.cash_flow.get_all()?,
        );
        println!("\nInsights");
        for insight in load_insights(&CannedInsights, &summary) {
            println!("  - {}", insight);
        }
    }

    if storage.is_demo() {
        println!("\n(demo mode: changes are not saved)");
    }

    Ok(())
}
