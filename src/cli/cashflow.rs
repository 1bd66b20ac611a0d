//! Cash-flow CLI commands

use chrono::Utc;
use clap::Subcommand;

use super::{non_blank, parse_date, parse_day, parse_method, parse_money};
use crate::config::Settings;
use crate::display::cash_flow::{format_cash_flow_list, format_categories};
use crate::error::{ShopError, ShopResult};
use crate::models::{EntryKind, NewCashFlowEntry};
use crate::services::{CashFlowFilter, CashFlowService};
use crate::storage::Storage;

/// Cash-flow subcommands
#[derive(Subcommand)]
pub enum CashflowCommands {
    /// Record a revenue or expense entry
    Add {
        /// Entry kind (revenue, expense)
        kind: String,
        /// Amount (e.g., "150,00")
        amount: String,
        /// Category (see `cashflow categories`)
        #[arg(short, long)]
        category: String,
        /// Description
        #[arg(short, long)]
        description: String,
        /// Entry date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
        /// Payment method (pix, cash, card)
        #[arg(short, long)]
        method: Option<String>,
    },
    /// List ledger entries with totals
    List {
        /// Only entries dated today
        #[arg(long, conflicts_with_all = ["from", "to"])]
        today: bool,
        /// Entries on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Entries on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only revenue or only expenses
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Show the suggested categories
    Categories,
}

fn parse_kind(input: &str) -> ShopResult<EntryKind> {
    EntryKind::parse(input).ok_or_else(|| {
        ShopError::Validation(format!(
            "Invalid entry kind: '{}'. Valid kinds: revenue, expense",
            input
        ))
    })
}

/// Handle a cash-flow command
pub fn handle_cashflow_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CashflowCommands,
) -> ShopResult<()> {
    let service = CashFlowService::new(storage);

    match cmd {
        CashflowCommands::Add {
            kind,
            amount,
            category,
            description,
            date,
            method,
        } => {
            let input = NewCashFlowEntry {
                kind: parse_kind(&kind)?,
                category,
                date: match date {
                    Some(date) => parse_day(&date)?,
                    None => Utc::now(),
                },
                amount: parse_money(&amount)?,
                description,
                order_id: None,
                method: non_blank(method)
                    .as_deref()
                    .map(parse_method)
                    .transpose()?,
            };
            input
                .validate()
                .map_err(|e| ShopError::Validation(e.to_string()))?;

            let entry = service.add_transaction(input)?;
            println!(
                "Recorded {}: {} ({})",
                entry.kind,
                entry.amount.format_with_symbol(&settings.currency_symbol),
                entry.category
            );
            println!("  ID: {}", entry.id);
        }

        CashflowCommands::List {
            today,
            from,
            to,
            kind,
        } => {
            let mut filter = CashFlowFilter::new();
            if today {
                filter = filter.on(Utc::now().date_naive());
            } else {
                let start = from.as_deref().map(parse_date).transpose()?;
                let end = to.as_deref().map(parse_date).transpose()?;
                filter = filter.date_range(start, end);
            }
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }

            let entries = service.list(&filter)?;
            let summary = service.summary(&filter)?;
            print!("{}", format_cash_flow_list(&entries, &summary, settings));
        }

        CashflowCommands::Categories => {
            print!("{}", format_categories());
        }
    }

    Ok(())
}
