use anyhow::Result;
use clap::{Parser, Subcommand};

use shopkeeper::cli::{
    handle_cashflow_command, handle_client_command, handle_demo_command, handle_insights_command,
    handle_order_command, handle_product_command, handle_report_command, handle_service_command,
};
use shopkeeper::config::{ShopPaths, Settings};
use shopkeeper::storage::Storage;

#[derive(Parser)]
#[command(
    name = "shopkeeper",
    version,
    about = "Service orders, catalog and cash flow for a shoe-repair shop",
    long_about = "Shopkeeper keeps the records of a shoe-repair and cleaning shop: \
                  clients, products and services, service orders with their \
                  payments and status history, and the cash-flow ledger."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Client registry commands
    #[command(subcommand)]
    Client(shopkeeper::cli::ClientCommands),

    /// Product inventory commands
    #[command(subcommand)]
    Product(shopkeeper::cli::ProductCommands),

    /// Service catalog commands
    #[command(subcommand)]
    Service(shopkeeper::cli::ServiceCommands),

    /// Service order commands
    #[command(subcommand, alias = "os")]
    Order(shopkeeper::cli::OrderCommands),

    /// Cash-flow ledger commands
    #[command(subcommand, alias = "cash")]
    Cashflow(shopkeeper::cli::CashflowCommands),

    /// Dashboard and reports
    #[command(subcommand)]
    Report(shopkeeper::cli::ReportCommands),

    /// Turn dashboard insights on or off
    #[command(subcommand)]
    Insights(shopkeeper::cli::InsightsCommands),

    /// Switch between the sample dataset and saved data
    #[command(subcommand)]
    Demo(shopkeeper::cli::DemoCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
        /// Only entries about this record (order number, client name or ID)
        #[arg(short, long)]
        record: Option<String>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = ShopPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Open storage; collections are read once here
    let mut storage = Storage::open(&paths)?;

    match cli.command {
        Some(Commands::Client(cmd)) => handle_client_command(&storage, &settings, cmd)?,
        Some(Commands::Product(cmd)) => handle_product_command(&storage, &settings, cmd)?,
        Some(Commands::Service(cmd)) => handle_service_command(&storage, &settings, cmd)?,
        Some(Commands::Order(cmd)) => handle_order_command(&storage, &settings, cmd)?,
        Some(Commands::Cashflow(cmd)) => handle_cashflow_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Insights(cmd)) => handle_insights_command(&mut storage, cmd)?,
        Some(Commands::Demo(cmd)) => handle_demo_command(&mut storage, cmd)?,
        Some(Commands::Audit { count, record }) => match storage.audit_logger() {
            Some(logger) => {
                let entries = match record.as_deref() {
                    Some(key) => logger.latest_for(key, count)?,
                    None => logger.latest(count)?,
                };
                if entries.is_empty() {
                    println!("No audit entries yet.");
                }
                for entry in entries {
                    println!("{}", entry.describe());
                }
            }
            None => println!("Audit log unavailable."),
        },
        Some(Commands::Config) => {
            let preferences = storage.preferences();
            println!("Shopkeeper Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Date format:         {}", settings.date_format);
            println!("  Low stock threshold: {}", settings.low_stock_threshold);
            println!();
            println!("Preferences:");
            println!("  Demo mode: {}", if preferences.demo_mode { "on" } else { "off" });
            println!("  Insights:  {}", if preferences.show_insights { "on" } else { "off" });
        }
        None => {
            println!("Shopkeeper - service orders and cash flow for a shoe-repair shop");
            println!();
            println!("Run 'shopkeeper --help' for usage information.");
            println!("Run 'shopkeeper report dashboard' for an overview.");
        }
    }

    Ok(())
}
