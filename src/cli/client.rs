//! Client CLI commands
//!
//! Implements CLI commands for the client registry.

use clap::Subcommand;

use crate::config::Settings;
use crate::contact::whatsapp_link;
use crate::display::client::{format_client_details, format_client_list};
use crate::error::{ShopError, ShopResult};
use crate::models::{Client, ClientPatch};
use crate::services::{ClientFilter, ClientService, CreateClientInput, OrderService};
use crate::storage::Storage;

/// Client subcommands
#[derive(Subcommand)]
pub enum ClientCommands {
    /// Register a new client
    Add {
        /// Client name
        name: String,
        /// Phone or WhatsApp contact
        contact: String,
        /// Mark as VIP
        #[arg(long)]
        vip: bool,
        /// Client does not want promotional messages
        #[arg(long)]
        no_offers: bool,
    },
    /// List clients
    List {
        /// Filter by name (partial match)
        #[arg(short, long)]
        name: Option<String>,
        /// Filter by contact (partial match)
        #[arg(short, long)]
        contact: Option<String>,
        /// Show only VIP clients
        #[arg(long)]
        vip: bool,
        /// Show only clients accepting offers
        #[arg(long)]
        offers: bool,
    },
    /// Show client details
    Show {
        /// Client name or ID
        client: String,
    },
    /// Edit a client
    Edit {
        /// Client name or ID
        client: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New contact
        #[arg(short, long)]
        contact: Option<String>,
        /// Set VIP status
        #[arg(long)]
        vip: Option<bool>,
        /// Set whether the client accepts offers
        #[arg(long)]
        offers: Option<bool>,
    },
    /// Print a WhatsApp link for a client
    Link {
        /// Client name or ID
        client: String,
        /// Reference a service order in the greeting
        #[arg(short, long)]
        order: Option<String>,
        /// Custom message
        #[arg(short, long)]
        message: Option<String>,
    },
}

/// Handle a client command
pub fn handle_client_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ClientCommands,
) -> ShopResult<()> {
    let service = ClientService::new(storage);

    match cmd {
        ClientCommands::Add {
            name,
            contact,
            vip,
            no_offers,
        } => {
            Client::new(name.as_str(), contact.as_str())
                .validate()
                .map_err(|e| ShopError::Validation(e.to_string()))?;

            let client = service.add(CreateClientInput {
                name,
                contact,
                vip,
                accepts_offers: Some(!no_offers),
            })?;

            println!("Registered client: {}", client.name);
            println!("  Contact: {}", client.contact);
            println!("  ID: {}", client.id);
        }

        ClientCommands::List {
            name,
            contact,
            vip,
            offers,
        } => {
            let mut filter = ClientFilter::new();
            if let Some(name) = name {
                filter = filter.name(name);
            }
            if let Some(contact) = contact {
                filter = filter.contact(contact);
            }
            if vip {
                filter = filter.vip_only();
            }
            if offers {
                filter = filter.accepts_offers_only();
            }

            let clients = service.list(&filter)?;
            print!("{}", format_client_list(&clients));
        }

        ClientCommands::Show { client } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| ShopError::client_not_found(&client))?;
            print!("{}", format_client_details(&found, settings));
        }

        ClientCommands::Edit {
            client,
            name,
            contact,
            vip,
            offers,
        } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| ShopError::client_not_found(&client))?;

            let patch = ClientPatch {
                name,
                contact,
                vip,
                accepts_offers: offers,
            };
            if patch.is_empty() {
                println!("No changes specified. Use --name, --contact, --vip or --offers.");
                return Ok(());
            }

            let mut preview = found.clone();
            patch.apply(&mut preview);
            preview
                .validate()
                .map_err(|e| ShopError::Validation(e.to_string()))?;

            let updated = service
                .update(found.id, &patch)?
                .ok_or_else(|| ShopError::client_not_found(&client))?;
            println!("Updated client: {}", updated.name);
        }

        ClientCommands::Link {
            client,
            order,
            message,
        } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| ShopError::client_not_found(&client))?;

            let order_number = match order {
                Some(identifier) => Some(
                    OrderService::new(storage)
                        .find(&identifier)?
                        .ok_or_else(|| ShopError::order_not_found(&identifier))?
                        .number,
                ),
                None => None,
            };

            println!(
                "{}",
                whatsapp_link(&found.contact, message.as_deref(), order_number.as_deref())
            );
        }
    }

    Ok(())
}
