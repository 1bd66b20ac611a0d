//! Client display formatting
//!
//! Formats clients for terminal output in table and detail views.

use crate::config::Settings;
use crate::models::Client;

/// Format a list of clients as a table
pub fn format_client_list(clients: &[Client]) -> String {
    if clients.is_empty() {
        return "No clients found.".to_string();
    }

    let name_width = clients
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let contact_width = clients
        .iter()
        .map(|c| c.contact.chars().count())
        .max()
        .unwrap_or(7)
        .max(7);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<contact_width$}  {:<3}  {:<6}  {}\n",
        "Name",
        "Contact",
        "VIP",
        "Offers",
        "ID",
        name_width = name_width,
        contact_width = contact_width,
    ));

    output.push_str(&format!(
        "{:-<name_width$}  {:-<contact_width$}  {:-<3}  {:-<6}  {:-<12}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        contact_width = contact_width,
    ));

    for client in clients {
        output.push_str(&format!(
            "{:<name_width$}  {:<contact_width$}  {:<3}  {:<6}  {}\n",
            client.name,
            client.contact,
            if client.vip { "*" } else { "" },
            if client.accepts_offers { "Yes" } else { "No" },
            client.id,
            name_width = name_width,
            contact_width = contact_width,
        ));
    }

    output.push_str(&format!("\n{} client(s)\n", clients.len()));
    output
}

/// Format a single client's details
pub fn format_client_details(client: &Client, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Client: {}\n", client.name));
    output.push_str(&format!("  Contact:        {}\n", client.contact));
    output.push_str(&format!("  ID:             {}\n", client.id));
    output.push_str(&format!(
        "  VIP:            {}\n",
        if client.vip { "Yes" } else { "No" }
    ));
    output.push_str(&format!(
        "  Accepts offers: {}\n",
        if client.accepts_offers { "Yes" } else { "No" }
    ));
    output.push_str(&format!(
        "  Registered:     {}\n",
        client.created_at.format(&settings.date_format)
    ));

    output
}
