//! Client service
//!
//! Registration, partial updates, lookup and the client list filters.

use chrono::Utc;

use crate::audit::{diff_records, EntityType};
use crate::error::ShopResult;
use crate::models::{Client, ClientId, ClientPatch};
use crate::storage::Storage;

/// Filter options for listing clients
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Case-insensitive substring of the contact
    pub contact: Option<String>,
    pub vip_only: bool,
    pub accepts_offers_only: bool,
}

impl ClientFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn vip_only(mut self) -> Self {
        self.vip_only = true;
        self
    }

    pub fn accepts_offers_only(mut self) -> Self {
        self.accepts_offers_only = true;
        self
    }

    /// Check whether a client passes every set criterion
    pub fn matches(&self, client: &Client) -> bool {
        if let Some(name) = &self.name {
            if !contains_ignore_case(&client.name, name) {
                return false;
            }
        }
        if let Some(contact) = &self.contact {
            if !contains_ignore_case(&client.contact, contact) {
                return false;
            }
        }
        (!self.vip_only || client.vip) && (!self.accepts_offers_only || client.accepts_offers)
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Input for registering a client
#[derive(Debug, Clone)]
pub struct CreateClientInput {
    pub name: String,
    pub contact: String,
    pub vip: bool,
    /// Defaults to `true` when not given
    pub accepts_offers: Option<bool>,
}

/// Service for client management
pub struct ClientService<'a> {
    storage: &'a Storage,
}

impl<'a> ClientService<'a> {
    /// Create a new client service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a client
    pub fn add(&self, input: CreateClientInput) -> ShopResult<Client> {
        let mut client = Client::new(input.name, input.contact);
        client.vip = input.vip;
        if let Some(accepts_offers) = input.accepts_offers {
            client.accepts_offers = accepts_offers;
        }

        self.storage.clients.push(client.clone())?;
        self.storage.persist(&self.storage.clients)?;

        self.storage.log_create(
            EntityType::Client,
            client.id.to_string(),
            Some(client.name.clone()),
            &client,
        )?;

        Ok(client)
    }

    /// Merge a partial update into a client
    ///
    /// Returns `None`, writing nothing, when no client has this ID.
    pub fn update(&self, id: ClientId, patch: &ClientPatch) -> ShopResult<Option<Client>> {
        let Some(before) = self.storage.clients.get(id)? else {
            return Ok(None);
        };

        let updated = self.storage.clients.update(id, |client| {
            patch.apply(client);
            client.updated_at = Utc::now();
        })?;
        let Some(client) = updated else {
            return Ok(None);
        };
        self.storage.persist(&self.storage.clients)?;

        self.storage.log_update(
            EntityType::Client,
            client.id.to_string(),
            Some(client.name.clone()),
            &before,
            &client,
            diff_records(&before, &client),
        )?;

        Ok(Some(client))
    }

    /// Get a client by ID
    pub fn get(&self, id: ClientId) -> ShopResult<Option<Client>> {
        self.storage.clients.get(id)
    }

    /// Find a client by ID or name
    pub fn find(&self, identifier: &str) -> ShopResult<Option<Client>> {
        self.storage.clients.find(identifier)
    }

    /// List clients passing the filter, in registration order
    pub fn list(&self, filter: &ClientFilter) -> ShopResult<Vec<Client>> {
        Ok(self
            .storage
            .clients
            .get_all()?
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect())
    }
}
