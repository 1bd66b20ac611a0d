//! Client model
//!
//! Represents the shop's customers. Clients are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ClientId;

/// A shop client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: ClientId,

    /// Display name
    pub name: String,

    /// Contact string (usually a phone number)
    pub contact: String,

    /// Whether this is a VIP client
    #[serde(default)]
    pub vip: bool,

    /// Whether the client agreed to receive offers and promotions
    #[serde(default = "default_accepts_offers")]
    pub accepts_offers: bool,

    /// When the client was registered
    pub created_at: DateTime<Utc>,

    /// When the client was last modified
    pub updated_at: DateTime<Utc>,
}

fn default_accepts_offers() -> bool {
    true
}

impl Client {
    /// Create a new client; offers are accepted unless changed later
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ClientId::new(),
            name: name.into(),
            contact: contact.into(),
            vip: false,
            accepts_offers: default_accepts_offers(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the client (name and contact are required)
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.name.trim().is_empty() {
            return Err(ClientValidationError::EmptyName);
        }
        if self.contact.trim().is_empty() {
            return Err(ClientValidationError::EmptyContact);
        }
        Ok(())
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.contact)
    }
}

/// Partial update for a client; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub vip: Option<bool>,
    pub accepts_offers: Option<bool>,
}

impl ClientPatch {
    /// Check whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact.is_none()
            && self.vip.is_none()
            && self.accepts_offers.is_none()
    }

    /// Merge the patch into a client
    pub fn apply(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        if let Some(contact) = &self.contact {
            client.contact = contact.clone();
        }
        if let Some(vip) = self.vip {
            client.vip = vip;
        }
        if let Some(accepts_offers) = self.accepts_offers {
            client.accepts_offers = accepts_offers;
        }
    }
}

/// Validation errors for clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyName,
    EmptyContact,
}

impl fmt::Display for ClientValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Client name is required"),
            Self::EmptyContact => write!(f, "Client contact is required"),
        }
    }
}

impl std::error::Error for ClientValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_defaults() {
        let client = Client::new("João Silva", "(11) 98888-7777");
        assert!(!client.vip);
        assert!(client.accepts_offers);
        assert_eq!(client.created_at, client.updated_at);
    }

    #[test]
    fn test_validation() {
        let mut client = Client::new("Maria", "(11) 97777-6666");
        assert!(client.validate().is_ok());

        client.contact = "  ".into();
        assert_eq!(client.validate(), Err(ClientValidationError::EmptyContact));

        client.name = String::new();
        assert_eq!(client.validate(), Err(ClientValidationError::EmptyName));
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut client = Client::new("Carlos", "(11) 96666-5555");
        let patch = ClientPatch {
            vip: Some(true),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        patch.apply(&mut client);
        assert!(client.vip);
        assert_eq!(client.name, "Carlos");
        assert!(ClientPatch::default().is_empty());
    }

    #[test]
    fn test_accepts_offers_defaults_on_load() {
        let client = Client::new("Ana", "(11) 95555-4444");
        let mut json = serde_json::to_value(&client).unwrap();
        json.as_object_mut().unwrap().remove("accepts_offers");

        let loaded: Client = serde_json::from_value(json).unwrap();
        assert!(loaded.accepts_offers);
    }
}
