//! One line of the shop's audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to a record
///
/// Shop records are never deleted, so a record is only ever created or
/// changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
}

impl Operation {
    fn label(self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Which collection the record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Client,
    Product,
    Service,
    ServiceOrder,
    CashFlowEntry,
}

impl EntityType {
    fn label(self) -> &'static str {
        match self {
            EntityType::Client => "Client",
            EntityType::Product => "Product",
            EntityType::Service => "Service",
            EntityType::ServiceOrder => "ServiceOrder",
            EntityType::CashFlowEntry => "CashFlowEntry",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// A registered client, a catalog change, an opened order or a payment,
/// as written to `audit.log`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Record UUID
    pub entity_id: String,

    /// Client name, product or service name, order number or ledger description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Changed fields, e.g. `paid: 0 -> 5000`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

fn snapshot<T: Serialize>(record: &T) -> Option<serde_json::Value> {
    serde_json::to_value(record).ok()
}

impl AuditEntry {
    fn stamped(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// A newly saved record, with its full contents as `after`
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        record: &T,
    ) -> Self {
        Self {
            after: snapshot(record),
            ..Self::stamped(Operation::Create, entity_type, entity_id.into(), entity_name)
        }
    }

    /// A changed record, e.g. an order after a payment or a status change
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            before: snapshot(before),
            after: snapshot(after),
            diff_summary,
            ..Self::stamped(Operation::Update, entity_type, entity_id.into(), entity_name)
        }
    }

    /// Whether `key` is this record's id or its name (order number, client name)
    pub fn concerns(&self, key: &str) -> bool {
        let key = key.trim();
        self.entity_id == key
            || self
                .entity_name
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(key))
    }

    /// Terminal line for `shopkeeper audit`, with the changed fields indented below
    pub fn describe(&self) -> String {
        let mut line = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );
        if let Some(name) = &self.entity_name {
            line.push_str(&format!(" ({})", name));
        }
        if let Some(diff) = &self.diff_summary {
            line.push_str(&format!("\n  Changes: {}", diff));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payment_update() -> AuditEntry {
        AuditEntry::update(
            EntityType::ServiceOrder,
            "0b7c6a52-order",
            Some("OS-1001".to_string()),
            &json!({"paid": 0, "payments": []}),
            &json!({"paid": 5000, "payments": [{"amount": 5000, "method": "pix"}]}),
            Some("paid: 0 -> 5000".to_string()),
        )
    }

    #[test]
    fn test_labels() {
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(EntityType::CashFlowEntry.to_string(), "CashFlowEntry");
        assert_eq!(format!("{:<8}|", Operation::Create), "CREATE  |");
    }

    #[test]
    fn test_registered_client_has_no_before() {
        let client = json!({"name": "João Silva", "contact": "(11) 98888-7777", "vip": true});
        let entry = AuditEntry::create(
            EntityType::Client,
            "5f1e-client",
            Some("João Silva".to_string()),
            &client,
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert!(entry.diff_summary.is_none());
        assert_eq!(entry.after, Some(client));
    }

    #[test]
    fn test_payment_keeps_both_snapshots() {
        let entry = payment_update();

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.before.as_ref().unwrap()["paid"], 0);
        assert_eq!(entry.after.as_ref().unwrap()["paid"], 5000);
        assert_eq!(entry.after.as_ref().unwrap()["payments"][0]["method"], "pix");
    }

    #[test]
    fn test_ledger_entry_json_tags() {
        let entry = AuditEntry::create(
            EntityType::CashFlowEntry,
            "9a2d-ledger",
            None,
            &json!({"kind": "revenue", "amount": 5000}),
        );

        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"entity_type\":\"cash_flow_entry\""));
        assert!(line.contains("\"operation\":\"create\""));
        assert!(!line.contains("entity_name"));
        assert!(!line.contains("before"));

        let back: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back.entity_type, EntityType::CashFlowEntry);
        assert_eq!(back.entity_id, "9a2d-ledger");
    }

    #[test]
    fn test_concerns_matches_id_or_order_number() {
        let entry = payment_update();

        assert!(entry.concerns("0b7c6a52-order"));
        assert!(entry.concerns("os-1001"));
        assert!(entry.concerns(" OS-1001 "));
        assert!(!entry.concerns("OS-1002"));
    }

    #[test]
    fn test_describe_payment() {
        let described = payment_update().describe();

        assert!(described.contains("UPDATE ServiceOrder 0b7c6a52-order (OS-1001)"));
        assert!(described.ends_with("\n  Changes: paid: 0 -> 5000"));
    }

    #[test]
    fn test_describe_new_product_without_changes() {
        let entry = AuditEntry::create(
            EntityType::Product,
            "c41f-product",
            Some("Cadarço Branco".to_string()),
            &json!({"stock": 50}),
        );

        let described = entry.describe();
        assert!(described.ends_with("CREATE Product c41f-product (Cadarço Branco)"));
        assert!(!described.contains("Changes"));
    }
}
