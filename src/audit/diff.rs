//! Diff generation for audit logging
//!
//! Summarizes what changed between two JSON snapshots of a record. Only
//! top-level fields are compared; collections inside a record (order items,
//! payments, history) are reported by length.

use serde::Serialize;
use serde_json::Value;

use crate::models::Money;

/// Fields holding integer centavos, rendered as currency in diffs
const MONEY_FIELDS: &[&str] = &["price", "total", "paid", "amount", "unit_price"];

/// Fields that change on every mutation and would only add noise
const IGNORED_FIELDS: &[&str] = &["updated_at"];

const MAX_STRING_CHARS: usize = 50;

/// Generate a human-readable diff between two JSON values
///
/// Returns `None` when nothing worth reporting changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                if IGNORED_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_field(key, before_val),
                        format_field(key, after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        key,
                        format_field(key, before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
                    changes.push(format!("{}: (added) -> {}", key, format_field(key, after_val)));
                }
            }

            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ if before != after => Some(format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )),
        _ => None,
    }
}

/// Diff two snapshots of the same record
pub fn diff_records<T: Serialize>(before: &T, after: &T) -> Option<String> {
    let before = serde_json::to_value(before).ok()?;
    let after = serde_json::to_value(after).ok()?;
    generate_diff(&before, &after)
}

fn format_field(key: &str, value: &Value) -> String {
    if MONEY_FIELDS.contains(&key) {
        if let Some(cents) = value.as_i64() {
            return Money::from_cents(cents).to_string();
        }
    }
    format_value(value)
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            // Names and notes are accented; cut on char boundaries
            if s.chars().count() > MAX_STRING_CHARS {
                let head: String = s.chars().take(MAX_STRING_CHARS - 3).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stock_change() {
        let before = json!({"name": "Cadarço Branco", "stock": 50});
        let after = json!({"name": "Cadarço Branco", "stock": 45});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "stock: 50 -> 45");
    }

    #[test]
    fn test_money_fields_render_as_currency() {
        let before = json!({"price": 8500});
        let after = json!({"price": 9000});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "price: R$ 85,00 -> R$ 90,00");
    }

    #[test]
    fn test_updated_at_is_ignored() {
        let before = json!({"vip": false, "updated_at": "2024-01-01T00:00:00Z"});
        let after = json!({"vip": false, "updated_at": "2024-02-01T00:00:00Z"});

        assert!(generate_diff(&before, &after).is_none());
    }

    #[test]
    fn test_field_added_and_removed() {
        let before = json!({"name": "Spray", "description": "Protege contra água"});
        let after = json!({"name": "Spray", "note": "novo"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("description: \"Protege contra água\" -> (removed)"));
        assert!(diff.contains("note: (added) -> \"novo\""));
    }

    #[test]
    fn test_order_collections_summarized() {
        let before = json!({"status": "received", "history": [{}], "paid": 0});
        let after = json!({"status": "in_progress", "history": [{}, {}], "paid": 0});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("status: \"received\" -> \"in_progress\""));
        assert!(diff.contains("history: [1 items] -> [2 items]"));
        assert!(!diff.contains("paid"));
    }

    #[test]
    fn test_long_accented_string_truncation() {
        let long = "ã".repeat(80);
        let diff = generate_diff(&json!({"note": long}), &json!({"note": "ok"})).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(
            generate_diff(&json!(true), &json!(false)),
            Some("true -> false".to_string())
        );
        assert!(generate_diff(&json!(1), &json!(1)).is_none());
    }
}
