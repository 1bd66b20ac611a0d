//! Audit logging
//!
//! Every create and update made through the services is appended to
//! `audit.log` as one JSON line, with before/after snapshots and a short
//! diff for updates. Demo sessions are never audited.
//!
//! ```rust,ignore
//! use shopkeeper::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.append(&AuditEntry::create(
//!     EntityType::Client,
//!     client.id.to_string(),
//!     Some(client.name.clone()),
//!     &client,
//! ))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{diff_records, generate_diff};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
