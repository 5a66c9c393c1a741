//! Audit log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use schola_shared::types::AuditEntryId;

/// One administrative action in the append-only audit trail.
///
/// Entries are never edited or deleted through normal flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Entry ID.
    pub id: AuditEntryId,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
    /// Who performed the action.
    pub user: String,
    /// Short action name (e.g., "Posted Results").
    pub action: String,
    /// Free-text details.
    pub details: String,
}

/// Input for recording an audit entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditEntryInput {
    /// Who performed the action.
    pub user: String,
    /// Short action name.
    pub action: String,
    /// Free-text details.
    pub details: String,
}
