//! Append-only audit log state.

use crate::{AppStore, StoreError};
use schola_core::audit::{AuditEntryInput, AuditLogEntry, AuditRecorder};

impl AppStore {
    /// Appends an audit entry, stamping its id and timestamp.
    pub fn record_audit(&self, input: AuditEntryInput) -> Result<AuditLogEntry, StoreError> {
        let entry = AuditRecorder::build_entry(input);
        Self::write(&self.audit_log)?.push(entry.clone());
        Ok(entry)
    }

    /// Queries entries by case-insensitive substring across user, action,
    /// and details. An empty filter returns everything, newest first.
    pub fn audit_entries(&self, filter: &str) -> Result<Vec<AuditLogEntry>, StoreError> {
        let log = Self::read(&self.audit_log)?;
        let mut matched: Vec<AuditLogEntry> = AuditRecorder::query(&log, filter)
            .into_iter()
            .cloned()
            .collect();
        matched.reverse();
        Ok(matched)
    }

    /// Exports the full audit log as CSV.
    pub fn export_audit_csv(&self) -> Result<String, StoreError> {
        let log = Self::read(&self.audit_log)?;
        Ok(AuditRecorder::export_csv(&log)?)
    }
}
