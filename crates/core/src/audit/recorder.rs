//! Audit entry construction, querying, and CSV export.

use chrono::Utc;
use thiserror::Error;

use super::types::{AuditEntryInput, AuditLogEntry};
use schola_shared::types::AuditEntryId;

/// Errors that can occur exporting the audit log.
#[derive(Debug, Error)]
pub enum AuditError {
    /// CSV serialization failure.
    #[error("Export failed: {0}")]
    Export(String),
}

/// Stateless service for the append-only audit ledger.
pub struct AuditRecorder;

impl AuditRecorder {
    /// Builds an entry from an input, stamping the id and timestamp.
    #[must_use]
    pub fn build_entry(input: AuditEntryInput) -> AuditLogEntry {
        AuditLogEntry {
            id: AuditEntryId::new(),
            timestamp: Utc::now(),
            user: input.user,
            action: input.action,
            details: input.details,
        }
    }

    /// Returns true if the entry matches a case-insensitive substring
    /// filter. Any of action, details, or user matching is sufficient.
    #[must_use]
    pub fn matches(entry: &AuditLogEntry, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        entry.action.to_lowercase().contains(&needle)
            || entry.details.to_lowercase().contains(&needle)
            || entry.user.to_lowercase().contains(&needle)
    }

    /// Filters entries by substring match across action, details, and user.
    #[must_use]
    pub fn query<'a>(entries: &'a [AuditLogEntry], filter: &str) -> Vec<&'a AuditLogEntry> {
        entries
            .iter()
            .filter(|entry| Self::matches(entry, filter))
            .collect()
    }

    /// Exports entries as CSV with columns Timestamp, User, Action, Details.
    ///
    /// Literal commas inside fields are replaced with spaces before writing
    /// so a row always splits into exactly four columns.
    pub fn export_csv(entries: &[AuditLogEntry]) -> Result<String, AuditError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(["Timestamp", "User", "Action", "Details"])
            .map_err(|e| AuditError::Export(e.to_string()))?;

        for entry in entries {
            writer
                .write_record([
                    entry.timestamp.to_rfc3339(),
                    strip_commas(&entry.user),
                    strip_commas(&entry.action),
                    strip_commas(&entry.details),
                ])
                .map_err(|e| AuditError::Export(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AuditError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AuditError::Export(e.to_string()))
    }
}

fn strip_commas(field: &str) -> String {
    field.replace(',', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: &str, action: &str, details: &str) -> AuditLogEntry {
        AuditRecorder::build_entry(AuditEntryInput {
            user: user.to_string(),
            action: action.to_string(),
            details: details.to_string(),
        })
    }

    #[test]
    fn test_query_matches_any_field() {
        let entries = vec![
            entry("bursar@school", "Posted Results", "Semester 1"),
            entry("admin@school", "Deleted Payment", "Receipt 42"),
        ];

        assert_eq!(AuditRecorder::query(&entries, "posted").len(), 1);
        assert_eq!(AuditRecorder::query(&entries, "ADMIN").len(), 1);
        assert_eq!(AuditRecorder::query(&entries, "receipt").len(), 1);
        assert_eq!(AuditRecorder::query(&entries, "school").len(), 2);
        assert_eq!(AuditRecorder::query(&entries, "nothing").len(), 0);
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let entries = vec![entry("a", "b", "c")];
        assert_eq!(AuditRecorder::query(&entries, "").len(), 1);
    }

    #[test]
    fn test_export_has_header_and_rows() {
        let entries = vec![entry("bursar", "Posted Results", "3 students")];
        let csv = AuditRecorder::export_csv(&entries).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Timestamp,User,Action,Details");
        let row = lines.next().unwrap();
        assert!(row.contains("Posted Results"));
        assert!(row.contains("3 students"));
    }

    #[test]
    fn test_export_replaces_embedded_commas() {
        let entries = vec![entry("bursar", "Posted", "Jane, John, and Mary")];
        let csv = AuditRecorder::export_csv(&entries).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row.matches(',').count(), 3);
        assert!(row.contains("Jane  John  and Mary"));
    }

    #[test]
    fn test_build_entry_stamps_identity() {
        let a = entry("u", "a", "d");
        let b = entry("u", "a", "d");
        assert_ne!(a.id, b.id);
    }
}
