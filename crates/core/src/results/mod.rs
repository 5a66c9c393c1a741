//! Results entry, validation, and the posting/revert workflow.
//!
//! A result row moves NotEntered → Draft → Posted; Posted → Draft happens
//! only as a batch revert addressed by a `PostHistoryItem`.
//!
//! # Modules
//!
//! - `types` - Page configs, result rows, summaries, post history
//! - `validation` - Scheme-based mark and overall-score validation
//! - `error` - Workflow error types
//! - `service` - Entry, posting, and revert transitions

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{FieldError, ResultsError};
pub use service::{EntryAction, PostingBatch, ResultsService, SummaryAction};
pub use types::{
    MarkingScheme, OverallScoreSystem, PostHistoryItem, ResultPageConfig, StudentPageSummary,
    StudentResult,
};
pub use validation::{validate_mark, validate_overall_score, validate_save};
