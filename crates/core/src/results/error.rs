//! Results workflow error types.

use serde::Serialize;
use thiserror::Error;

use schola_shared::types::{CourseUnitId, PageConfigId, PostHistoryId, StudentId};

/// One rejected field in a wholesale save rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Which field was invalid (course unit id or "overall_score").
    pub field: String,
    /// Why it was rejected.
    pub message: String,
}

/// Errors that can occur during results entry, posting, and reverting.
#[derive(Debug, Error)]
pub enum ResultsError {
    /// One or more fields failed scheme validation. The whole save is
    /// rejected; every invalid field is listed.
    #[error("Invalid fields: {}", format_fields(.fields))]
    InvalidFields {
        /// All rejected fields.
        fields: Vec<FieldError>,
    },

    /// The page belongs to a previous semester and is locked absolutely.
    #[error("Result page {0} is read-only")]
    PageLocked(PageConfigId),

    /// Attempted to modify a posted result row.
    #[error("Cannot modify posted result")]
    CannotModifyPosted,

    /// Page config not found.
    #[error("Result page {0} not found")]
    PageNotFound(PageConfigId),

    /// Student not found.
    #[error("Student {0} not found")]
    StudentNotFound(StudentId),

    /// Course unit is not graded on this page.
    #[error("Course unit {0} is not on this result page")]
    CourseUnitNotOnPage(CourseUnitId),

    /// Posting a roster with no live result rows.
    #[error("No results to post for the selected students")]
    NothingToPost,

    /// Post history entry not found.
    #[error("Post history entry {0} not found")]
    HistoryNotFound(PostHistoryId),

    /// Concurrent posting or reverting of the same page.
    #[error("Concurrent modification of result page: {0}")]
    Conflict(String),

    /// Storage write failure.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{} ({})", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ResultsError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidFields { .. }
            | Self::PageLocked(_)
            | Self::CannotModifyPosted
            | Self::CourseUnitNotOnPage(_)
            | Self::NothingToPost => 400,

            Self::PageNotFound(_) | Self::StudentNotFound(_) | Self::HistoryNotFound(_) => 404,

            Self::Conflict(_) => 409,

            Self::Persistence(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidFields { .. } => "INVALID_FIELDS",
            Self::PageLocked(_) => "PAGE_LOCKED",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::PageNotFound(_) => "PAGE_NOT_FOUND",
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::CourseUnitNotOnPage(_) => "COURSE_UNIT_NOT_ON_PAGE",
            Self::NothingToPost => "NOTHING_TO_POST",
            Self::HistoryNotFound(_) => "HISTORY_NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_fields_lists_every_field() {
        let err = ResultsError::InvalidFields {
            fields: vec![
                FieldError {
                    field: "cu-1".into(),
                    message: "must be between 0 and 100".into(),
                },
                FieldError {
                    field: "overall_score".into(),
                    message: "must be between 0.0 and 5.0".into(),
                },
            ],
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_FIELDS");
        let text = err.to_string();
        assert!(text.contains("cu-1"));
        assert!(text.contains("overall_score"));
    }

    #[test]
    fn test_lock_errors_are_bad_request() {
        assert_eq!(ResultsError::CannotModifyPosted.status_code(), 400);
        assert_eq!(
            ResultsError::PageLocked(PageConfigId::new()).status_code(),
            400
        );
    }

    #[test]
    fn test_not_found_errors() {
        assert_eq!(
            ResultsError::HistoryNotFound(PostHistoryId::new()).status_code(),
            404
        );
        assert_eq!(
            ResultsError::PageNotFound(PageConfigId::new()).error_code(),
            "PAGE_NOT_FOUND"
        );
    }

    #[test]
    fn test_conflict_is_409() {
        assert_eq!(
            ResultsError::Conflict("another bursar is posting".into()).status_code(),
            409
        );
    }
}
