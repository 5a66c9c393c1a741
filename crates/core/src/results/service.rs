//! Results entry and posting state transitions.
//!
//! Each operation validates a requested transition against the current
//! rows and returns the rows to apply, leaving the actual state mutation
//! to the store so a whole batch commits or fails as a unit.

use chrono::Utc;

use super::error::ResultsError;
use super::types::{
    PostHistoryItem, ResultPageConfig, StudentPageSummary, StudentResult,
};
use super::validation::validate_save;
use schola_shared::types::{CourseUnitId, PostHistoryId, StudentId, StudentResultId};

/// The change a validated entry save resolves to.
#[derive(Debug, Clone)]
pub enum EntryAction {
    /// Create or overwrite the row.
    Upsert(StudentResult),
    /// Empty marks for a previously-set row: delete it. Absence is the
    /// canonical "not entered" representation.
    Delete(StudentResultId),
    /// Empty marks with no existing row: nothing to do.
    Noop,
}

/// The change a validated overall-score save resolves to.
#[derive(Debug, Clone)]
pub enum SummaryAction {
    /// Create or overwrite the summary.
    Upsert(StudentPageSummary),
    /// Empty score for a previously-set summary: delete it.
    Delete(String),
    /// Empty score with no existing summary: nothing to do.
    Noop,
}

/// A validated posting batch: which rows flip to posted, and the single
/// ledger entry recording the action.
#[derive(Debug, Clone)]
pub struct PostingBatch {
    /// Result rows that transition to posted.
    pub result_ids: Vec<StudentResultId>,
    /// The one history item appended for the whole batch.
    pub history: PostHistoryItem,
}

/// Stateless service for results workflow transitions.
pub struct ResultsService;

impl ResultsService {
    /// Validates one mark save and resolves it to an action.
    ///
    /// # Errors
    ///
    /// Returns `PageLocked` for a previous-semester page, `CannotModifyPosted`
    /// for a posted row, `InvalidFields` when the mark fails the page's
    /// scheme.
    pub fn prepare_entry(
        page: &ResultPageConfig,
        student_id: StudentId,
        course_unit_id: CourseUnitId,
        marks: &str,
        existing: Option<&StudentResult>,
    ) -> Result<EntryAction, ResultsError> {
        if page.read_only {
            return Err(ResultsError::PageLocked(page.id));
        }
        if !page.course_unit_ids.contains(&course_unit_id) {
            return Err(ResultsError::CourseUnitNotOnPage(course_unit_id));
        }
        if existing.is_some_and(|row| row.is_posted) {
            return Err(ResultsError::CannotModifyPosted);
        }

        if marks.trim().is_empty() {
            return Ok(match existing {
                Some(row) => EntryAction::Delete(row.id),
                None => EntryAction::Noop,
            });
        }

        validate_save(page, &[(course_unit_id, marks.to_string())], None)?;

        let row = StudentResult {
            id: existing.map_or_else(StudentResultId::new, |row| row.id),
            student_id,
            course_unit_id,
            page_config_id: page.id,
            marks: marks.trim().to_string(),
            is_posted: false,
            updated_at: Utc::now(),
        };
        Ok(EntryAction::Upsert(row))
    }

    /// Validates one overall-score save and resolves it to an action.
    pub fn prepare_overall_score(
        page: &ResultPageConfig,
        student_id: StudentId,
        overall_score: &str,
        existing: Option<&StudentPageSummary>,
    ) -> Result<SummaryAction, ResultsError> {
        if page.read_only {
            return Err(ResultsError::PageLocked(page.id));
        }

        if overall_score.trim().is_empty() {
            return Ok(match existing {
                Some(summary) => SummaryAction::Delete(summary.id.clone()),
                None => SummaryAction::Noop,
            });
        }

        validate_save(page, &[], Some(overall_score))?;

        let summary = StudentPageSummary {
            id: StudentPageSummary::identity(student_id, page.id),
            student_id,
            page_config_id: page.id,
            overall_score: overall_score.trim().to_string(),
            updated_at: Utc::now(),
        };
        Ok(SummaryAction::Upsert(summary))
    }

    /// Validates a posting request for a roster and builds the batch.
    ///
    /// Every then-current unposted row for the roster flips to posted, and
    /// exactly one `PostHistoryItem` records the action with the roster
    /// names and count. A roster with no live unposted rows is rejected
    /// rather than producing an empty ledger entry.
    pub fn prepare_posting(
        page: &ResultPageConfig,
        roster: &[(StudentId, String)],
        page_results: &[StudentResult],
    ) -> Result<PostingBatch, ResultsError> {
        if page.read_only {
            return Err(ResultsError::PageLocked(page.id));
        }
        if roster.is_empty() {
            return Err(ResultsError::NothingToPost);
        }

        let roster_ids: Vec<StudentId> = roster.iter().map(|(id, _)| *id).collect();
        let result_ids: Vec<StudentResultId> = page_results
            .iter()
            .filter(|row| {
                row.page_config_id == page.id
                    && !row.is_posted
                    && roster_ids.contains(&row.student_id)
            })
            .map(|row| row.id)
            .collect();

        if result_ids.is_empty() {
            return Err(ResultsError::NothingToPost);
        }

        let history = PostHistoryItem {
            id: PostHistoryId::new(),
            date: Utc::now(),
            page_config_id: page.id,
            page_name: page.name.clone(),
            students: roster.iter().map(|(_, name)| name.clone()).collect(),
            student_ids: roster_ids,
            count: roster.len(),
        };

        Ok(PostingBatch {
            result_ids,
            history,
        })
    }

    /// Resolves which rows a revert flips back to unposted.
    ///
    /// The history item is retained in the ledger afterwards; reverting
    /// only touches the referenced result rows.
    #[must_use]
    pub fn prepare_revert(
        history: &PostHistoryItem,
        page_results: &[StudentResult],
    ) -> Vec<StudentResultId> {
        page_results
            .iter()
            .filter(|row| {
                row.page_config_id == history.page_config_id
                    && row.is_posted
                    && history.student_ids.contains(&row.student_id)
            })
            .map(|row| row.id)
            .collect()
    }
}
