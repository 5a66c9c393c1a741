//! Result entry, posting, and revert state transitions.

use tracing::info;

use crate::{AppStore, StoreError};
use schola_core::results::{
    EntryAction, PostHistoryItem, ResultPageConfig, ResultsError, ResultsService,
    StudentPageSummary, StudentResult, SummaryAction, validate_save,
};
use schola_shared::types::{CourseUnitId, PageConfigId, PostHistoryId, StudentId};

/// What a mark save did to the underlying row.
#[derive(Debug, Clone)]
pub enum EntrySaveOutcome {
    /// The row was created or overwritten.
    Saved(StudentResult),
    /// Empty marks removed the previously-set row.
    Deleted,
    /// Empty marks with no row to remove.
    Unchanged,
}

impl AppStore {
    /// Registers a result page config.
    pub fn add_page_config(&self, config: ResultPageConfig) -> Result<(), StoreError> {
        Self::write(&self.page_configs)?.insert(config.id, config);
        Ok(())
    }

    /// Fetches one page config.
    pub fn page_config(&self, id: PageConfigId) -> Result<ResultPageConfig, StoreError> {
        Self::read(&self.page_configs)?
            .get(&id)
            .cloned()
            .ok_or_else(|| ResultsError::PageNotFound(id).into())
    }

    /// Saves one mark for one (student, course unit) on a page.
    ///
    /// An empty mark deletes the previously-set row; absence is the sole
    /// "not entered" representation. The check-and-apply happens under the
    /// results write lock so a concurrent posting cannot slip between the
    /// posted-row check and the write.
    pub fn save_entry(
        &self,
        page_id: PageConfigId,
        student_id: StudentId,
        course_unit_id: CourseUnitId,
        marks: &str,
    ) -> Result<EntrySaveOutcome, StoreError> {
        let page = self.page_config(page_id)?;
        self.student(student_id)?;

        let mut results = Self::write(&self.results)?;
        let key = (student_id, course_unit_id, page.id);
        let existing = results.get(&key);

        let action =
            ResultsService::prepare_entry(&page, student_id, course_unit_id, marks, existing)
                .map_err(StoreError::Results)?;

        Ok(match action {
            EntryAction::Upsert(row) => {
                results.insert(key, row.clone());
                EntrySaveOutcome::Saved(row)
            }
            EntryAction::Delete(_) => {
                results.remove(&key);
                EntrySaveOutcome::Deleted
            }
            EntryAction::Noop => EntrySaveOutcome::Unchanged,
        })
    }

    /// Saves a whole page edit session for one student: every course-unit
    /// mark plus the optional overall score.
    ///
    /// Validation runs over all fields first; any invalid field rejects
    /// the save wholesale with every violation listed, and no row is
    /// touched. Empty marks delete their rows as usual.
    pub fn save_student_page(
        &self,
        page_id: PageConfigId,
        student_id: StudentId,
        entries: &[(CourseUnitId, String)],
        overall_score: Option<&str>,
    ) -> Result<(), StoreError> {
        let page = self.page_config(page_id)?;
        self.student(student_id)?;

        validate_save(&page, entries, overall_score).map_err(StoreError::Results)?;

        let mut results = Self::write(&self.results)?;

        // resolve every action before applying any, so a locked row aborts
        // the whole save
        let mut actions = Vec::with_capacity(entries.len());
        for (course_unit_id, marks) in entries {
            let key = (student_id, *course_unit_id, page.id);
            let action = ResultsService::prepare_entry(
                &page,
                student_id,
                *course_unit_id,
                marks,
                results.get(&key),
            )
            .map_err(StoreError::Results)?;
            actions.push((key, action));
        }

        for (key, action) in actions {
            match action {
                EntryAction::Upsert(row) => {
                    results.insert(key, row);
                }
                EntryAction::Delete(_) => {
                    results.remove(&key);
                }
                EntryAction::Noop => {}
            }
        }
        drop(results);

        if let Some(score) = overall_score {
            self.save_overall_score(page_id, student_id, score)?;
        }
        Ok(())
    }

    /// Saves the page-level overall score for one student. An empty score
    /// deletes the summary.
    pub fn save_overall_score(
        &self,
        page_id: PageConfigId,
        student_id: StudentId,
        overall_score: &str,
    ) -> Result<Option<StudentPageSummary>, StoreError> {
        let page = self.page_config(page_id)?;
        self.student(student_id)?;

        let mut summaries = Self::write(&self.summaries)?;
        let identity = StudentPageSummary::identity(student_id, page.id);
        let existing = summaries.get(&identity);

        let action =
            ResultsService::prepare_overall_score(&page, student_id, overall_score, existing)
                .map_err(StoreError::Results)?;

        Ok(match action {
            SummaryAction::Upsert(summary) => {
                summaries.insert(identity, summary.clone());
                Some(summary)
            }
            SummaryAction::Delete(id) => {
                summaries.remove(&id);
                None
            }
            SummaryAction::Noop => None,
        })
    }

    /// Reads one result row; `None` means "not entered".
    pub fn result(
        &self,
        student_id: StudentId,
        course_unit_id: CourseUnitId,
        page_id: PageConfigId,
    ) -> Result<Option<StudentResult>, StoreError> {
        Ok(Self::read(&self.results)?
            .get(&(student_id, course_unit_id, page_id))
            .cloned())
    }

    /// Returns all live rows for one page.
    pub fn results_for_page(&self, page_id: PageConfigId) -> Result<Vec<StudentResult>, StoreError> {
        Ok(Self::read(&self.results)?
            .values()
            .filter(|row| row.page_config_id == page_id)
            .cloned()
            .collect())
    }

    /// Reads one page summary.
    pub fn page_summary(
        &self,
        student_id: StudentId,
        page_id: PageConfigId,
    ) -> Result<Option<StudentPageSummary>, StoreError> {
        let identity = StudentPageSummary::identity(student_id, page_id);
        Ok(Self::read(&self.summaries)?.get(&identity).cloned())
    }

    /// Posts the current results of a roster on one page.
    ///
    /// The whole batch commits as a unit under the page's posting lock and
    /// appends exactly one history item; two concurrent posts of the same
    /// page serialize rather than interleave.
    pub fn post_results(
        &self,
        page_id: PageConfigId,
        student_ids: &[StudentId],
    ) -> Result<PostHistoryItem, StoreError> {
        let page = self.page_config(page_id)?;
        let lock = self.page_lock(page_id);
        let _guard = lock.lock().map_err(|_| StoreError::Poisoned)?;

        let roster = {
            let students = Self::read(&self.students)?;
            let mut roster = Vec::with_capacity(student_ids.len());
            for id in student_ids {
                let student = students.get(id).ok_or(StoreError::StudentNotFound(*id))?;
                roster.push((*id, student.name.clone()));
            }
            roster
        };

        let mut results = Self::write(&self.results)?;
        let page_rows: Vec<StudentResult> = results
            .values()
            .filter(|row| row.page_config_id == page_id)
            .cloned()
            .collect();

        let batch = ResultsService::prepare_posting(&page, &roster, &page_rows)
            .map_err(StoreError::Results)?;

        for row in results.values_mut() {
            if batch.result_ids.contains(&row.id) {
                row.is_posted = true;
            }
        }
        drop(results);

        Self::write(&self.post_history)?.push(batch.history.clone());
        info!(
            page_id = %page_id,
            history_id = %batch.history.id,
            count = batch.history.count,
            "Results posted"
        );

        Ok(batch.history)
    }

    /// Reverts a posted batch, flipping the referenced rows back to
    /// unposted. The history item stays in the ledger as the record that
    /// posting and reverting occurred. Returns how many rows were flipped.
    pub fn revert_posting(&self, history_id: PostHistoryId) -> Result<usize, StoreError> {
        let history = Self::read(&self.post_history)?
            .iter()
            .find(|item| item.id == history_id)
            .cloned()
            .ok_or(ResultsError::HistoryNotFound(history_id))?;

        let lock = self.page_lock(history.page_config_id);
        let _guard = lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut results = Self::write(&self.results)?;
        let page_rows: Vec<StudentResult> = results
            .values()
            .filter(|row| row.page_config_id == history.page_config_id)
            .cloned()
            .collect();

        let ids = ResultsService::prepare_revert(&history, &page_rows);
        for row in results.values_mut() {
            if ids.contains(&row.id) {
                row.is_posted = false;
            }
        }

        info!(
            history_id = %history_id,
            reverted = ids.len(),
            "Posting reverted"
        );
        Ok(ids.len())
    }

    /// Returns the posting ledger, newest first.
    pub fn post_history(&self) -> Result<Vec<PostHistoryItem>, StoreError> {
        let mut items = Self::read(&self.post_history)?.clone();
        items.reverse();
        Ok(items)
    }
}
