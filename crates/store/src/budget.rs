//! Budget period state with commit-time overlap validation.

use chrono::NaiveDate;
use tracing::info;

use crate::{AppStore, StoreError};
use schola_core::budget::{BudgetPeriod, BudgetPeriodError, BudgetPeriodService, PeriodInput};
use schola_shared::types::BudgetPeriodId;

impl AppStore {
    /// Creates or updates a budget period.
    ///
    /// Validation runs inside the write section against the live
    /// collection, so two concurrent saves can never both commit
    /// overlapping ranges off a stale snapshot. Status is derived from
    /// `today`; callers cannot set it.
    pub fn save_budget_period(
        &self,
        input: PeriodInput,
        editing: Option<BudgetPeriodId>,
        today: NaiveDate,
    ) -> Result<BudgetPeriod, StoreError> {
        let mut periods = Self::write(&self.budget_periods)?;

        if let Some(id) = editing {
            if !periods.iter().any(|p| p.id == id) {
                return Err(BudgetPeriodError::NotFound(id).into());
            }
        }

        let period = BudgetPeriodService::build(input, &periods, editing, today)
            .map_err(StoreError::BudgetPeriod)?;

        match editing {
            Some(id) => {
                if let Some(slot) = periods.iter_mut().find(|p| p.id == id) {
                    *slot = period.clone();
                }
            }
            None => periods.push(period.clone()),
        }

        info!(
            period_id = %period.id,
            status = %period.status,
            "Budget period saved"
        );
        Ok(period)
    }

    /// Returns the periods sorted for display: Active first, then by
    /// start date descending.
    pub fn budget_periods(&self) -> Result<Vec<BudgetPeriod>, StoreError> {
        let mut periods = Self::read(&self.budget_periods)?.clone();
        BudgetPeriodService::sort_for_display(&mut periods);
        Ok(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schola_core::budget::PeriodStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(name: &str, start: NaiveDate, end: NaiveDate) -> PeriodInput {
        PeriodInput {
            name: name.to_string(),
            start_date: start,
            end_date: end,
            budget_categories: vec!["Salaries".into()],
        }
    }

    #[test]
    fn test_save_then_overlap_rejected() {
        let store = AppStore::default();
        let today = date(2025, 3, 1);

        let first = store
            .save_budget_period(
                input("H1", date(2025, 1, 1), date(2025, 6, 30)),
                None,
                today,
            )
            .unwrap();
        assert_eq!(first.status, PeriodStatus::Active);

        let err = store
            .save_budget_period(
                input("H2", date(2025, 6, 30), date(2025, 12, 31)),
                None,
                today,
            )
            .unwrap_err();
        assert_eq!(err.status_code(), 409);

        let second = store
            .save_budget_period(
                input("H2", date(2025, 7, 1), date(2025, 12, 31)),
                None,
                today,
            )
            .unwrap();
        assert_eq!(second.status, PeriodStatus::Draft);
    }

    #[test]
    fn test_update_recomputes_status_and_keeps_id() {
        let store = AppStore::default();
        let created = store
            .save_budget_period(
                input("Term", date(2025, 1, 1), date(2025, 3, 31)),
                None,
                date(2025, 2, 1),
            )
            .unwrap();
        assert_eq!(created.status, PeriodStatus::Active);

        let updated = store
            .save_budget_period(
                input("Term", date(2025, 1, 1), date(2025, 3, 31)),
                Some(created.id),
                date(2025, 5, 1),
            )
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, PeriodStatus::Archived);
        assert_eq!(store.budget_periods().unwrap().len(), 1);
    }

    #[test]
    fn test_update_missing_period_not_found() {
        let store = AppStore::default();
        let err = store
            .save_budget_period(
                input("P", date(2025, 1, 1), date(2025, 2, 1)),
                Some(BudgetPeriodId::new()),
                date(2025, 1, 15),
            )
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_concurrent_saves_commit_at_most_one_of_overlapping_pair() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(AppStore::default());
        let today = date(2025, 3, 1);

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store.save_budget_period(
                        input(
                            &format!("Racer {i}"),
                            date(2025, 1, 1),
                            date(2025, 6, 30),
                        ),
                        None,
                        today,
                    )
                })
            })
            .collect();

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let committed = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(committed, 1);
        assert_eq!(store.budget_periods().unwrap().len(), 1);
    }
}
