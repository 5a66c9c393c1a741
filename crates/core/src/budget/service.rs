//! Budget period validation and status derivation.

use chrono::NaiveDate;

use super::error::BudgetPeriodError;
use super::types::{BudgetPeriod, PeriodInput, PeriodStatus};
use schola_shared::types::BudgetPeriodId;

/// Inclusive-inclusive date range overlap test. Touching endpoints count
/// as overlap.
#[must_use]
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Budget period service for validation and construction.
pub struct BudgetPeriodService;

impl BudgetPeriodService {
    /// Validates a period input against the existing periods.
    ///
    /// `editing` excludes the period being updated from the overlap check.
    ///
    /// # Errors
    ///
    /// Returns `NameRequired` for a blank name, `EndNotAfterStart` when
    /// the end date is not strictly after the start date (equal dates are
    /// rejected), and `Overlapping` when the range touches any other
    /// period.
    pub fn validate(
        input: &PeriodInput,
        existing: &[BudgetPeriod],
        editing: Option<BudgetPeriodId>,
    ) -> Result<(), BudgetPeriodError> {
        if input.name.trim().is_empty() {
            return Err(BudgetPeriodError::NameRequired);
        }
        if input.end_date <= input.start_date {
            return Err(BudgetPeriodError::EndNotAfterStart);
        }

        let conflict = existing
            .iter()
            .filter(|p| editing != Some(p.id))
            .find(|p| {
                ranges_overlap(input.start_date, input.end_date, p.start_date, p.end_date)
            });

        match conflict {
            Some(other) => Err(BudgetPeriodError::Overlapping {
                other: other.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Derives the period status from today's date. Callers can never set
    /// the status directly; it is recomputed on every save.
    #[must_use]
    pub fn derive_status(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> PeriodStatus {
        if today >= start && today <= end {
            PeriodStatus::Active
        } else if start > today {
            PeriodStatus::Draft
        } else {
            PeriodStatus::Archived
        }
    }

    /// Validates and constructs a period ready to save.
    pub fn build(
        input: PeriodInput,
        existing: &[BudgetPeriod],
        editing: Option<BudgetPeriodId>,
        today: NaiveDate,
    ) -> Result<BudgetPeriod, BudgetPeriodError> {
        Self::validate(&input, existing, editing)?;

        Ok(BudgetPeriod {
            id: editing.unwrap_or_default(),
            name: input.name.trim().to_string(),
            start_date: input.start_date,
            end_date: input.end_date,
            status: Self::derive_status(input.start_date, input.end_date, today),
            budget_categories: input.budget_categories,
        })
    }

    /// Sorts periods for display: Active first, then by start date
    /// descending among the rest.
    pub fn sort_for_display(periods: &mut [BudgetPeriod]) {
        periods.sort_by(|a, b| {
            let a_active = a.status == PeriodStatus::Active;
            let b_active = b.status == PeriodStatus::Active;
            b_active
                .cmp(&a_active)
                .then(b.start_date.cmp(&a.start_date))
        });
    }
}
