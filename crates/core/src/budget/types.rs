//! Budget period types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use schola_shared::types::BudgetPeriodId;

/// Status of a budget period, derived from its date range and never set
/// directly by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodStatus {
    /// Today falls within the period.
    Active,
    /// The period starts in the future.
    Draft,
    /// The period ended in the past.
    Archived,
}

impl PeriodStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Draft => "Draft",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A budgeting window with category allocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPeriod {
    /// Period ID.
    pub id: BudgetPeriodId,
    /// Period name (e.g., "Term 1 2026").
    pub name: String,
    /// First day of the period, inclusive.
    pub start_date: NaiveDate,
    /// Last day of the period, inclusive.
    pub end_date: NaiveDate,
    /// Derived status; recomputed on every save.
    pub status: PeriodStatus,
    /// Budget category names allocated within the period.
    pub budget_categories: Vec<String>,
}

impl BudgetPeriod {
    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Input for creating or updating a budget period.
#[derive(Debug, Clone, Deserialize)]
pub struct PeriodInput {
    /// Period name.
    pub name: String,
    /// First day, inclusive.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
    /// Budget category names.
    #[serde(default)]
    pub budget_categories: Vec<String>,
}
