//! Clearance status classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::calc::{FinancialSummary, calculate_student_financials, clearance_percentage};
use super::types::{Billing, Bursary, FinancialSettings, Payment, Student};

/// A student's clearance standing.
///
/// `Unset` is the distinguishable gray state for a registrar record with no
/// bursar counterpart: absence of data is not the same as a bad balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearanceStatus {
    /// Fully settled (100% or above).
    Cleared,
    /// Between the probation threshold and 100%.
    Probation,
    /// Below the probation threshold.
    Defaulter,
    /// No financial data: registrar record without a bursar mirror.
    Unset,
}

impl ClearanceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cleared => "cleared",
            Self::Probation => "probation",
            Self::Defaulter => "defaulter",
            Self::Unset => "unset",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cleared" => Some(Self::Cleared),
            "probation" => Some(Self::Probation),
            "defaulter" => Some(Self::Defaulter),
            "unset" => Some(Self::Unset),
            _ => None,
        }
    }
}

impl fmt::Display for ClearanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies an already-computed summary against the configured
/// thresholds.
///
/// Boundary semantics: a percentage exactly at the probation threshold is
/// `Probation`, and exactly 100 is `Cleared`.
#[must_use]
pub fn classify_summary(
    summary: &FinancialSummary,
    settings: &FinancialSettings,
) -> ClearanceStatus {
    if !summary.linked {
        return ClearanceStatus::Unset;
    }

    let pct = clearance_percentage(summary);
    if pct >= Decimal::ONE_HUNDRED {
        ClearanceStatus::Cleared
    } else if pct >= settings.probation_pct {
        ClearanceStatus::Probation
    } else {
        ClearanceStatus::Defaulter
    }
}

/// Determines a student's clearance status from the raw collections.
///
/// A registrar-origin student classifies from its resolved bursar mirror;
/// with no mirror at all the result is `Unset`, never `Defaulter`.
#[must_use]
pub fn determine_student_status(
    student: &Student,
    billings: &[Billing],
    payments: &[Payment],
    bursaries: &[Bursary],
    settings: &FinancialSettings,
    all_students: Option<&[Student]>,
) -> ClearanceStatus {
    let summary =
        calculate_student_financials(student, billings, payments, bursaries, all_students);
    classify_summary(&summary, settings)
}
