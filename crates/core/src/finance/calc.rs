//! Fee clearance calculation.
//!
//! Pure functions over the billing, payment, and bursary collections.
//! Callers pass the full collections; filtering happens here so that a
//! registrar-origin record can delegate to its bursar-origin mirror.

use rust_decimal::Decimal;

use super::types::{Billing, Bursary, Payment, Student, StudentOrigin};

/// Computed financial position for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FinancialSummary {
    /// Sum of all charges against the student.
    pub total_billed: Decimal,
    /// Sum of all payments by the student.
    pub total_paid: Decimal,
    /// Sum of all bursary deductions for the student.
    pub total_bursary: Decimal,
    /// `total_billed - total_paid - total_bursary`. Negative on overpayment;
    /// the sign is preserved and display clamping is the caller's concern.
    pub outstanding_balance: Decimal,
    /// False when the record has no financial truth of its own and no
    /// bursar mirror was found (the "unset" gray state).
    pub linked: bool,
}

impl FinancialSummary {
    /// The summary for a registrar record with no bursar counterpart.
    #[must_use]
    pub fn unset() -> Self {
        Self {
            total_billed: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            total_bursary: Decimal::ZERO,
            outstanding_balance: Decimal::ZERO,
            linked: false,
        }
    }

    /// Arrears owed for display: the outstanding balance clamped at zero.
    #[must_use]
    pub fn arrears_owed(&self) -> Decimal {
        self.outstanding_balance.max(Decimal::ZERO)
    }
}

/// Computes a student's billed, paid, and bursary totals plus the signed
/// outstanding balance.
///
/// When `all_students` is supplied and the target is a registrar-origin
/// record with a non-empty pay code, the computation delegates to the
/// bursar-origin student sharing that pay code; all financial rows are
/// keyed to bursar-origin student ids. A registrar record with a blank pay
/// code, or whose pay code matches no bursar record, yields the unset
/// summary.
///
/// Deterministic, non-mutating, and never fails: missing rows contribute
/// zero.
#[must_use]
pub fn calculate_student_financials(
    student: &Student,
    billings: &[Billing],
    payments: &[Payment],
    bursaries: &[Bursary],
    all_students: Option<&[Student]>,
) -> FinancialSummary {
    if student.origin == StudentOrigin::Registrar {
        if let Some(roster) = all_students {
            let Some(code) = student.effective_pay_code() else {
                return FinancialSummary::unset();
            };
            let Some(mirror) = find_bursar_mirror(code, roster) else {
                return FinancialSummary::unset();
            };
            return sum_for(mirror, billings, payments, bursaries);
        }
        if student.effective_pay_code().is_none() {
            return FinancialSummary::unset();
        }
    }

    sum_for(student, billings, payments, bursaries)
}

/// Computes the clearance percentage: the proportion of billed fees
/// considered settled after payments and bursaries.
///
/// A student with zero total billed is treated as 100% clear. The result
/// may exceed 100 on overpayment; progress-ring rendering clamps with
/// `min(100, pct)` while showing the true value as text.
#[must_use]
pub fn calculate_clearance_percentage(
    student: &Student,
    billings: &[Billing],
    payments: &[Payment],
    bursaries: &[Bursary],
    all_students: Option<&[Student]>,
) -> Decimal {
    let summary =
        calculate_student_financials(student, billings, payments, bursaries, all_students);
    clearance_percentage(&summary)
}

/// Clearance percentage from an already-computed summary.
#[must_use]
pub fn clearance_percentage(summary: &FinancialSummary) -> Decimal {
    if summary.total_billed > Decimal::ZERO {
        (summary.total_billed - summary.outstanding_balance) / summary.total_billed
            * Decimal::ONE_HUNDRED
    } else {
        Decimal::ONE_HUNDRED
    }
}

/// Locates the bursar-origin student sharing the given pay code.
fn find_bursar_mirror<'a>(code: &str, roster: &'a [Student]) -> Option<&'a Student> {
    roster
        .iter()
        .find(|s| s.origin == StudentOrigin::Bursar && s.effective_pay_code() == Some(code))
}

fn sum_for(
    student: &Student,
    billings: &[Billing],
    payments: &[Payment],
    bursaries: &[Bursary],
) -> FinancialSummary {
    let total_billed: Decimal = billings
        .iter()
        .filter(|b| b.student_id == student.id)
        .map(|b| b.amount)
        .sum();
    let total_paid: Decimal = payments
        .iter()
        .filter(|p| p.student_id == student.id)
        .map(|p| p.amount)
        .sum();
    let total_bursary = bursary_total_for(student, bursaries);

    FinancialSummary {
        total_billed,
        total_paid,
        total_bursary,
        outstanding_balance: total_billed - total_paid - total_bursary,
        linked: true,
    }
}

/// Sums the bursary deductions applying to one student. Each bursary
/// contributes its fixed amount once per associated student.
fn bursary_total_for(student: &Student, bursaries: &[Bursary]) -> Decimal {
    bursaries
        .iter()
        .filter(|b| b.student_ids.contains(&student.id))
        .map(|b| b.amount)
        .sum()
}
