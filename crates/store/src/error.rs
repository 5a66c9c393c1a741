//! Store error types.

use thiserror::Error;

use schola_core::audit::AuditError;
use schola_core::budget::BudgetPeriodError;
use schola_core::results::ResultsError;
use schola_shared::types::{BillingId, PaymentId, StudentId};

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Results workflow error.
    #[error(transparent)]
    Results(#[from] ResultsError),

    /// Budget period error.
    #[error(transparent)]
    BudgetPeriod(#[from] BudgetPeriodError),

    /// Audit export error.
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// Student not found.
    #[error("Student {0} not found")]
    StudentNotFound(StudentId),

    /// Billing row not found.
    #[error("Billing {0} not found")]
    BillingNotFound(BillingId),

    /// Payment row not found.
    #[error("Payment {0} not found")]
    PaymentNotFound(PaymentId),

    /// A state lock was poisoned by a panicking writer.
    #[error("State lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Results(e) => e.status_code(),
            Self::BudgetPeriod(e) => e.status_code(),
            Self::Audit(_) | Self::Poisoned => 500,
            Self::StudentNotFound(_) | Self::BillingNotFound(_) | Self::PaymentNotFound(_) => 404,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Results(e) => e.error_code(),
            Self::BudgetPeriod(e) => e.error_code(),
            Self::Audit(_) => "EXPORT_ERROR",
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::BillingNotFound(_) => "BILLING_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::Poisoned => "PERSISTENCE_ERROR",
        }
    }
}
