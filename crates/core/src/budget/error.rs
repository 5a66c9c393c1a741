//! Budget period error types.

use thiserror::Error;

use schola_shared::types::BudgetPeriodId;

/// Errors that can occur when creating or updating budget periods.
#[derive(Debug, Error)]
pub enum BudgetPeriodError {
    /// End date must be strictly after the start date.
    #[error("End date must be after start date")]
    EndNotAfterStart,

    /// Period name is required.
    #[error("Period name is required")]
    NameRequired,

    /// The new range overlaps an existing period (inclusive boundaries:
    /// touching endpoints count as overlap).
    #[error("Period overlaps existing period \"{other}\"")]
    Overlapping {
        /// Name of the period that conflicts.
        other: String,
    },

    /// Period not found.
    #[error("Budget period {0} not found")]
    NotFound(BudgetPeriodId),

    /// Storage write failure.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl BudgetPeriodError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EndNotAfterStart | Self::NameRequired => 400,
            Self::Overlapping { .. } => 409,
            Self::NotFound(_) => 404,
            Self::Persistence(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EndNotAfterStart => "END_NOT_AFTER_START",
            Self::NameRequired => "NAME_REQUIRED",
            Self::Overlapping { .. } => "PERIOD_OVERLAP",
            Self::NotFound(_) => "PERIOD_NOT_FOUND",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_conflict() {
        let err = BudgetPeriodError::Overlapping {
            other: "Term 1".into(),
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "PERIOD_OVERLAP");
        assert!(err.to_string().contains("Term 1"));
    }

    #[test]
    fn test_date_order_is_bad_request() {
        assert_eq!(BudgetPeriodError::EndNotAfterStart.status_code(), 400);
    }

    #[test]
    fn test_not_found() {
        let err = BudgetPeriodError::NotFound(BudgetPeriodId::new());
        assert_eq!(err.status_code(), 404);
    }
}
