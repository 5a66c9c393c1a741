//! Budget period management: overlap validation and status derivation.

pub mod error;
pub mod service;
pub mod types;

pub use error::BudgetPeriodError;
pub use service::{BudgetPeriodService, ranges_overlap};
pub use types::{BudgetPeriod, PeriodInput, PeriodStatus};
