//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `StudentId` where a
//! `PageConfigId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a staff user.");
typed_id!(StudentId, "Unique identifier for an enrolled student record.");
typed_id!(BillingId, "Unique identifier for a billing (charge) row.");
typed_id!(PaymentId, "Unique identifier for a payment (credit) row.");
typed_id!(BursaryId, "Unique identifier for a bursary or scholarship.");
typed_id!(ProgrammeId, "Unique identifier for an academic programme.");
typed_id!(CourseUnitId, "Unique identifier for a course unit.");
typed_id!(PageConfigId, "Unique identifier for a result page config.");
typed_id!(StudentResultId, "Unique identifier for a student result row.");
typed_id!(PostHistoryId, "Unique identifier for a posting ledger entry.");
typed_id!(BudgetPeriodId, "Unique identifier for a budget period.");
typed_id!(AuditEntryId, "Unique identifier for an audit log entry.");
