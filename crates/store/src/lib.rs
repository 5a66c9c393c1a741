//! In-memory application-state service for Schola.
//!
//! The source system held every collection in one global reactive store;
//! here each entity gets typed read/write methods on an explicit
//! [`AppStore`] injected into the layers above. State is process-local by
//! design: a persisted database is out of scope.
//!
//! Writes are all-or-nothing. Posting and reverting a result page are
//! serialized per page so two sessions can never interleave a batch, and
//! budget period overlap is re-validated inside the write section so a
//! stale pre-check can never commit a conflicting range.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;

use schola_core::audit::AuditLogEntry;
use schola_core::budget::BudgetPeriod;
use schola_core::finance::{
    Billing, Bursary, FinancialSettings, Payment, Student,
};
use schola_core::results::{
    PostHistoryItem, ResultPageConfig, StudentPageSummary, StudentResult,
};
use schola_shared::types::{CourseUnitId, PageConfigId, StudentId};

mod audit;
mod budget;
mod error;
mod finance;
mod results;

pub use error::StoreError;
pub use finance::StudentFinancials;
pub use results::EntrySaveOutcome;

/// Unique key for a live result row: at most one record exists per
/// (student, course unit, page).
pub type ResultKey = (StudentId, CourseUnitId, PageConfigId);

/// The application state store.
///
/// Cheap to clone handles are obtained by wrapping in `Arc` at the
/// composition root; the store itself owns the collections.
pub struct AppStore {
    students: RwLock<HashMap<StudentId, Student>>,
    billings: RwLock<Vec<Billing>>,
    payments: RwLock<Vec<Payment>>,
    bursaries: RwLock<Vec<Bursary>>,
    settings: RwLock<FinancialSettings>,
    page_configs: RwLock<HashMap<PageConfigId, ResultPageConfig>>,
    results: RwLock<HashMap<ResultKey, StudentResult>>,
    summaries: RwLock<HashMap<String, StudentPageSummary>>,
    post_history: RwLock<Vec<PostHistoryItem>>,
    budget_periods: RwLock<Vec<BudgetPeriod>>,
    audit_log: RwLock<Vec<AuditLogEntry>>,
    /// Per-page posting locks; posting and reverting one page serialize.
    page_locks: DashMap<PageConfigId, Arc<Mutex<()>>>,
}

impl AppStore {
    /// Creates an empty store with the given financial settings.
    #[must_use]
    pub fn new(settings: FinancialSettings) -> Self {
        Self {
            students: RwLock::new(HashMap::new()),
            billings: RwLock::new(Vec::new()),
            payments: RwLock::new(Vec::new()),
            bursaries: RwLock::new(Vec::new()),
            settings: RwLock::new(settings),
            page_configs: RwLock::new(HashMap::new()),
            results: RwLock::new(HashMap::new()),
            summaries: RwLock::new(HashMap::new()),
            post_history: RwLock::new(Vec::new()),
            budget_periods: RwLock::new(Vec::new()),
            audit_log: RwLock::new(Vec::new()),
            page_locks: DashMap::new(),
        }
    }

    /// Returns the posting lock for a page, creating it on first use.
    fn page_lock(&self, page_id: PageConfigId) -> Arc<Mutex<()>> {
        self.page_locks
            .entry(page_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
        lock.read().map_err(|_| StoreError::Poisoned)
    }

    fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
        lock.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(FinancialSettings::default())
    }
}
