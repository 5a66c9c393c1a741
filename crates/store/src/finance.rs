//! Student, billing, payment, and bursary state plus financial reads.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::{AppStore, StoreError};
use schola_core::finance::{
    Billing, Bursary, ClearanceStatus, FinancialSettings, FinancialSummary, Payment, Student,
    calculate_student_financials, classify_summary, clearance_percentage,
};
use schola_shared::types::{BillingId, Money, PaymentId, StudentId};

/// A student's computed financial position with derived fields, as served
/// to the clearance views.
#[derive(Debug, Clone, Serialize)]
pub struct StudentFinancials {
    /// The raw computed summary.
    #[serde(flatten)]
    pub summary: FinancialSummary,
    /// Clearance percentage; may exceed 100 on overpayment.
    pub clearance_percentage: Decimal,
    /// Threshold-classified standing.
    pub status: ClearanceStatus,
    /// Arrears owed formatted for display, e.g. `UGX 100,000.00`.
    pub display_balance: String,
}

impl AppStore {
    /// Adds a student record.
    pub fn add_student(&self, student: Student) -> Result<(), StoreError> {
        let mut students = Self::write(&self.students)?;
        info!(student_id = %student.id, origin = %student.origin, "Student added");
        students.insert(student.id, student);
        Ok(())
    }

    /// Fetches one student.
    pub fn student(&self, id: StudentId) -> Result<Student, StoreError> {
        Self::read(&self.students)?
            .get(&id)
            .cloned()
            .ok_or(StoreError::StudentNotFound(id))
    }

    /// Returns the full roster.
    pub fn students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(Self::read(&self.students)?.values().cloned().collect())
    }

    /// Records a charge against a student.
    pub fn add_billing(&self, billing: Billing) -> Result<(), StoreError> {
        self.student(billing.student_id)?;
        Self::write(&self.billings)?.push(billing);
        Ok(())
    }

    /// Records a payment by a student.
    pub fn add_payment(&self, payment: Payment) -> Result<(), StoreError> {
        self.student(payment.student_id)?;
        Self::write(&self.payments)?.push(payment);
        Ok(())
    }

    /// Records a bursary award.
    pub fn add_bursary(&self, bursary: Bursary) -> Result<(), StoreError> {
        Self::write(&self.bursaries)?.push(bursary);
        Ok(())
    }

    /// Removes a billing row. This is a manual correction; the caller is
    /// responsible for recording it to the audit log.
    pub fn delete_billing(&self, id: BillingId) -> Result<Billing, StoreError> {
        let mut billings = Self::write(&self.billings)?;
        let index = billings
            .iter()
            .position(|b| b.id == id)
            .ok_or(StoreError::BillingNotFound(id))?;
        Ok(billings.remove(index))
    }

    /// Removes a payment row. Manual correction; audit logging is the
    /// caller's responsibility.
    pub fn delete_payment(&self, id: PaymentId) -> Result<Payment, StoreError> {
        let mut payments = Self::write(&self.payments)?;
        let index = payments
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::PaymentNotFound(id))?;
        Ok(payments.remove(index))
    }

    /// Returns the current financial settings.
    pub fn financial_settings(&self) -> Result<FinancialSettings, StoreError> {
        Ok(Self::read(&self.settings)?.clone())
    }

    /// Replaces the financial settings.
    pub fn set_financial_settings(&self, settings: FinancialSettings) -> Result<(), StoreError> {
        *Self::write(&self.settings)? = settings;
        Ok(())
    }

    /// Computes a student's financial position from the current state.
    ///
    /// Snapshots the collections, then delegates to the pure calculation;
    /// a registrar record resolves through its bursar mirror, and a record
    /// with no mirror comes back `Unset` rather than failing.
    pub fn student_financials(&self, id: StudentId) -> Result<StudentFinancials, StoreError> {
        let student = self.student(id)?;
        let roster = self.students()?;
        let billings = Self::read(&self.billings)?.clone();
        let payments = Self::read(&self.payments)?.clone();
        let bursaries = Self::read(&self.bursaries)?.clone();
        let settings = self.financial_settings()?;

        let summary = calculate_student_financials(
            &student,
            &billings,
            &payments,
            &bursaries,
            Some(&roster),
        );

        Ok(StudentFinancials {
            clearance_percentage: clearance_percentage(&summary),
            status: classify_summary(&summary, &settings),
            display_balance: Money::new(summary.arrears_owed(), settings.currency).format(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use schola_core::finance::{PaymentMethod, StudentOrigin};
    use schola_shared::types::BursaryId;

    fn student(origin: StudentOrigin, pay_code: Option<&str>) -> Student {
        Student {
            id: StudentId::new(),
            name: "Test Student".into(),
            pay_code: pay_code.map(ToString::to_string),
            origin,
            total_fees: dec!(1_000_000),
            programme_id: None,
            level: "Year 1".into(),
            services: vec![],
            physical_requirements: vec![],
        }
    }

    fn billing(student_id: StudentId, amount: Decimal) -> Billing {
        Billing {
            id: BillingId::new(),
            student_id,
            amount,
            description: "Tuition".into(),
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        }
    }

    fn payment(student_id: StudentId, amount: Decimal) -> Payment {
        Payment {
            id: PaymentId::new(),
            student_id,
            amount,
            method: PaymentMethod::Digital,
            date: NaiveDate::from_ymd_opt(2025, 9, 10).unwrap(),
            reference: "TXN-1".into(),
        }
    }

    #[test]
    fn test_financials_roundtrip() {
        let store = AppStore::default();
        let s = student(StudentOrigin::Bursar, Some("P1"));
        let sid = s.id;
        store.add_student(s).unwrap();
        store.add_billing(billing(sid, dec!(1_000_000))).unwrap();
        store.add_payment(payment(sid, dec!(850_000))).unwrap();
        store
            .add_bursary(Bursary {
                id: BursaryId::new(),
                name: "Choir".into(),
                amount: dec!(50_000),
                student_ids: vec![sid],
                awarded_at: Utc::now(),
            })
            .unwrap();

        let fin = store.student_financials(sid).unwrap();
        assert_eq!(fin.summary.outstanding_balance, dec!(100_000));
        assert_eq!(fin.clearance_percentage, dec!(90));
        assert_eq!(fin.status, ClearanceStatus::Probation);
        assert_eq!(fin.display_balance, "UGX 100,000.00");
    }

    #[test]
    fn test_registrar_mirror_resolves_through_store() {
        let store = AppStore::default();
        let bursar = student(StudentOrigin::Bursar, Some("P7"));
        let registrar = student(StudentOrigin::Registrar, Some("P7"));
        let bursar_id = bursar.id;
        let registrar_id = registrar.id;
        store.add_student(bursar).unwrap();
        store.add_student(registrar).unwrap();
        store.add_billing(billing(bursar_id, dec!(500_000))).unwrap();
        store.add_payment(payment(bursar_id, dec!(500_000))).unwrap();

        let fin = store.student_financials(registrar_id).unwrap();
        assert_eq!(fin.status, ClearanceStatus::Cleared);
        assert_eq!(fin.summary.outstanding_balance, Decimal::ZERO);
    }

    #[test]
    fn test_unlinked_registrar_is_unset() {
        let store = AppStore::default();
        let registrar = student(StudentOrigin::Registrar, Some("ORPHAN"));
        let id = registrar.id;
        store.add_student(registrar).unwrap();

        let fin = store.student_financials(id).unwrap();
        assert_eq!(fin.status, ClearanceStatus::Unset);
        assert!(!fin.summary.linked);
    }

    #[test]
    fn test_rows_require_existing_student() {
        let store = AppStore::default();
        let err = store.add_billing(billing(StudentId::new(), dec!(1))).unwrap_err();
        assert!(matches!(err, StoreError::StudentNotFound(_)));
    }

    #[test]
    fn test_manual_deletion_returns_removed_row() {
        let store = AppStore::default();
        let s = student(StudentOrigin::Bursar, None);
        let sid = s.id;
        store.add_student(s).unwrap();
        let row = billing(sid, dec!(250));
        let row_id = row.id;
        store.add_billing(row).unwrap();

        let removed = store.delete_billing(row_id).unwrap();
        assert_eq!(removed.amount, dec!(250));
        assert!(matches!(
            store.delete_billing(row_id).unwrap_err(),
            StoreError::BillingNotFound(_)
        ));
    }
}
