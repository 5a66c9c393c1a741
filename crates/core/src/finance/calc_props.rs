//! Property-based tests for the fee clearance calculation.
//!
//! These validate money conservation and registrar/bursar mirroring over
//! arbitrary collections of billing, payment, and bursary rows.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::finance::calc::{FinancialSummary, calculate_student_financials};
use crate::finance::test_support::{billing, bursar_student, payment, registrar_student};
use crate::finance::types::Bursary;
use schola_shared::types::BursaryId;

/// Strategy for generating row amounts in minor-unit-scale decimals.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..50_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_amounts(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(arb_amount(), 0..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// outstanding == sum(billings) - sum(payments) - sum(bursaries),
    /// exactly, including when the result is negative.
    #[test]
    fn prop_balance_conservation(
        billed in arb_amounts(8),
        paid in arb_amounts(8),
        bursaries_amounts in arb_amounts(4),
    ) {
        let student = bursar_student("S", Some("P1"));
        let billings: Vec<_> = billed.iter().map(|a| billing(&student, *a)).collect();
        let payments: Vec<_> = paid.iter().map(|a| payment(&student, *a)).collect();
        let bursaries: Vec<_> = bursaries_amounts
            .iter()
            .map(|a| Bursary {
                id: BursaryId::new(),
                name: "Grant".to_string(),
                amount: *a,
                student_ids: vec![student.id],
                awarded_at: Utc::now(),
            })
            .collect();

        let summary =
            calculate_student_financials(&student, &billings, &payments, &bursaries, None);

        let expected_billed: Decimal = billed.iter().copied().sum();
        let expected_paid: Decimal = paid.iter().copied().sum();
        let expected_bursary: Decimal = bursaries_amounts.iter().copied().sum();

        prop_assert_eq!(summary.total_billed, expected_billed);
        prop_assert_eq!(summary.total_paid, expected_paid);
        prop_assert_eq!(summary.total_bursary, expected_bursary);
        prop_assert_eq!(
            summary.outstanding_balance,
            expected_billed - expected_paid - expected_bursary
        );
    }

    /// A registrar record with a matching pay code computes exactly the
    /// same summary as its bursar mirror, in every field.
    #[test]
    fn prop_mirroring_equality(
        billed in arb_amounts(6),
        paid in arb_amounts(6),
    ) {
        let bursar = bursar_student("B", Some("SHARED"));
        let registrar = registrar_student("R", Some("SHARED"));
        let roster = vec![registrar.clone(), bursar.clone()];
        let billings: Vec<_> = billed.iter().map(|a| billing(&bursar, *a)).collect();
        let payments: Vec<_> = paid.iter().map(|a| payment(&bursar, *a)).collect();

        let via_registrar =
            calculate_student_financials(&registrar, &billings, &payments, &[], Some(&roster));
        let via_bursar =
            calculate_student_financials(&bursar, &billings, &payments, &[], None);

        prop_assert_eq!(via_registrar, via_bursar);
    }

    /// A registrar record whose pay code matches no bursar record always
    /// yields the unset summary, no matter what rows exist.
    #[test]
    fn prop_unmatched_registrar_is_unset(
        billed in arb_amounts(6),
    ) {
        let bursar = bursar_student("B", Some("CODE-A"));
        let registrar = registrar_student("R", Some("CODE-B"));
        let roster = vec![registrar.clone(), bursar.clone()];
        let billings: Vec<_> = billed.iter().map(|a| billing(&bursar, *a)).collect();

        let summary =
            calculate_student_financials(&registrar, &billings, &[], &[], Some(&roster));
        prop_assert_eq!(summary, FinancialSummary::unset());
    }
}
