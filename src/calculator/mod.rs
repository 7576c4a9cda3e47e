//! Credit calculator: limit sizing and amortization schedules

mod engine;
mod limit;
mod schedule;

pub use engine::{CreditCalculator, DEBT_TO_INCOME_DIVISOR, INFLOW_MONTHS, MAX_PERIODS};
pub use limit::{BindingConstraint, LimitBreakdown};
pub use schedule::{AmortizationSchedule, InstallmentRow, ScheduleSummary};

#[cfg(test)]
mod properties {
    use super::*;
    use crate::product::CreditScoreGrade;
    use proptest::prelude::*;

    fn any_grade() -> impl Strategy<Value = CreditScoreGrade> {
        prop::sample::select(CreditScoreGrade::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn limit_non_decreasing_in_inflow(
            grade in any_grade(),
            inflow in 0.0..2_000_000.0f64,
            extra in 0.0..100_000.0f64,
            periods in 1u32..=24,
        ) {
            let calc = CreditCalculator::default();
            let lower = calc.compute_limit(grade, inflow, periods).unwrap();
            let higher = calc.compute_limit(grade, inflow + extra, periods).unwrap();
            prop_assert!(lower <= higher);
            prop_assert!(lower >= 0.0);
        }

        #[test]
        fn grade_a_limit_dominates(inflow in 0.0..2_000_000.0f64, periods in 1u32..=24) {
            let calc = CreditCalculator::default();
            let a = calc.compute_limit(CreditScoreGrade::A, inflow, periods).unwrap();
            for grade in &CreditScoreGrade::ALL[1..] {
                prop_assert!(a >= calc.compute_limit(*grade, inflow, periods).unwrap());
            }
        }

        #[test]
        fn rate_factor_shrinks_with_term(periods in 1u32..360) {
            let calc = CreditCalculator::default();
            let shorter = calc.compute_rate_factor(periods).unwrap();
            let longer = calc.compute_rate_factor(periods + 1).unwrap();
            prop_assert!(longer > 0.0);
            prop_assert!(longer <= shorter);
        }

        #[test]
        fn schedule_repays_principal(cents in 0u64..5_000_000, periods in prop::sample::select(vec![3u32, 6, 9, 12])) {
            let calc = CreditCalculator::default();
            let amount = cents as f64 / 100.0;
            let schedule = calc.compute_monthly_installments(amount, periods).unwrap();
            let summary = schedule.summary();
            let tolerance = 0.02 * periods as f64;

            prop_assert_eq!(schedule.rows().len(), periods as usize);
            prop_assert!((summary.total_capital - amount).abs() <= tolerance);
            prop_assert!(summary.final_remaining <= tolerance);
            for row in schedule.rows() {
                prop_assert_eq!(row.installment, schedule.installment());
                prop_assert!(row.remaining_capital >= 0.0);
            }
        }
    }
}
