//! Core credit calculator: rate factor, limit sizing and amortization

use crate::error::{ensure_non_negative, CreditError, CreditResult};
use crate::product::{BalanceCarry, CreditScoreGrade, FinancingConfig, GradePolicyTable, ProductConfig};
use super::limit::{BindingConstraint, LimitBreakdown};
use super::schedule::{AmortizationSchedule, InstallmentRow};

/// Months of inflow the limit is sized from
pub const INFLOW_MONTHS: f64 = 6.0;

/// Installments may use at most 1/3 of average monthly inflow
pub const DEBT_TO_INCOME_DIVISOR: f64 = 3.0;

/// Longest repayment term accepted, in periods
pub const MAX_PERIODS: u32 = 1200;

/// Stateless calculator over a fixed product configuration.
///
/// All methods take `&self`; one calculator can be shared freely across
/// threads.
#[derive(Debug, Clone)]
pub struct CreditCalculator {
    product: ProductConfig,
}

impl CreditCalculator {
    /// Create a calculator priced with the given product configuration
    pub fn new(product: ProductConfig) -> Self {
        Self { product }
    }

    pub fn product(&self) -> &ProductConfig {
        &self.product
    }

    pub fn financing(&self) -> &FinancingConfig {
        &self.product.financing
    }

    pub fn grades(&self) -> &GradePolicyTable {
        &self.product.grades
    }

    fn periodic_rate(&self) -> f64 {
        self.product.financing.periodic_rate()
    }

    fn round(&self, value: f64) -> f64 {
        self.product.financing.round_currency(value)
    }

    fn ensure_periods(periods: u32) -> CreditResult<()> {
        if !(1..=MAX_PERIODS).contains(&periods) {
            return Err(CreditError::InvalidPeriods(periods));
        }
        Ok(())
    }

    /// Annuity factor: the installment per unit of principal that fully
    /// amortizes it over `periods` periods.
    pub fn compute_rate_factor(&self, periods: u32) -> CreditResult<f64> {
        Self::ensure_periods(periods)?;

        let r = self.periodic_rate();
        if r == 0.0 {
            return Ok(1.0 / periods as f64);
        }

        let growth = (1.0 + r).powf(periods as f64);
        let factor = (r * growth) / (growth - 1.0);
        if factor.is_finite() {
            return Ok(factor);
        }

        // Growth overflowed; the discounting form tends to r instead of inf/inf
        Ok(r / (1.0 - (1.0 + r).powf(-(periods as f64))))
    }

    /// Largest installment the grade allows, independent of income
    pub fn compute_max_installment(&self, grade: CreditScoreGrade, periods: u32) -> CreditResult<f64> {
        let policy = self.grades().get(grade);
        let rate_factor = self.compute_rate_factor(periods)?;

        Ok(policy.max_limit * policy.income_usage * rate_factor)
    }

    /// Size the credit limit for a borrower
    pub fn compute_limit(&self, grade: CreditScoreGrade, sum_inflow_6m: f64, periods: u32) -> CreditResult<f64> {
        Ok(self.compute_limit_breakdown(grade, sum_inflow_6m, periods)?.credit_limit)
    }

    /// Size the credit limit and keep every intermediate value.
    ///
    /// Rounding happens after each of the three steps, in this order.
    pub fn compute_limit_breakdown(
        &self,
        grade: CreditScoreGrade,
        sum_inflow_6m: f64,
        periods: u32,
    ) -> CreditResult<LimitBreakdown> {
        ensure_non_negative("sum_inflow_6m", sum_inflow_6m)?;
        let max_installment = self.compute_max_installment(grade, periods)?;
        let r = self.periodic_rate();

        let monthly_capacity = self.round((sum_inflow_6m / INFLOW_MONTHS) / DEBT_TO_INCOME_DIVISOR);
        let final_installment = self.round(monthly_capacity.min(max_installment));

        let present_value = if r == 0.0 {
            final_installment * periods as f64
        } else {
            (final_installment * (1.0 - (1.0 + r).powf(-(periods as f64)))) / r
        };
        let credit_limit = self.round(present_value);

        let binding = if monthly_capacity <= max_installment {
            BindingConstraint::Affordability
        } else {
            BindingConstraint::GradeCeiling
        };

        log::debug!(
            "limit for grade {grade}: capacity {monthly_capacity:.2}, grade cap {max_installment:.4}, \
             installment {final_installment:.2} over {periods} periods -> {credit_limit:.2}"
        );

        Ok(LimitBreakdown {
            grade,
            sum_inflow_6m,
            periods,
            monthly_capacity,
            max_installment,
            final_installment,
            credit_limit,
            binding,
        })
    }

    /// Build the constant-installment amortization schedule for `amount`
    pub fn compute_monthly_installments(&self, amount: f64, periods: u32) -> CreditResult<AmortizationSchedule> {
        ensure_non_negative("amount", amount)?;
        let rate_factor = self.compute_rate_factor(periods)?;
        let r = self.periodic_rate();
        let carry = self.financing().balance_carry();

        let installment = self.round(rate_factor * amount);
        let mut schedule = AmortizationSchedule::new(amount, periods, r, installment);
        let mut balance = amount;

        for period in 1..=periods {
            // Interest accrues on the balance at the start of the period
            let interest = self.round(balance * r);
            let capital = self.round(installment - interest);
            let remaining = self.round(balance - capital);
            let displayed = remaining.max(0.0);

            schedule.add_row(InstallmentRow {
                period,
                installment,
                interest,
                capital,
                remaining_capital: displayed,
            });

            balance = match carry {
                BalanceCarry::Unclamped => remaining,
                BalanceCarry::Clamped => displayed,
            };
        }

        if balance.abs() >= 0.005 {
            log::debug!("schedule for {amount:.2} over {periods} periods ends with residual balance {balance:.2}");
        }

        Ok(schedule)
    }
}

impl Default for CreditCalculator {
    fn default() -> Self {
        Self::new(ProductConfig::default_product())
    }
}
