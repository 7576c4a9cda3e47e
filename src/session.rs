//! Credit line: the borrower-side state around the stateless calculator
//!
//! Holds the granted limit and the financing plans drawn against it. The
//! calculator never sees this state; the credit line decides, calls the
//! calculator, then records the outcome.
//!
//! # Example
//! ```ignore
//! let mut line = CreditLine::new(CreditCalculator::default());
//! line.underwrite(CreditScoreGrade::A, 6000.0)?;
//! let plan = line.finance(500.0, 3)?;
//! println!("{} left", line.remaining_limit().unwrap_or(0.0));
//! ```

use serde::Serialize;

use crate::calculator::{AmortizationSchedule, CreditCalculator, LimitBreakdown};
use crate::error::{ensure_non_negative, CreditError, CreditResult};
use crate::product::CreditScoreGrade;

/// Period count used when sizing a new limit
pub const UNDERWRITING_PERIODS: u32 = 3;

/// Repayment counts offered on each financing
pub const DEFAULT_REPAYMENT_OPTIONS: [u32; 3] = [3, 6, 9];

/// One financing drawn against the credit line
#[derive(Debug, Clone, Serialize)]
pub struct FinancingPlan {
    /// 1-based position in the credit line's history
    pub plan_number: usize,

    /// Financed principal
    pub amount: f64,

    pub schedule: AmortizationSchedule,

    /// Limit left once this plan was drawn
    pub limit_after: f64,
}

/// In-memory credit line for a single borrower
#[derive(Debug, Clone)]
pub struct CreditLine {
    calculator: CreditCalculator,
    repayment_options: Vec<u32>,
    underwriting: Option<LimitBreakdown>,
    limit: Option<f64>,
    plans: Vec<FinancingPlan>,
}

impl CreditLine {
    /// Create an empty credit line offering the default repayment counts
    pub fn new(calculator: CreditCalculator) -> Self {
        Self {
            calculator,
            repayment_options: DEFAULT_REPAYMENT_OPTIONS.to_vec(),
            underwriting: None,
            limit: None,
            plans: Vec::new(),
        }
    }

    /// Offer a different set of repayment counts
    pub fn with_repayment_options(mut self, options: Vec<u32>) -> CreditResult<Self> {
        if options.is_empty() || options.contains(&0) {
            return Err(CreditError::InvalidConfig(format!(
                "repayment options must be non-empty positive counts, got {options:?}"
            )));
        }
        self.repayment_options = options;
        Ok(self)
    }

    /// Size (or re-size) the limit from the borrower's grade and inflow.
    ///
    /// A new underwriting replaces the current limit; existing plans are kept.
    pub fn underwrite(&mut self, grade: CreditScoreGrade, sum_inflow_6m: f64) -> CreditResult<&LimitBreakdown> {
        let breakdown = self
            .calculator
            .compute_limit_breakdown(grade, sum_inflow_6m, UNDERWRITING_PERIODS)?;

        log::info!("credit line underwritten at grade {grade}: limit {:.2}", breakdown.credit_limit);

        self.limit = Some(breakdown.credit_limit);
        let breakdown: &LimitBreakdown = self.underwriting.insert(breakdown);
        Ok(breakdown)
    }

    /// Draw `amount` against the limit and repay it over `periods` installments.
    ///
    /// Every check runs before the schedule is built; a rejected request
    /// leaves the credit line unchanged.
    pub fn finance(&mut self, amount: f64, periods: u32) -> CreditResult<&FinancingPlan> {
        let limit = self.limit.ok_or(CreditError::NotUnderwritten)?;
        ensure_non_negative("amount", amount)?;

        if !self.repayment_options.contains(&periods) {
            log::warn!("rejected financing of {amount:.2}: {periods} repayments not offered");
            return Err(CreditError::UnsupportedRepaymentCount {
                periods,
                offered: self.repayment_options.clone(),
            });
        }
        if amount > limit {
            log::warn!("rejected financing of {amount:.2}: remaining limit is {limit:.2}");
            return Err(CreditError::ExceedsLimit { amount, limit });
        }

        let schedule = self.calculator.compute_monthly_installments(amount, periods)?;
        let limit_after = self.calculator.financing().round_currency(limit - amount);

        log::info!(
            "financed {amount:.2} in {periods} installments of {:.2}; limit now {limit_after:.2}",
            schedule.installment()
        );

        self.limit = Some(limit_after);
        self.plans.push(FinancingPlan {
            plan_number: self.plans.len() + 1,
            amount,
            schedule,
            limit_after,
        });

        Ok(&self.plans[self.plans.len() - 1])
    }

    /// Limit still available, or `None` before the first underwriting
    pub fn remaining_limit(&self) -> Option<f64> {
        self.limit
    }

    /// Breakdown of the most recent underwriting
    pub fn underwriting(&self) -> Option<&LimitBreakdown> {
        self.underwriting.as_ref()
    }

    pub fn plans(&self) -> &[FinancingPlan] {
        &self.plans
    }

    pub fn repayment_options(&self) -> &[u32] {
        &self.repayment_options
    }
}
