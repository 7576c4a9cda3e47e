//! Amortization schedule output structures

use serde::{Deserialize, Serialize};

/// One repayment period of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallmentRow {
    /// Period number (1-indexed)
    pub period: u32,

    /// Fixed installment paid this period
    pub installment: f64,

    /// Interest charged on the balance at the start of the period
    pub interest: f64,

    /// Principal repaid this period
    pub capital: f64,

    /// Principal outstanding after the period, floored at zero
    pub remaining_capital: f64,
}

/// Constant-installment, declining-balance repayment plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationSchedule {
    amount: f64,
    periods: u32,
    periodic_rate: f64,
    installment: f64,
    rows: Vec<InstallmentRow>,
}

impl AmortizationSchedule {
    pub(crate) fn new(amount: f64, periods: u32, periodic_rate: f64, installment: f64) -> Self {
        Self {
            amount,
            periods,
            periodic_rate,
            installment,
            rows: Vec::with_capacity(periods as usize),
        }
    }

    pub(crate) fn add_row(&mut self, row: InstallmentRow) {
        self.rows.push(row);
    }

    /// Financed principal
    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn periods(&self) -> u32 {
        self.periods
    }

    pub fn periodic_rate(&self) -> f64 {
        self.periodic_rate
    }

    /// Fixed installment paid every period
    pub fn installment(&self) -> f64 {
        self.installment
    }

    pub fn rows(&self) -> &[InstallmentRow] {
        &self.rows
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        let total_paid: f64 = self.rows.iter().map(|r| r.installment).sum();
        let total_interest: f64 = self.rows.iter().map(|r| r.interest).sum();
        let total_capital: f64 = self.rows.iter().map(|r| r.capital).sum();
        let final_remaining = self.rows.last().map(|r| r.remaining_capital).unwrap_or(self.amount);

        ScheduleSummary {
            periods: self.rows.len() as u32,
            total_paid,
            total_interest,
            total_capital,
            final_remaining,
        }
    }
}

/// Summary statistics for a schedule. Totals are plain sums of the rounded rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub periods: u32,
    pub total_paid: f64,
    pub total_interest: f64,
    pub total_capital: f64,
    pub final_remaining: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals() {
        let mut schedule = AmortizationSchedule::new(200.0, 2, 0.01, 101.5);
        schedule.add_row(InstallmentRow {
            period: 1,
            installment: 101.5,
            interest: 2.0,
            capital: 99.5,
            remaining_capital: 100.5,
        });
        schedule.add_row(InstallmentRow {
            period: 2,
            installment: 101.5,
            interest: 1.01,
            capital: 100.49,
            remaining_capital: 0.01,
        });

        let summary = schedule.summary();
        assert_eq!(summary.periods, 2);
        assert!((summary.total_paid - 203.0).abs() < 1e-9);
        assert!((summary.total_interest - 3.01).abs() < 1e-9);
        assert!((summary.total_capital - 199.99).abs() < 1e-9);
        assert_eq!(summary.final_remaining, 0.01);
    }

    #[test]
    fn test_empty_schedule_summary() {
        let schedule = AmortizationSchedule::new(50.0, 0, 0.01, 0.0);
        assert_eq!(schedule.summary().final_remaining, 50.0);
    }
}
