//! Pay-later credit engine - credit limit sizing and amortization schedules
//!
//! This library provides:
//! - Periodic rate derivation from an annual rate and a period length
//! - Grade-based credit limit sizing under a one-third debt-to-income cap
//! - Constant-installment amortization schedules
//! - An in-memory credit line that draws financings against the limit
//! - Batch limit sizing for a book of borrowers

pub mod error;
pub mod rounding;
pub mod product;
pub mod calculator;
pub mod session;
pub mod book;
pub mod report;

// Re-export commonly used types
pub use error::{CreditError, CreditResult};
pub use rounding::RoundingRule;
pub use product::{BalanceCarry, CreditScoreGrade, FinancingConfig, GradePolicyTable, ProductConfig};
pub use calculator::{AmortizationSchedule, CreditCalculator, InstallmentRow, LimitBreakdown};
pub use session::{CreditLine, FinancingPlan};
