//! Error taxonomy for credit calculations and the credit line

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreditError {
    #[error("invalid credit score grade: {0:?} (expected one of A, B, C, D, E)")]
    InvalidGrade(String),

    #[error("invalid period count {0}: expected between 1 and {max} repayment periods", max = crate::calculator::MAX_PERIODS)]
    InvalidPeriods(u32),

    #[error("financing amount {amount:.2} exceeds the remaining limit {limit:.2}")]
    ExceedsLimit { amount: f64, limit: f64 },

    #[error("invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{periods} repayments are not offered (choose one of {offered:?})")]
    UnsupportedRepaymentCount { periods: u32, offered: Vec<u32> },

    #[error("no credit limit has been granted yet")]
    NotUnderwritten,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CreditResult<T> = Result<T, CreditError>;

/// Reject negative, NaN and infinite money inputs.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> CreditResult<()> {
    if !value.is_finite() {
        return Err(CreditError::InvalidInput {
            field: field.into(),
            reason: format!("must be a finite amount, got {value}"),
        });
    }
    if value < 0.0 {
        return Err(CreditError::InvalidInput {
            field: field.into(),
            reason: format!("must not be negative, got {value}"),
        });
    }
    Ok(())
}
