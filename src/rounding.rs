//! Decimal-place rounding of f64 amounts
//!
//! Every intermediate amount in limit sizing and amortization is rounded, and
//! cent-level parity depends on the rule used. Rounding goes through
//! `rust_decimal` so the decision is made on the exact binary value of the
//! f64 rather than on a scaled (and already inexact) product.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places for currency amounts
pub const CURRENCY_DP: u32 = 2;

/// Decimal places for the derived periodic rate
pub const RATE_DP: u32 = 6;

/// Midpoint rule applied at every rounding step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundingRule {
    /// Ties go to the even neighbour (banker's rounding)
    #[default]
    HalfEven,
    /// Ties go away from zero (schoolbook rounding)
    HalfAwayFromZero,
}

impl RoundingRule {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingRule::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingRule::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
        }
    }

    /// Round `value` to `dp` decimal places.
    ///
    /// Values outside the range `Decimal` can hold (and non-finite values)
    /// are returned unchanged; at that magnitude cent rounding is moot.
    pub fn round(self, value: f64, dp: u32) -> f64 {
        let Some(exact) = Decimal::from_f64_retain(value) else {
            return value;
        };
        match exact.round_dp_with_strategy(dp, self.strategy()).to_f64() {
            // `+ 0.0` folds a rounded negative zero into positive zero
            Some(rounded) => rounded + 0.0,
            None => value,
        }
    }

    /// Round a currency amount to cents
    pub fn round_currency(self, value: f64) -> f64 {
        self.round(value, CURRENCY_DP)
    }
}
