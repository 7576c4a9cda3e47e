//! Financing terms and periodic rate derivation

use serde::{Deserialize, Serialize};

use crate::error::{CreditError, CreditResult};
use crate::rounding::{RoundingRule, RATE_DP};

/// Nominal annual rate (TAEG) of the product
pub const DEFAULT_ANNUAL_RATE: f64 = 0.15;

/// Length of one repayment period in days
pub const DEFAULT_PERIOD_DAYS: u32 = 30;

/// Day count used to turn a period length into a year fraction
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Which balance the amortization loop carries into the next period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BalanceCarry {
    /// Carry the rounded balance as computed, even when it dips below zero.
    /// Reproduces the reference schedules cent for cent.
    #[default]
    Unclamped,
    /// Carry the displayed balance, floored at zero, so no interest is
    /// charged on a negative balance.
    Clamped,
}

/// Raw financing terms, before the periodic rate is derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub annual_rate: f64,
    pub period_days: u32,
    #[serde(default)]
    pub rounding: RoundingRule,
    #[serde(default)]
    pub balance_carry: BalanceCarry,
}

impl Default for FinancingTerms {
    fn default() -> Self {
        Self {
            annual_rate: DEFAULT_ANNUAL_RATE,
            period_days: DEFAULT_PERIOD_DAYS,
            rounding: RoundingRule::default(),
            balance_carry: BalanceCarry::default(),
        }
    }
}

/// Immutable financing configuration shared by limit sizing and amortization.
///
/// The periodic rate is derived once here and never set directly, so both
/// formulas always price with the same rate. Deserialization goes through
/// [`FinancingTerms`] and the same derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FinancingTerms", into = "FinancingTerms")]
pub struct FinancingConfig {
    annual_rate: f64,
    period_days: u32,
    periodic_rate: f64,
    rounding: RoundingRule,
    balance_carry: BalanceCarry,
}

impl FinancingConfig {
    /// Create a configuration from an annual rate and a period length in days
    pub fn new(annual_rate: f64, period_days: u32) -> CreditResult<Self> {
        Self::from_terms(FinancingTerms {
            annual_rate,
            period_days,
            ..Default::default()
        })
    }

    /// Validate terms and derive the periodic rate
    pub fn from_terms(terms: FinancingTerms) -> CreditResult<Self> {
        if !terms.annual_rate.is_finite() || terms.annual_rate <= -1.0 {
            return Err(CreditError::InvalidConfig(format!(
                "annual rate must be a finite rate above -100%, got {}",
                terms.annual_rate
            )));
        }
        if terms.period_days == 0 {
            return Err(CreditError::InvalidConfig(
                "period length must be at least one day".into(),
            ));
        }
        Ok(Self::derive(terms))
    }

    fn derive(terms: FinancingTerms) -> Self {
        let year_fraction = terms.period_days as f64 / DAYS_PER_YEAR;
        let raw = (1.0 + terms.annual_rate).powf(year_fraction) - 1.0;
        let periodic_rate = terms.rounding.round(raw, RATE_DP);

        log::debug!(
            "derived periodic rate {:.6} from annual rate {} over {} days",
            periodic_rate,
            terms.annual_rate,
            terms.period_days
        );

        Self {
            annual_rate: terms.annual_rate,
            period_days: terms.period_days,
            periodic_rate,
            rounding: terms.rounding,
            balance_carry: terms.balance_carry,
        }
    }

    /// Same terms under a different rounding rule (the periodic rate is re-derived)
    pub fn with_rounding(self, rounding: RoundingRule) -> Self {
        Self::derive(FinancingTerms {
            rounding,
            ..self.terms()
        })
    }

    /// Same terms with a different balance carry policy
    pub fn with_balance_carry(self, balance_carry: BalanceCarry) -> Self {
        Self {
            balance_carry,
            ..self
        }
    }

    pub fn terms(&self) -> FinancingTerms {
        FinancingTerms {
            annual_rate: self.annual_rate,
            period_days: self.period_days,
            rounding: self.rounding,
            balance_carry: self.balance_carry,
        }
    }

    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    pub fn period_days(&self) -> u32 {
        self.period_days
    }

    /// Effective rate per repayment period, rounded to 6 places
    pub fn periodic_rate(&self) -> f64 {
        self.periodic_rate
    }

    pub fn rounding(&self) -> RoundingRule {
        self.rounding
    }

    pub fn balance_carry(&self) -> BalanceCarry {
        self.balance_carry
    }

    /// Round a currency amount with the configured rule
    pub fn round_currency(&self, value: f64) -> f64 {
        self.rounding.round_currency(value)
    }
}

impl Default for FinancingConfig {
    fn default() -> Self {
        Self::derive(FinancingTerms::default())
    }
}

impl TryFrom<FinancingTerms> for FinancingConfig {
    type Error = CreditError;

    fn try_from(terms: FinancingTerms) -> CreditResult<Self> {
        Self::from_terms(terms)
    }
}

impl From<FinancingConfig> for FinancingTerms {
    fn from(config: FinancingConfig) -> Self {
        config.terms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_periodic_rate() {
        let config = FinancingConfig::default();
        assert_eq!(config.annual_rate(), 0.15);
        assert_eq!(config.period_days(), 30);
        assert_eq!(config.periodic_rate(), 0.011554);
    }

    #[test]
    fn test_rate_follows_terms() {
        let monthly = FinancingConfig::new(0.15, 30).unwrap();
        let fortnightly = FinancingConfig::new(0.15, 14).unwrap();
        let yearly = FinancingConfig::new(0.15, 365).unwrap();

        assert!(fortnightly.periodic_rate() < monthly.periodic_rate());
        assert!((yearly.periodic_rate() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rate() {
        let config = FinancingConfig::new(0.0, 30).unwrap();
        assert_eq!(config.periodic_rate(), 0.0);
    }

    #[test]
    fn test_invalid_terms_rejected() {
        assert!(matches!(
            FinancingConfig::new(0.15, 0),
            Err(CreditError::InvalidConfig(_))
        ));
        assert!(FinancingConfig::new(-1.0, 30).is_err());
        assert!(FinancingConfig::new(f64::NAN, 30).is_err());
    }

    #[test]
    fn test_deserialize_rederives_rate() {
        let json = r#"{"annual_rate":0.15,"period_days":30}"#;
        let config: FinancingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.periodic_rate(), 0.011554);
        assert_eq!(config.balance_carry(), BalanceCarry::Unclamped);

        let bad = r#"{"annual_rate":0.15,"period_days":0}"#;
        assert!(serde_json::from_str::<FinancingConfig>(bad).is_err());
    }

    #[test]
    fn test_serialize_exposes_terms_only() {
        let value = serde_json::to_value(FinancingConfig::default()).unwrap();
        assert!(value.get("periodic_rate").is_none());
        assert_eq!(value["period_days"], 30);
    }

    #[test]
    fn test_builders_keep_rate_consistent() {
        let config = FinancingConfig::default()
            .with_rounding(RoundingRule::HalfAwayFromZero)
            .with_balance_carry(BalanceCarry::Clamped);

        assert_eq!(config.rounding(), RoundingRule::HalfAwayFromZero);
        assert_eq!(config.balance_carry(), BalanceCarry::Clamped);
        assert_eq!(config.periodic_rate(), 0.011554);
    }
}
