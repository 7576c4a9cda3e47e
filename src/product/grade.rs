//! Credit-score grades and the per-grade lending policy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CreditError, CreditResult};

/// Discrete credit-score grade, A being the best risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CreditScoreGrade {
    A,
    B,
    C,
    D,
    E,
}

impl CreditScoreGrade {
    pub const ALL: [CreditScoreGrade; 5] = [
        CreditScoreGrade::A,
        CreditScoreGrade::B,
        CreditScoreGrade::C,
        CreditScoreGrade::D,
        CreditScoreGrade::E,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CreditScoreGrade::A => "A",
            CreditScoreGrade::B => "B",
            CreditScoreGrade::C => "C",
            CreditScoreGrade::D => "D",
            CreditScoreGrade::E => "E",
        }
    }

    /// Slot in the policy table
    fn index(self) -> usize {
        match self {
            CreditScoreGrade::A => 0,
            CreditScoreGrade::B => 1,
            CreditScoreGrade::C => 2,
            CreditScoreGrade::D => 3,
            CreditScoreGrade::E => 4,
        }
    }
}

impl fmt::Display for CreditScoreGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditScoreGrade {
    type Err = CreditError;

    fn from_str(s: &str) -> CreditResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(CreditScoreGrade::A),
            "B" => Ok(CreditScoreGrade::B),
            "C" => Ok(CreditScoreGrade::C),
            "D" => Ok(CreditScoreGrade::D),
            "E" => Ok(CreditScoreGrade::E),
            _ => Err(CreditError::InvalidGrade(s.to_string())),
        }
    }
}

/// Lending policy attached to one grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradePolicy {
    /// Share of the ceiling the grade may use, in [0, 1]
    pub income_usage: f64,

    /// Absolute lending ceiling for the grade
    pub max_limit: f64,
}

impl GradePolicy {
    pub fn new(income_usage: f64, max_limit: f64) -> Self {
        Self { income_usage, max_limit }
    }

    fn validate(&self, grade: CreditScoreGrade) -> CreditResult<()> {
        if !(0.0..=1.0).contains(&self.income_usage) {
            return Err(CreditError::InvalidConfig(format!(
                "grade {grade}: income usage must lie in [0, 1], got {}",
                self.income_usage
            )));
        }
        if !self.max_limit.is_finite() || self.max_limit < 0.0 {
            return Err(CreditError::InvalidConfig(format!(
                "grade {grade}: max limit must be a non-negative amount, got {}",
                self.max_limit
            )));
        }
        Ok(())
    }
}

/// Grade to policy lookup covering every grade exactly once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradePolicyTable {
    policies: [GradePolicy; 5],
}

impl GradePolicyTable {
    /// Ceiling for the best grade
    pub const PRIME_MAX_LIMIT: f64 = 30_000.0;

    /// Ceiling shared by every other grade
    pub const STANDARD_MAX_LIMIT: f64 = 20_000.0;

    /// Policy table of the pay-later product
    pub fn default_product() -> Self {
        Self {
            policies: [
                GradePolicy::new(1.0, Self::PRIME_MAX_LIMIT),
                GradePolicy::new(0.75, Self::STANDARD_MAX_LIMIT),
                GradePolicy::new(0.5, Self::STANDARD_MAX_LIMIT),
                GradePolicy::new(0.25, Self::STANDARD_MAX_LIMIT),
                GradePolicy::new(0.1, Self::STANDARD_MAX_LIMIT),
            ],
        }
    }

    /// Build a table from `(grade, policy)` entries.
    ///
    /// Every grade must appear exactly once.
    pub fn from_entries<I>(entries: I) -> CreditResult<Self>
    where
        I: IntoIterator<Item = (CreditScoreGrade, GradePolicy)>,
    {
        let mut slots: [Option<GradePolicy>; 5] = [None; 5];

        for (grade, policy) in entries {
            policy.validate(grade)?;
            let slot = &mut slots[grade.index()];
            if slot.is_some() {
                return Err(CreditError::InvalidConfig(format!(
                    "grade {grade} appears more than once in the policy table"
                )));
            }
            *slot = Some(policy);
        }

        let mut policies = [GradePolicy::new(0.0, 0.0); 5];
        for grade in CreditScoreGrade::ALL {
            policies[grade.index()] = slots[grade.index()].ok_or_else(|| {
                CreditError::InvalidConfig(format!("grade {grade} is missing from the policy table"))
            })?;
        }

        Ok(Self { policies })
    }

    pub fn get(&self, grade: CreditScoreGrade) -> &GradePolicy {
        &self.policies[grade.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CreditScoreGrade, &GradePolicy)> {
        CreditScoreGrade::ALL.into_iter().map(move |g| (g, self.get(g)))
    }
}

impl Default for GradePolicyTable {
    fn default() -> Self {
        Self::default_product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grades() {
        for grade in CreditScoreGrade::ALL {
            assert_eq!(grade.as_str().parse::<CreditScoreGrade>().unwrap(), grade);
        }
        assert_eq!(" b ".parse::<CreditScoreGrade>().unwrap(), CreditScoreGrade::B);
    }

    #[test]
    fn test_unknown_grade_is_an_error() {
        for bad in ["F", "", "AA", "1"] {
            match bad.parse::<CreditScoreGrade>() {
                Err(CreditError::InvalidGrade(raw)) => assert_eq!(raw, bad),
                other => panic!("expected InvalidGrade for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_default_table() {
        let table = GradePolicyTable::default_product();

        assert_eq!(table.get(CreditScoreGrade::A).max_limit, 30_000.0);
        for grade in [CreditScoreGrade::B, CreditScoreGrade::C, CreditScoreGrade::D, CreditScoreGrade::E] {
            assert_eq!(table.get(grade).max_limit, 20_000.0);
            assert!(table.get(CreditScoreGrade::A).max_limit > table.get(grade).max_limit);
        }

        let usage: Vec<f64> = table.iter().map(|(_, p)| p.income_usage).collect();
        assert_eq!(usage, vec![1.0, 0.75, 0.5, 0.25, 0.1]);
    }

    #[test]
    fn test_from_entries_requires_every_grade() {
        let partial = CreditScoreGrade::ALL[..4]
            .iter()
            .map(|&g| (g, GradePolicy::new(0.5, 10_000.0)));
        let err = GradePolicyTable::from_entries(partial).unwrap_err();
        assert!(err.to_string().contains("grade E is missing"));
    }

    #[test]
    fn test_from_entries_rejects_duplicates_and_bad_values() {
        let mut entries: Vec<_> = CreditScoreGrade::ALL
            .iter()
            .map(|&g| (g, GradePolicy::new(0.5, 10_000.0)))
            .collect();
        entries.push((CreditScoreGrade::C, GradePolicy::new(0.5, 10_000.0)));
        assert!(GradePolicyTable::from_entries(entries).is_err());

        let bad_usage = CreditScoreGrade::ALL
            .iter()
            .map(|&g| (g, GradePolicy::new(1.5, 10_000.0)));
        assert!(GradePolicyTable::from_entries(bad_usage).is_err());
    }

    #[test]
    fn test_from_entries_any_order() {
        let entries = CreditScoreGrade::ALL
            .iter()
            .rev()
            .map(|&g| (g, GradePolicy::new(0.2, 1_000.0 * (g.index() + 1) as f64)));
        let table = GradePolicyTable::from_entries(entries).unwrap();
        assert_eq!(table.get(CreditScoreGrade::A).max_limit, 1_000.0);
        assert_eq!(table.get(CreditScoreGrade::E).max_limit, 5_000.0);
    }
}
