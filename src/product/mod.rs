//! Product configuration: financing terms and the grade policy table

mod financing;
mod grade;
pub mod loader;

pub use financing::{
    BalanceCarry, FinancingConfig, FinancingTerms, DAYS_PER_YEAR, DEFAULT_ANNUAL_RATE,
    DEFAULT_PERIOD_DAYS,
};
pub use grade::{CreditScoreGrade, GradePolicy, GradePolicyTable};

use std::path::Path;

use serde::Serialize;

use crate::error::CreditResult;

/// Container for everything the calculator is priced with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductConfig {
    pub financing: FinancingConfig,
    pub grades: GradePolicyTable,
}

impl ProductConfig {
    /// Built-in configuration of the pay-later product
    pub fn default_product() -> Self {
        Self {
            financing: FinancingConfig::default(),
            grades: GradePolicyTable::default_product(),
        }
    }

    /// Load configuration from CSV files in the default location (data/product/)
    pub fn from_csv() -> CreditResult<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_PRODUCT_PATH))
    }

    /// Load configuration from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> CreditResult<Self> {
        let config = Self {
            financing: loader::load_financing_terms(path)?,
            grades: loader::load_grade_policy(path)?,
        };
        log::info!(
            "loaded product configuration from {} (periodic rate {:.6})",
            path.display(),
            config.financing.periodic_rate()
        );
        Ok(config)
    }

    pub fn with_financing(self, financing: FinancingConfig) -> Self {
        Self { financing, ..self }
    }

    pub fn with_grades(self, grades: GradePolicyTable) -> Self {
        Self { grades, ..self }
    }
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self::default_product()
    }
}
