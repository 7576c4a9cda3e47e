//! CSV-based product configuration loader
//!
//! Loads the grade policy table and the financing terms from data/product/

use std::io::Read;
use std::path::Path;

use csv::Reader;

use super::{CreditScoreGrade, FinancingConfig, FinancingTerms, GradePolicy, GradePolicyTable};
use crate::error::{CreditError, CreditResult};

/// Default path to the product configuration directory
pub const DEFAULT_PRODUCT_PATH: &str = "data/product";

pub const GRADE_POLICY_FILE: &str = "grade_policy.csv";
pub const FINANCING_TERMS_FILE: &str = "financing_terms.csv";

/// Raw row of grade_policy.csv
#[derive(Debug, serde::Deserialize)]
struct GradePolicyRow {
    #[serde(rename = "Grade")]
    grade: String,
    #[serde(rename = "IncomeUsage")]
    income_usage: f64,
    #[serde(rename = "MaxLimit")]
    max_limit: f64,
}

/// Raw row of financing_terms.csv
#[derive(Debug, serde::Deserialize)]
struct FinancingTermsRow {
    #[serde(rename = "AnnualRate")]
    annual_rate: f64,
    #[serde(rename = "PeriodDays")]
    period_days: u32,
}

/// Load the grade policy table from `<dir>/grade_policy.csv`
pub fn load_grade_policy(dir: &Path) -> CreditResult<GradePolicyTable> {
    let file = std::fs::File::open(dir.join(GRADE_POLICY_FILE))?;
    load_grade_policy_from_reader(file)
}

/// Load the grade policy table from any reader
pub fn load_grade_policy_from_reader<R: Read>(reader: R) -> CreditResult<GradePolicyTable> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in csv_reader.deserialize() {
        let row: GradePolicyRow = result?;
        let grade: CreditScoreGrade = row.grade.parse()?;
        entries.push((grade, GradePolicy::new(row.income_usage, row.max_limit)));
    }

    GradePolicyTable::from_entries(entries)
}

/// Load the financing terms from `<dir>/financing_terms.csv`
pub fn load_financing_terms(dir: &Path) -> CreditResult<FinancingConfig> {
    let file = std::fs::File::open(dir.join(FINANCING_TERMS_FILE))?;
    load_financing_terms_from_reader(file)
}

/// Load the financing terms from any reader. Exactly one row is expected.
pub fn load_financing_terms_from_reader<R: Read>(reader: R) -> CreditResult<FinancingConfig> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rows = csv_reader.deserialize::<FinancingTermsRow>();

    let row = match rows.next() {
        Some(row) => row?,
        None => {
            return Err(CreditError::InvalidConfig(
                "financing terms file has no data row".into(),
            ))
        }
    };
    if rows.next().is_some() {
        return Err(CreditError::InvalidConfig(
            "financing terms file must contain exactly one data row".into(),
        ));
    }

    FinancingConfig::from_terms(FinancingTerms {
        annual_rate: row.annual_rate,
        period_days: row.period_days,
        ..Default::default()
    })
}
