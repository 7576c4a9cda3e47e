//! Borrower book: batch limit sizing from a CSV of applicants

use std::io::{Read, Write};
use std::path::Path;

use csv::{Reader, Writer};
use rayon::prelude::*;
use serde::Serialize;

use crate::calculator::{BindingConstraint, CreditCalculator, LimitBreakdown};
use crate::error::{ensure_non_negative, CreditResult};
use crate::product::CreditScoreGrade;

/// Raw CSV row matching the book input columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "BorrowerId")]
    borrower_id: String,
    #[serde(rename = "Grade")]
    grade: String,
    #[serde(rename = "SumInflow6M")]
    sum_inflow_6m: f64,
}

/// One applicant in the book
#[derive(Debug, Clone, PartialEq)]
pub struct Borrower {
    pub borrower_id: String,
    pub grade: CreditScoreGrade,
    pub sum_inflow_6m: f64,
}

impl CsvRow {
    fn to_borrower(self) -> CreditResult<Borrower> {
        let grade = self.grade.parse()?;
        ensure_non_negative(&format!("SumInflow6M for borrower {}", self.borrower_id), self.sum_inflow_6m)?;
        Ok(Borrower {
            borrower_id: self.borrower_id,
            grade,
            sum_inflow_6m: self.sum_inflow_6m,
        })
    }
}

/// Load all borrowers from a CSV file
pub fn load_borrowers<P: AsRef<Path>>(path: P) -> CreditResult<Vec<Borrower>> {
    let file = std::fs::File::open(path)?;
    load_borrowers_from_reader(file)
}

/// Load borrowers from any reader
pub fn load_borrowers_from_reader<R: Read>(reader: R) -> CreditResult<Vec<Borrower>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut borrowers = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        borrowers.push(row.to_borrower()?);
    }

    Ok(borrowers)
}

/// Limit sized for one borrower
#[derive(Debug, Clone)]
pub struct LimitDecision {
    pub borrower_id: String,
    pub breakdown: LimitBreakdown,
}

/// Size limits for every borrower in parallel, preserving input order
pub fn size_book(
    calculator: &CreditCalculator,
    borrowers: &[Borrower],
    periods: u32,
) -> CreditResult<Vec<LimitDecision>> {
    borrowers
        .par_iter()
        .map(|b| -> CreditResult<LimitDecision> {
            let breakdown = calculator.compute_limit_breakdown(b.grade, b.sum_inflow_6m, periods)?;
            Ok(LimitDecision {
                borrower_id: b.borrower_id.clone(),
                breakdown,
            })
        })
        .collect()
}

/// Output row of the sized book
#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    #[serde(rename = "BorrowerId")]
    borrower_id: &'a str,
    #[serde(rename = "Grade")]
    grade: CreditScoreGrade,
    #[serde(rename = "SumInflow6M")]
    sum_inflow_6m: f64,
    #[serde(rename = "MonthlyCapacity")]
    monthly_capacity: f64,
    #[serde(rename = "MaxInstallment")]
    max_installment: String,
    #[serde(rename = "FinalInstallment")]
    final_installment: f64,
    #[serde(rename = "CreditLimit")]
    credit_limit: f64,
    #[serde(rename = "Binding")]
    binding: BindingConstraint,
}

/// Write sized limits as CSV
pub fn write_decisions<W: Write>(writer: W, decisions: &[LimitDecision]) -> CreditResult<()> {
    let mut csv_writer = Writer::from_writer(writer);

    for decision in decisions {
        let b = &decision.breakdown;
        csv_writer.serialize(OutputRow {
            borrower_id: &decision.borrower_id,
            grade: b.grade,
            sum_inflow_6m: b.sum_inflow_6m,
            monthly_capacity: b.monthly_capacity,
            max_installment: format!("{:.6}", b.max_installment),
            final_installment: b.final_installment,
            credit_limit: b.credit_limit,
            binding: b.binding,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Aggregate figures over a sized book
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookSummary {
    pub borrowers: usize,
    pub total_limit: f64,
    pub grade_capped: usize,
    /// Borrowers per grade, in grade order
    pub by_grade: Vec<(CreditScoreGrade, usize)>,
}

impl BookSummary {
    pub fn from_decisions(decisions: &[LimitDecision]) -> Self {
        let by_grade = CreditScoreGrade::ALL
            .iter()
            .map(|&g| (g, decisions.iter().filter(|d| d.breakdown.grade == g).count()))
            .collect();

        Self {
            borrowers: decisions.len(),
            total_limit: decisions.iter().map(|d| d.breakdown.credit_limit).sum(),
            grade_capped: decisions
                .iter()
                .filter(|d| d.breakdown.binding == BindingConstraint::GradeCeiling)
                .count(),
            by_grade,
        }
    }
}
