//! Rendering of limit breakdowns, schedules and credit lines
//!
//! Three formats: an aligned text table for terminals, CSV, and JSON.

use std::io::Write;

use serde::Serialize;

use crate::calculator::{AmortizationSchedule, LimitBreakdown};
use crate::error::CreditResult;
use crate::product::ProductConfig;
use crate::session::{CreditLine, FinancingPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Csv,
    Json,
}

fn write_json<W: Write, T: Serialize + ?Sized>(mut w: W, value: &T) -> CreditResult<()> {
    serde_json::to_writer_pretty(&mut w, value)?;
    writeln!(w)?;
    Ok(())
}

/// Write the product configuration
pub fn write_product<W: Write>(mut w: W, product: &ProductConfig, format: ReportFormat) -> CreditResult<()> {
    let financing = &product.financing;
    match format {
        ReportFormat::Json => write_json(w, product),
        ReportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(w);
            csv_writer.write_record(["Grade", "IncomeUsage", "MaxLimit"])?;
            for (grade, policy) in product.grades.iter() {
                csv_writer.write_record([
                    grade.to_string(),
                    policy.income_usage.to_string(),
                    format!("{:.2}", policy.max_limit),
                ])?;
            }
            csv_writer.flush()?;
            Ok(())
        }
        ReportFormat::Table => {
            writeln!(w, "Annual rate:    {}", financing.annual_rate())?;
            writeln!(w, "Period length:  {} days", financing.period_days())?;
            writeln!(w, "Periodic rate:  {:.6}", financing.periodic_rate())?;
            writeln!(w, "Rounding:       {:?}", financing.rounding())?;
            writeln!(w, "Balance carry:  {:?}", financing.balance_carry())?;
            writeln!(w)?;
            writeln!(w, "{:>5} {:>12} {:>12}", "Grade", "IncomeUsage", "MaxLimit")?;
            writeln!(w, "{}", "-".repeat(31))?;
            for (grade, policy) in product.grades.iter() {
                writeln!(w, "{:>5} {:>12} {:>12.2}", grade, policy.income_usage, policy.max_limit)?;
            }
            Ok(())
        }
    }
}

/// Write a limit breakdown
pub fn write_limit<W: Write>(mut w: W, breakdown: &LimitBreakdown, format: ReportFormat) -> CreditResult<()> {
    match format {
        ReportFormat::Json => write_json(w, breakdown),
        ReportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(w);
            csv_writer.serialize(breakdown)?;
            csv_writer.flush()?;
            Ok(())
        }
        ReportFormat::Table => {
            writeln!(w, "Grade:              {}", breakdown.grade)?;
            writeln!(w, "Inflow (6 months):  {:.2}", breakdown.sum_inflow_6m)?;
            writeln!(w, "Periods:            {}", breakdown.periods)?;
            writeln!(w, "Monthly capacity:   {:.2}", breakdown.monthly_capacity)?;
            writeln!(w, "Grade installment:  {:.2}", breakdown.max_installment)?;
            writeln!(w, "Final installment:  {:.2} ({:?})", breakdown.final_installment, breakdown.binding)?;
            writeln!(w, "Credit limit:       {:.2}", breakdown.credit_limit)?;
            Ok(())
        }
    }
}

fn write_schedule_table<W: Write>(w: &mut W, schedule: &AmortizationSchedule) -> CreditResult<()> {
    writeln!(
        w,
        "{:>13} {:>19} {:>10} {:>12} {:>17}",
        "Installment #", "Monthly Installment", "Interest", "Capital", "Remaining Capital"
    )?;
    writeln!(w, "{}", "-".repeat(75))?;
    for row in schedule.rows() {
        writeln!(
            w,
            "{:>13} {:>19.2} {:>10.2} {:>12.2} {:>17.2}",
            row.period, row.installment, row.interest, row.capital, row.remaining_capital
        )?;
    }
    let summary = schedule.summary();
    writeln!(
        w,
        "Total paid {:.2} (interest {:.2}, capital {:.2})",
        summary.total_paid, summary.total_interest, summary.total_capital
    )?;
    Ok(())
}

/// Write an amortization schedule
pub fn write_schedule<W: Write>(mut w: W, schedule: &AmortizationSchedule, format: ReportFormat) -> CreditResult<()> {
    match format {
        ReportFormat::Json => write_json(w, schedule),
        ReportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(w);
            for row in schedule.rows() {
                csv_writer.serialize(row)?;
            }
            csv_writer.flush()?;
            Ok(())
        }
        ReportFormat::Table => {
            writeln!(
                w,
                "{:.2} financed in {} installments of {:.2} at {:.4}% per period",
                schedule.amount(),
                schedule.periods(),
                schedule.installment(),
                schedule.periodic_rate() * 100.0
            )?;
            write_schedule_table(&mut w, schedule)
        }
    }
}

#[derive(Serialize)]
struct CreditLineReport<'a> {
    underwriting: Option<&'a LimitBreakdown>,
    plans: &'a [FinancingPlan],
    remaining_limit: Option<f64>,
}

/// Row of the flattened credit line CSV
#[derive(Serialize)]
struct PlanRow {
    plan: usize,
    amount: f64,
    period: u32,
    installment: f64,
    interest: f64,
    capital: f64,
    remaining_capital: f64,
}

/// Write every plan of a credit line and the remaining limit
pub fn write_credit_line<W: Write>(mut w: W, line: &CreditLine, format: ReportFormat) -> CreditResult<()> {
    match format {
        ReportFormat::Json => write_json(
            w,
            &CreditLineReport {
                underwriting: line.underwriting(),
                plans: line.plans(),
                remaining_limit: line.remaining_limit(),
            },
        ),
        ReportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(w);
            for plan in line.plans() {
                for row in plan.schedule.rows() {
                    csv_writer.serialize(PlanRow {
                        plan: plan.plan_number,
                        amount: plan.amount,
                        period: row.period,
                        installment: row.installment,
                        interest: row.interest,
                        capital: row.capital,
                        remaining_capital: row.remaining_capital,
                    })?;
                }
            }
            csv_writer.flush()?;
            Ok(())
        }
        ReportFormat::Table => {
            writeln!(w, "Repayment options: {:?}", line.repayment_options())?;
            writeln!(w)?;
            for plan in line.plans() {
                writeln!(w, "Financing plan {}", plan.plan_number)?;
                write_schedule_table(&mut w, &plan.schedule)?;
                writeln!(w)?;
            }
            match line.remaining_limit() {
                Some(limit) => writeln!(w, "Remaining credit limit: {limit:.2}")?,
                None => writeln!(w, "No credit limit granted")?,
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::CreditCalculator;
    use crate::product::CreditScoreGrade;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> CreditResult<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_schedule_table() {
        let calc = CreditCalculator::default();
        let schedule = calc.compute_monthly_installments(9000.0, 3).unwrap();
        let text = render(|w| write_schedule(w, &schedule, ReportFormat::Table));

        assert!(text.starts_with("9000.00 financed in 3 installments of 3069.59 at 1.1554% per period"));
        assert!(text.contains("Remaining Capital"));
        assert!(text.contains("6034.40"));
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn test_schedule_csv() {
        let calc = CreditCalculator::default();
        let schedule = calc.compute_monthly_installments(100.0, 1).unwrap();
        let text = render(|w| write_schedule(w, &schedule, ReportFormat::Csv));

        assert_eq!(
            text,
            "period,installment,interest,capital,remaining_capital\n1,101.16,1.16,100.0,0.0\n"
        );
    }

    #[test]
    fn test_limit_json() {
        let calc = CreditCalculator::default();
        let breakdown = calc.compute_limit_breakdown(CreditScoreGrade::A, 6000.0, 3).unwrap();
        let text = render(|w| write_limit(w, &breakdown, ReportFormat::Json));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["grade"], "A");
        assert_eq!(value["credit_limit"], 977.32);
        assert_eq!(value["binding"], "Affordability");
    }

    #[test]
    fn test_credit_line_outputs() {
        let mut line = CreditLine::new(CreditCalculator::default());
        line.underwrite(CreditScoreGrade::A, 6000.0).unwrap();
        line.finance(300.0, 3).unwrap();
        line.finance(200.0, 6).unwrap();

        let table = render(|w| write_credit_line(w, &line, ReportFormat::Table));
        assert!(table.starts_with("Repayment options: [3, 6, 9]"));
        assert!(table.contains("Financing plan 1"));
        assert!(table.contains("Financing plan 2"));
        assert!(table.trim_end().ends_with("Remaining credit limit: 477.32"));

        let csv_text = render(|w| write_credit_line(w, &line, ReportFormat::Csv));
        assert_eq!(csv_text.lines().count(), 1 + 3 + 6);

        let json = render(|w| write_credit_line(w, &line, ReportFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["plans"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["remaining_limit"], 477.32);
    }

    #[test]
    fn test_product_table() {
        let product = ProductConfig::default_product();
        let text = render(|w| write_product(w, &product, ReportFormat::Table));
        assert!(text.contains("Periodic rate:  0.011554"));
        assert!(text.contains("30000.00"));

        let csv_text = render(|w| write_product(w, &product, ReportFormat::Csv));
        assert_eq!(csv_text.lines().nth(1), Some("A,1,30000.00"));
    }
}
