//! Pay-later credit CLI
//!
//! # Usage
//!
//! ```bash
//! # Size a credit limit
//! paylater limit --grade A --inflow 6000
//!
//! # Amortization schedule for a financing
//! paylater schedule --amount 9000 --periods 3
//!
//! # Underwrite, then draw several financings against the limit
//! paylater plan --grade A --inflow 6000 --finance 500x3 --finance 300x6
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use paylater_credit::report::{self, ReportFormat};
use paylater_credit::session::UNDERWRITING_PERIODS;
use paylater_credit::{
    BalanceCarry, CreditCalculator, CreditLine, CreditScoreGrade, FinancingConfig, ProductConfig, RoundingRule,
};

/// Pay-later credit limit and installment calculator
#[derive(Parser)]
#[command(name = "paylater")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Directory holding grade_policy.csv and financing_terms.csv
    #[arg(long, global = true)]
    product_dir: Option<PathBuf>,

    /// Override the nominal annual rate (e.g. 0.15)
    #[arg(long, global = true)]
    annual_rate: Option<f64>,

    /// Override the repayment period length in days
    #[arg(long, global = true)]
    period_days: Option<u32>,

    /// Override the rounding rule
    #[arg(long, value_enum, global = true)]
    rounding: Option<RoundingArg>,

    /// Never carry a negative balance into the next period
    #[arg(long, global = true)]
    clamp_balance: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the financing terms and grade policy table
    Product,

    /// Size a credit limit from grade and six-month inflow
    Limit(LimitArgs),

    /// Build the amortization schedule for a financing
    Schedule(ScheduleArgs),

    /// Underwrite a borrower and draw financings against the limit
    Plan(PlanArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable table format
    Table,
    /// CSV format
    Csv,
    /// JSON format
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => ReportFormat::Table,
            OutputFormat::Csv => ReportFormat::Csv,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoundingArg {
    HalfEven,
    HalfAwayFromZero,
}

impl From<RoundingArg> for RoundingRule {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::HalfEven => RoundingRule::HalfEven,
            RoundingArg::HalfAwayFromZero => RoundingRule::HalfAwayFromZero,
        }
    }
}

#[derive(Args)]
struct LimitArgs {
    /// Credit score grade (A-E)
    #[arg(short, long, value_parser = parse_grade)]
    grade: CreditScoreGrade,

    /// Sum of inflows over the last six months
    #[arg(short, long)]
    inflow: f64,

    /// Period count the limit is sized over
    #[arg(short, long, default_value_t = UNDERWRITING_PERIODS)]
    periods: u32,
}

#[derive(Args)]
struct ScheduleArgs {
    /// Amount to finance
    #[arg(short, long)]
    amount: f64,

    /// Number of repayments
    #[arg(short, long)]
    periods: u32,
}

#[derive(Args)]
struct PlanArgs {
    /// Credit score grade (A-E)
    #[arg(short, long, value_parser = parse_grade)]
    grade: CreditScoreGrade,

    /// Sum of inflows over the last six months
    #[arg(short, long)]
    inflow: f64,

    /// Financing request as AMOUNTxREPAYMENTS, e.g. 500x3 (repeatable)
    #[arg(long = "finance", value_parser = parse_financing)]
    financings: Vec<(f64, u32)>,
}

fn parse_grade(s: &str) -> Result<CreditScoreGrade, String> {
    s.parse().map_err(|e: paylater_credit::CreditError| e.to_string())
}

fn parse_financing(s: &str) -> Result<(f64, u32), String> {
    let (amount, periods) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected AMOUNTxREPAYMENTS, got {s:?}"))?;
    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad amount {amount:?}: {e}"))?;
    let periods = periods
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad repayment count {periods:?}: {e}"))?;
    Ok((amount, periods))
}

/// Resolve the product configuration from defaults, CSV files and overrides
fn load_product(cli: &Cli) -> Result<ProductConfig> {
    let product = match &cli.product_dir {
        Some(dir) => ProductConfig::from_csv_path(dir)
            .with_context(|| format!("Failed to load product configuration from {}", dir.display()))?,
        None => ProductConfig::default_product(),
    };

    let mut terms = product.financing.terms();
    if let Some(rate) = cli.annual_rate {
        terms.annual_rate = rate;
    }
    if let Some(days) = cli.period_days {
        terms.period_days = days;
    }
    if let Some(rounding) = cli.rounding {
        terms.rounding = rounding.into();
    }
    if cli.clamp_balance {
        terms.balance_carry = BalanceCarry::Clamped;
    }

    let financing = FinancingConfig::from_terms(terms).context("Invalid financing terms")?;
    Ok(product.with_financing(financing))
}

fn run_plan<W: Write>(out: &mut W, calculator: CreditCalculator, args: &PlanArgs, format: ReportFormat) -> Result<()> {
    let mut line = CreditLine::new(calculator);
    let breakdown = line.underwrite(args.grade, args.inflow)?;
    let limit = breakdown.credit_limit;

    // Status lines go to stderr when stdout carries machine-readable output
    let mut status = |message: String| -> std::io::Result<()> {
        if format == ReportFormat::Table {
            writeln!(out, "{message}")
        } else {
            eprintln!("{message}");
            Ok(())
        }
    };

    status(format!("Client's credit limit is {limit:.2}"))?;

    for &(amount, periods) in &args.financings {
        match line.finance(amount, periods) {
            Ok(plan) => status(format!(
                "{:.2} financed in {} times, for a monthly installment of {:.2}",
                amount,
                periods,
                plan.schedule.installment()
            ))?,
            Err(err) => status(format!("Financing of {amount:.2} rejected: {err}"))?,
        }
    }
    status(String::new())?;

    report::write_credit_line(out, &line, format)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let format: ReportFormat = cli.format.into();
    let product = load_product(&cli)?;
    let calculator = CreditCalculator::new(product);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Product => report::write_product(&mut out, calculator.product(), format)?,
        Commands::Limit(args) => {
            let breakdown = calculator.compute_limit_breakdown(args.grade, args.inflow, args.periods)?;
            report::write_limit(&mut out, &breakdown, format)?;
        }
        Commands::Schedule(args) => {
            let schedule = calculator.compute_monthly_installments(args.amount, args.periods)?;
            report::write_schedule(&mut out, &schedule, format)?;
        }
        Commands::Plan(args) => run_plan(&mut out, calculator, args, format)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_financing() {
        assert_eq!(parse_financing("500x3").unwrap(), (500.0, 3));
        assert_eq!(parse_financing(" 12.5 X 9 ").unwrap(), (12.5, 9));
        assert!(parse_financing("500").is_err());
        assert!(parse_financing("abcx3").is_err());
        assert!(parse_financing("500x-1").is_err());
    }

    #[test]
    fn test_cli_parses_plan() {
        let cli = Cli::try_parse_from([
            "paylater", "--format", "json", "plan", "--grade", "b", "--inflow", "6000", "--finance", "500x3",
            "--finance", "100x6",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.grade, CreditScoreGrade::B);
                assert_eq!(args.financings, vec![(500.0, 3), (100.0, 6)]);
            }
            _ => panic!("expected plan command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_grade() {
        assert!(Cli::try_parse_from(["paylater", "limit", "--grade", "F", "--inflow", "6000"]).is_err());
    }

    #[test]
    fn test_overrides_rederive_rate() {
        let cli = Cli::try_parse_from([
            "paylater", "--annual-rate", "0.5", "--period-days", "365", "--clamp-balance", "product",
        ])
        .unwrap();
        let product = load_product(&cli).unwrap();

        assert_eq!(product.financing.periodic_rate(), 0.5);
        assert_eq!(product.financing.balance_carry(), BalanceCarry::Clamped);
    }

    #[test]
    fn test_plan_walkthrough_reports_rejections() {
        let args = PlanArgs {
            grade: CreditScoreGrade::A,
            inflow: 6000.0,
            financings: vec![(500.0, 3), (600.0, 3), (100.0, 4), (477.32, 9)],
        };
        let mut out = Vec::new();
        run_plan(&mut out, CreditCalculator::default(), &args, ReportFormat::Table).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Client's credit limit is 977.32"));
        assert!(text.contains("500.00 financed in 3 times"));
        assert!(text.contains("Financing of 600.00 rejected"));
        assert!(text.contains("Financing of 100.00 rejected"));
        assert!(text.contains("Financing plan 2"));
        assert!(text.trim_end().ends_with("Remaining credit limit: 0.00"));
    }
}
