//! Size credit limits for an entire borrower book from a CSV file
//!
//! Outputs one row per borrower plus a console summary

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use paylater_credit::book::{load_borrowers, size_book, write_decisions, BookSummary};
use paylater_credit::session::UNDERWRITING_PERIODS;
use paylater_credit::{CreditCalculator, ProductConfig};

#[derive(Parser)]
#[command(name = "run_book", about = "Batch credit limit sizing for a borrower book")]
struct Args {
    /// Borrower book with BorrowerId, Grade and SumInflow6M columns
    #[arg(short, long, default_value = "data/book/sample_book.csv")]
    input: PathBuf,

    /// Output CSV path
    #[arg(short, long, default_value = "limit_book_output.csv")]
    output: PathBuf,

    /// Period count the limits are sized over
    #[arg(short, long, default_value_t = UNDERWRITING_PERIODS)]
    periods: u32,

    /// Directory holding grade_policy.csv and financing_terms.csv
    #[arg(long)]
    product_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading borrowers from {}...", args.input.display());

    let borrowers = load_borrowers(&args.input)
        .with_context(|| format!("Failed to load borrowers from {}", args.input.display()))?;
    println!("Loaded {} borrowers in {:?}", borrowers.len(), start.elapsed());

    let product = match &args.product_dir {
        Some(dir) => ProductConfig::from_csv_path(dir)
            .with_context(|| format!("Failed to load product configuration from {}", dir.display()))?,
        None => ProductConfig::default_product(),
    };
    let calculator = CreditCalculator::new(product);

    println!("Sizing limits over {} periods...", args.periods);
    let sizing_start = Instant::now();
    let decisions = size_book(&calculator, &borrowers, args.periods)?;
    println!("Sizing complete in {:?}", sizing_start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_decisions(BufWriter::new(file), &decisions)?;
    println!("Output written to {}", args.output.display());

    let summary = BookSummary::from_decisions(&decisions);
    println!("\nBook Summary:");
    println!("  Borrowers:        {}", summary.borrowers);
    println!("  Total limit:      {:.2}", summary.total_limit);
    println!("  Grade-capped:     {}", summary.grade_capped);
    for (grade, count) in &summary.by_grade {
        println!("  Grade {grade}:          {count}");
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
