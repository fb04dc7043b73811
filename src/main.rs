//! Rental Projection CLI
//!
//! Command-line interface for analyzing a single property

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rental_projection::{Defaults, PropertyAnalysis, PropertyParameters, ScenarioRunner, SensitivityField};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "property_analysis", version, about = "Year-one and hold-period analysis for a rental property")]
struct Cli {
    /// Settings CSV (`setting,value`); defaults to data/defaults.csv when present
    #[arg(long, global = true)]
    defaults: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one property described by a JSON file
    Analyze {
        /// Property parameters JSON
        params: PathBuf,

        /// Write the yearly projection rows to this CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the full analysis as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Re-run one property across a range of values for a single input
    Sensitivity {
        /// Property parameters JSON
        params: PathBuf,

        /// Input to vary
        #[arg(long, value_enum)]
        field: CliSensitivityField,

        /// Comma-separated values (percents, or dollars for purchase price)
        #[arg(long, value_delimiter = ',', required = true)]
        values: Vec<f64>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliSensitivityField {
    InterestRate,
    LoanToValue,
    Appreciation,
    RentGrowth,
    Vacancy,
    PurchasePrice,
}

impl From<CliSensitivityField> for SensitivityField {
    fn from(value: CliSensitivityField) -> Self {
        match value {
            CliSensitivityField::InterestRate => SensitivityField::InterestRate,
            CliSensitivityField::LoanToValue => SensitivityField::LoanToValue,
            CliSensitivityField::Appreciation => SensitivityField::Appreciation,
            CliSensitivityField::RentGrowth => SensitivityField::RentGrowth,
            CliSensitivityField::Vacancy => SensitivityField::Vacancy,
            CliSensitivityField::PurchasePrice => SensitivityField::PurchasePrice,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    analysis: &'a PropertyAnalysis,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let defaults = match &cli.defaults {
        Some(path) => Defaults::from_csv_path(path)
            .with_context(|| format!("Failed to load defaults from {}", path.display()))?,
        None => Defaults::load_default().context("Failed to load data/defaults.csv")?,
    };
    let runner = ScenarioRunner::with_defaults(defaults);

    match cli.command {
        Command::Analyze { params, csv, json } => {
            let property = load_property(&params)?;
            let analysis = runner
                .run(&property)
                .with_context(|| format!("Cannot analyze {}", params.display()))?;

            if json {
                let report = JsonReport {
                    generated_at: Utc::now(),
                    analysis: &analysis,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_year_one(&analysis);
                print_projection(&analysis);
            }

            if let Some(path) = csv {
                write_projection_csv(&path, &analysis)?;
                info!("Projection written to {}", path.display());
            }
        }
        Command::Sensitivity { params, field, values } => {
            let property = load_property(&params)?;
            let points = runner.sensitivity(&property, field.into(), &values);

            println!("Sensitivity on {:?}", field);
            println!(
                "{:>12} {:>12} {:>10} {:>10} {:>8} {:>14} {:>10}",
                "Value", "Cash Flow", "Cap Rate", "CoC", "DCR", "Sale Proceeds", "IRR"
            );
            println!("{}", "-".repeat(82));
            for point in &points {
                match &point.analysis {
                    Ok(a) => {
                        let q = &a.year_one.quick_analysis;
                        println!(
                            "{:>12.2} {:>12.2} {:>9.2}% {:>9.2}% {:>8.2} {:>14.2} {:>9.2}%",
                            point.value,
                            a.year_one.cashflow.annual,
                            q.cap_rate_purchase,
                            q.cash_on_cash_roi,
                            q.debt_coverage_ratio,
                            a.summary.final_sale_proceeds,
                            a.summary.final_irr,
                        );
                    }
                    Err(e) => println!("{:>12.2}  error: {}", point.value, e),
                }
            }
        }
    }

    Ok(())
}

fn load_property(path: &Path) -> Result<PropertyParameters> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    PropertyParameters::from_json_str(&json).with_context(|| format!("Invalid property JSON in {}", path.display()))
}

fn print_year_one(analysis: &PropertyAnalysis) {
    let a = &analysis.year_one;
    let q = &a.quick_analysis;

    println!("Property: {}", a.property_info.property_id);
    println!("  Purchase Price:      ${:.2}", a.purchase.purchase_price);
    println!("  Real Purchase Price: ${:.2}", a.purchase.real_purchase_price);
    println!("  Loan Principal:      ${:.2}", a.financing.total_principal);
    println!("  Monthly Debt Svc:    ${:.2}", a.financing.monthly_debt_service);
    println!("  Cash Invested:       ${:.2}", a.cash_requirements.total_cash_invested);
    println!();
    println!("Year One:");
    println!("  Effective Income:    ${:.2}", a.income.effective_gross_income);
    println!("  Operating Expenses:  ${:.2}", a.expenses.total);
    println!("  NOI:                 ${:.2} (${:.2}/mo)", a.noi.annual, a.noi.monthly);
    println!("  Cash Flow:           ${:.2} (${:.2}/mo)", a.cashflow.annual, a.cashflow.monthly);
    println!();
    println!("Quick Analysis:");
    println!("  Cap Rate (purchase): {:.2}%", q.cap_rate_purchase);
    println!("  Cap Rate (market):   {:.2}%", q.cap_rate_market);
    println!("  Cash-on-Cash ROI:    {:.2}%", q.cash_on_cash_roi);
    println!("  Total ROI:           {:.2}%", q.total_roi);
    println!("  GRM:                 {:.2}", q.gross_rent_multiplier);
    println!("  DCR:                 {:.2}", q.debt_coverage_ratio);
    println!("  Break-even Ratio:    {:.2}%", q.break_even_ratio);
    println!();
}

fn print_projection(analysis: &PropertyAnalysis) {
    println!("Projection ({} years):", analysis.projection.rows.len());
    println!(
        "{:>4} {:>14} {:>12} {:>12} {:>12} {:>14} {:>14} {:>8}",
        "Year", "Value", "NOI", "Cash Flow", "Loan Bal", "Equity", "Sale Proceeds", "IRR"
    );
    println!("{}", "-".repeat(98));

    for row in &analysis.projection.rows {
        println!(
            "{:>4} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2} {:>14.2} {:>7.2}%",
            row.year,
            row.property_value,
            row.noi,
            row.cash_flow,
            row.loan_balance,
            row.total_equity,
            row.sale_proceeds,
            row.irr,
        );
    }

    let s = &analysis.summary;
    println!();
    println!("Summary:");
    println!("  Total Cash Flow:     ${:.2}", s.total_cash_flow);
    println!("  Final Equity:        ${:.2}", s.final_equity);
    println!("  Total Profit:        ${:.2}", s.final_total_profit);
    match s.final_discounted_irr {
        Some(irr) => println!("  Discounted IRR:      {:.2}%", irr),
        None => println!("  Discounted IRR:      n/a"),
    }
    if let Some(year) = s.loan_payoff_year {
        println!("  Loan Paid Off:       year {}", year);
    }
}

fn write_projection_csv(path: &Path, analysis: &PropertyAnalysis) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for row in &analysis.projection.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
