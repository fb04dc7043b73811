//! Run the analysis for every property in a portfolio CSV
//!
//! Outputs one summary line per property; rows that cannot be read and
//! properties that fail validation are logged and skipped.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rental_projection::property::load_properties;
use rental_projection::{Defaults, PropertyAnalysis, ScenarioRunner};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_portfolio", about = "Analyze every property in a portfolio CSV")]
struct Args {
    /// Portfolio CSV, one property per row
    #[arg(default_value = "data/portfolio.csv")]
    portfolio: PathBuf,

    /// Summary CSV to write
    #[arg(long, default_value = "portfolio_summary.csv")]
    output: PathBuf,

    /// Settings CSV (`setting,value`); defaults to data/defaults.csv when present
    #[arg(long)]
    defaults: Option<PathBuf>,
}

/// One property's headline figures
#[derive(Debug, Serialize)]
struct SummaryRow {
    property_id: String,
    purchase_price: f64,
    total_cash_invested: f64,
    noi: f64,
    annual_cash_flow: f64,
    cap_rate_purchase: f64,
    cash_on_cash_roi: f64,
    debt_coverage_ratio: f64,
    final_equity: f64,
    final_sale_proceeds: f64,
    total_cash_flow: f64,
    final_irr: f64,
    discounted_irr: Option<f64>,
}

impl SummaryRow {
    fn from_analysis(a: &PropertyAnalysis) -> Self {
        let y1 = &a.year_one;
        Self {
            property_id: y1.property_info.property_id.clone(),
            purchase_price: y1.purchase.purchase_price,
            total_cash_invested: y1.cash_requirements.total_cash_invested,
            noi: y1.noi.annual,
            annual_cash_flow: y1.cashflow.annual,
            cap_rate_purchase: y1.quick_analysis.cap_rate_purchase,
            cash_on_cash_roi: y1.quick_analysis.cash_on_cash_roi,
            debt_coverage_ratio: y1.quick_analysis.debt_coverage_ratio,
            final_equity: a.summary.final_equity,
            final_sale_proceeds: a.summary.final_sale_proceeds,
            total_cash_flow: a.summary.total_cash_flow,
            final_irr: a.summary.final_irr,
            discounted_irr: a.summary.final_discounted_irr,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading properties from {}...", args.portfolio.display());

    let load = load_properties(&args.portfolio)
        .with_context(|| format!("Failed to load portfolio {}", args.portfolio.display()))?;
    for rejected in &load.rejected {
        warn!("Skipping unreadable row: {}", rejected);
    }
    let properties = load.properties;
    println!(
        "Loaded {} properties ({} rows rejected) in {:?}",
        properties.len(),
        load.rejected.len(),
        start.elapsed()
    );

    let defaults = match &args.defaults {
        Some(path) => Defaults::from_csv_path(path)
            .with_context(|| format!("Failed to load defaults from {}", path.display()))?,
        None => Defaults::load_default().context("Failed to load data/defaults.csv")?,
    };
    let runner = ScenarioRunner::with_defaults(defaults);

    let proj_start = Instant::now();
    let results = runner.run_batch(&properties);
    println!("Projected {} properties in {:?}", results.len(), proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let mut written = 0usize;
    let mut total_invested = 0.0;
    let mut total_cash_flow = 0.0;

    for (i, (params, result)) in properties.iter().zip(&results).enumerate() {
        match result {
            Ok(analysis) => {
                let row = SummaryRow::from_analysis(analysis);
                total_invested += row.total_cash_invested;
                total_cash_flow += row.annual_cash_flow;
                writer.serialize(&row)?;
                written += 1;
            }
            Err(e) => warn!("Skipping property {} ({}): {}", i + 1, params.property_id, e),
        }
    }
    writer.flush()?;

    info!("Wrote {} summary rows to {}", written, args.output.display());

    println!();
    println!("=== Portfolio Summary ===");
    println!("Properties analyzed: {} of {}", written, properties.len());
    println!("Rows rejected:       {}", load.rejected.len());
    println!("Total cash invested: ${:.2}", total_invested);
    println!("Year-one cash flow:  ${:.2}", total_cash_flow);
    println!("Summary written to {}", args.output.display());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
