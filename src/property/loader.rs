//! Load a portfolio of properties from a flat CSV file
//!
//! One row per property. Empty cells are treated as absent so the
//! settings defaults apply to them.

use csv::Reader;
use std::io::Read;
use std::path::Path;

use super::{FinancingTerms, GrowthAssumptions, OperatingExpenses, OtherIncome, PropertyParameters};
use crate::error::{AnalysisError, LoadError};

/// Raw CSV row matching portfolio.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    property_id: String,
    purchase_price: Option<f64>,
    fair_market_value: Option<f64>,
    #[serde(default)]
    repair_costs: Option<f64>,
    #[serde(default)]
    closing_cost_percent: Option<f64>,
    #[serde(default)]
    gross_annual_rent: Option<f64>,
    #[serde(default)]
    monthly_rent_per_unit: Option<f64>,
    #[serde(default)]
    units: Option<u32>,
    #[serde(default)]
    vacancy_rate: Option<f64>,
    #[serde(default)]
    other_income: Option<f64>,
    #[serde(default)]
    property_tax: Option<f64>,
    #[serde(default)]
    insurance: Option<f64>,
    #[serde(default)]
    management_rate: Option<f64>,
    #[serde(default)]
    maintenance_rate: Option<f64>,
    #[serde(default)]
    capex_rate: Option<f64>,
    #[serde(default)]
    hoa: Option<f64>,
    #[serde(default)]
    utilities: Option<f64>,
    #[serde(default)]
    other_expenses: Option<f64>,
    #[serde(default)]
    loan_to_value: Option<f64>,
    #[serde(default)]
    interest_rate: Option<f64>,
    #[serde(default)]
    amortization_years: Option<u32>,
    #[serde(default)]
    appreciation_rate: Option<f64>,
    #[serde(default)]
    rent_growth_rate: Option<f64>,
    #[serde(default)]
    expense_growth_rate: Option<f64>,
    #[serde(default)]
    selling_cost_rate: Option<f64>,
}

impl CsvRow {
    fn into_parameters(self) -> Result<PropertyParameters, AnalysisError> {
        if self.purchase_price.is_none() {
            return Err(AnalysisError::MissingField {
                field: "purchase_price".to_string(),
            });
        }

        Ok(PropertyParameters {
            property_id: self.property_id,
            purchase_price: self.purchase_price,
            fair_market_value: self.fair_market_value,
            repair_costs: self.repair_costs.unwrap_or(0.0),
            closing_cost_percent: self.closing_cost_percent,
            gross_annual_rent: self.gross_annual_rent,
            monthly_rent_per_unit: self.monthly_rent_per_unit,
            number_of_units: self.units,
            vacancy_rate_percent: self.vacancy_rate,
            other_income: OtherIncome {
                other: self.other_income.unwrap_or(0.0),
                ..Default::default()
            },
            operating_expenses: OperatingExpenses {
                property_tax: self.property_tax.unwrap_or(0.0),
                insurance: self.insurance.unwrap_or(0.0),
                management_percent: self.management_rate,
                maintenance_percent: self.maintenance_rate,
                capex_percent: self.capex_rate,
                hoa: self.hoa.unwrap_or(0.0),
                utilities: self.utilities.unwrap_or(0.0),
                other: self.other_expenses.unwrap_or(0.0),
            },
            financing: FinancingTerms {
                loan_to_value_percent: self.loan_to_value,
                interest_rate_percent: self.interest_rate,
                amortization_years: self.amortization_years,
                ..Default::default()
            },
            growth: GrowthAssumptions {
                appreciation_percent: self.appreciation_rate,
                rent_growth_percent: self.rent_growth_rate,
                expense_growth_percent: self.expense_growth_rate,
                selling_cost_percent: self.selling_cost_rate,
            },
            ..Default::default()
        })
    }
}

/// Properties read from a portfolio file, with the rows that could not be used
#[derive(Debug, Default)]
pub struct PortfolioLoad {
    pub properties: Vec<PropertyParameters>,

    /// One entry per skipped row, in file order
    pub rejected: Vec<LoadError>,
}

/// Load all properties from a CSV file
pub fn load_properties<P: AsRef<Path>>(path: P) -> Result<PortfolioLoad, LoadError> {
    let reader = Reader::from_path(path)?;
    collect_rows(reader)
}

/// Load properties from any reader (e.g., string buffer, request body)
pub fn load_properties_from_reader<R: Read>(reader: R) -> Result<PortfolioLoad, LoadError> {
    collect_rows(Reader::from_reader(reader))
}

/// Only an unreadable source fails the load; a row that does not parse or
/// convert is recorded in `rejected` and the next row is read.
fn collect_rows<R: Read>(mut reader: Reader<R>) -> Result<PortfolioLoad, LoadError> {
    reader.headers()?;
    let mut load = PortfolioLoad::default();

    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                load.rejected.push(e.into());
                continue;
            }
        };
        match row.into_parameters() {
            Ok(params) => load.properties.push(params),
            Err(source) => load.rejected.push(LoadError::InvalidRow { row: i + 1, source }),
        }
    }

    Ok(load)
}
