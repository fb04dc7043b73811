//! Property input records as supplied by the listing, rent-estimate and settings sources

use serde::{Deserialize, Serialize};

/// A named closing-cost line item (title, appraisal, lender fees, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClosingCostItem {
    pub name: String,
    pub amount: f64,
}

impl ClosingCostItem {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// Non-rent annual income. Vacancy applies to these as well as rent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherIncome {
    pub parking: f64,
    pub laundry: f64,
    pub storage: f64,
    pub other: f64,
}

impl OtherIncome {
    pub fn total(&self) -> f64 {
        self.parking + self.laundry + self.storage + self.other
    }
}

/// Operating expense assumptions.
///
/// Dollar fields are annual amounts. Percent fields left as `None` take the
/// matching value from [`Defaults`](crate::assumptions::Defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingExpenses {
    pub property_tax: f64,
    pub insurance: f64,
    /// Percent of operating income (after vacancy)
    pub management_percent: Option<f64>,
    /// Percent of gross rent
    pub maintenance_percent: Option<f64>,
    /// Capital expenditure reserve, percent of gross rent
    pub capex_percent: Option<f64>,
    pub hoa: f64,
    pub utilities: f64,
    pub other: f64,
}

/// A second mortgage or seller-carried note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondLien {
    pub principal: f64,
    pub interest_rate_percent: f64,
    pub amortization_years: u32,
}

/// Financing terms for the purchase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingTerms {
    /// First-lien loan to value, percent of purchase price
    pub loan_to_value_percent: Option<f64>,

    /// Explicit first-lien principal; takes precedence over loan to value
    pub principal: Option<f64>,

    pub interest_rate_percent: Option<f64>,

    pub amortization_years: Option<u32>,

    /// Mortgage insurance / funding fee rolled into the first lien
    pub mortgage_insurance_percent: Option<f64>,

    pub second_lien: Option<SecondLien>,
}

/// Growth and exit assumptions for the projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthAssumptions {
    pub appreciation_percent: Option<f64>,
    pub rent_growth_percent: Option<f64>,
    pub expense_growth_percent: Option<f64>,
    pub selling_cost_percent: Option<f64>,
}

/// Everything the engine needs to analyze one property.
///
/// Rates are percents as plain numbers (`7.0` means 7%). Optional fields
/// fall back to [`Defaults`](crate::assumptions::Defaults) only when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyParameters {
    /// Caller-side label (listing id, address); not used in any formula
    pub property_id: String,

    pub purchase_price: Option<f64>,

    /// After-repair value; defaults to the purchase price
    pub fair_market_value: Option<f64>,

    pub repair_costs: f64,

    /// Contingency on top of repairs, percent of repair costs
    pub repair_contingency_percent: Option<f64>,

    /// Itemized closing costs; used instead of the percentage when any item is nonzero
    pub closing_cost_items: Vec<ClosingCostItem>,

    pub closing_cost_percent: Option<f64>,

    /// Deposits added to the cash required at closing
    pub deposits: f64,

    /// Pro-rated credits (rent, taxes) received at closing
    pub prorated_credits: f64,

    pub gross_annual_rent: Option<f64>,

    /// Used when `gross_annual_rent` is absent: gross = monthly x 12 x units
    pub monthly_rent_per_unit: Option<f64>,

    pub vacancy_rate_percent: Option<f64>,

    pub other_income: OtherIncome,

    pub operating_expenses: OperatingExpenses,

    pub financing: FinancingTerms,

    pub growth: GrowthAssumptions,

    pub number_of_units: Option<u32>,
}

impl PropertyParameters {
    /// Minimal property: price and annual gross rent, everything else defaulted
    pub fn new(purchase_price: f64, gross_annual_rent: f64) -> Self {
        Self {
            purchase_price: Some(purchase_price),
            gross_annual_rent: Some(gross_annual_rent),
            ..Default::default()
        }
    }

    /// Parse a property from JSON
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
