//! Default analysis settings applied when a property leaves a field unset

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::LoadError;
use crate::financing::MAX_AMORTIZATION_YEARS;

/// Named default percentages supplied by the user-settings store.
///
/// All rates are percents as plain numbers (`5.0` means 5%). A property
/// only falls back to these when its own field is absent; an explicit `0`
/// on the property always wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Vacancy and credit loss, percent of total gross income
    pub vacancy_rate: f64,

    /// Property management, percent of operating income (post-vacancy)
    pub management_rate: f64,

    /// Maintenance and repairs, percent of gross rent
    pub maintenance_rate: f64,

    /// Capital expenditure reserve, percent of gross rent
    pub capex_rate: f64,

    /// Annual property appreciation
    pub appreciation_rate: f64,

    /// Annual rent growth
    pub rent_growth_rate: f64,

    /// Annual growth of fixed operating expenses
    pub expense_growth_rate: f64,

    /// Selling costs at exit, percent of sale price
    pub selling_cost_rate: f64,

    /// First-lien loan to value
    pub loan_to_value: f64,

    /// First-lien annual interest rate
    pub interest_rate: f64,

    /// First-lien amortization term in years
    pub amortization_years: u32,

    /// Closing costs as percent of purchase price (when not itemized)
    pub closing_cost_rate: f64,
}

impl Defaults {
    /// Standard defaults used when no user settings are available
    pub fn standard() -> Self {
        Self {
            vacancy_rate: 5.0,
            management_rate: 8.0,
            maintenance_rate: 5.0,
            capex_rate: 5.0,
            appreciation_rate: 3.0,
            rent_growth_rate: 2.0,
            expense_growth_rate: 2.0,
            selling_cost_rate: 6.0,
            loan_to_value: 80.0,
            interest_rate: 7.0,
            amortization_years: 30,
            closing_cost_rate: 3.0,
        }
    }

    /// Load settings from a `setting,value` CSV, starting from the standard defaults
    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        let mut defaults = Self::standard();
        for (name, value) in loader::load_settings(path)? {
            defaults.set(&name, value)?;
        }
        Ok(defaults)
    }

    /// Load settings from the default location, falling back to the standard
    /// defaults when no settings file exists there
    pub fn load_default() -> Result<Self, LoadError> {
        let path = Path::new(loader::DEFAULT_SETTINGS_PATH);
        if path.exists() {
            Self::from_csv_path(path)
        } else {
            Ok(Self::standard())
        }
    }

    /// Load settings from a JSON document; missing keys keep the standard value
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override a single named setting
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), LoadError> {
        match name {
            "vacancy_rate" => self.vacancy_rate = value,
            "management_rate" => self.management_rate = value,
            "maintenance_rate" => self.maintenance_rate = value,
            "capex_rate" => self.capex_rate = value,
            "appreciation_rate" => self.appreciation_rate = value,
            "rent_growth_rate" => self.rent_growth_rate = value,
            "expense_growth_rate" => self.expense_growth_rate = value,
            "selling_cost_rate" => self.selling_cost_rate = value,
            "loan_to_value" => self.loan_to_value = value,
            "interest_rate" => self.interest_rate = value,
            "amortization_years" => self.amortization_years = whole_years(name, value)?,
            "closing_cost_rate" => self.closing_cost_rate = value,
            other => return Err(LoadError::UnknownSetting(other.to_string())),
        }
        Ok(())
    }
}

/// A term in whole years, `0..=MAX_AMORTIZATION_YEARS`
fn whole_years(name: &str, value: f64) -> Result<u32, LoadError> {
    let in_range = value.is_finite() && (0.0..=MAX_AMORTIZATION_YEARS as f64).contains(&value);
    if in_range && value.fract() == 0.0 {
        Ok(value as u32)
    } else {
        Err(LoadError::InvalidSetting {
            name: name.to_string(),
            value,
        })
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self::standard()
    }
}
