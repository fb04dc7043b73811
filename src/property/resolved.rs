//! Default resolution and input validation
//!
//! Every optional field is resolved in one place: explicit value on the
//! property, else the named default. The resolved record is validated as a
//! whole before any formula runs.

use log::debug;

use super::data::{ClosingCostItem, PropertyParameters};
use crate::analysis::pct;
use crate::assumptions::Defaults;
use crate::error::{AnalysisError, Result};
use crate::financing::MAX_AMORTIZATION_YEARS;
use crate::operations::ExpenseSchedule;

/// How closing costs are determined
#[derive(Debug, Clone, PartialEq)]
pub enum ClosingCosts {
    /// Line items, used when any item carries a nonzero amount
    Itemized(Vec<ClosingCostItem>),
    /// Percent of purchase price
    Percent(f64),
}

/// Resolved terms for one lien
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LienTerms {
    /// Principal before any financed fee
    pub principal: f64,
    pub interest_rate_percent: f64,
    pub amortization_years: u32,
}

/// A property with every default applied and every field validated
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameters {
    pub property_id: String,
    pub purchase_price: f64,
    pub fair_market_value: f64,
    pub repair_costs: f64,
    pub repair_contingency_percent: f64,
    pub closing_costs: ClosingCosts,
    pub deposits: f64,
    pub prorated_credits: f64,

    pub gross_annual_rent: f64,
    pub other_annual_income: f64,
    pub vacancy_rate_percent: f64,
    pub expenses: ExpenseSchedule,

    pub first_lien: LienTerms,
    pub mortgage_insurance_percent: f64,
    pub second_lien: Option<LienTerms>,

    pub appreciation_percent: f64,
    pub rent_growth_percent: f64,
    pub expense_growth_percent: f64,
    pub selling_cost_percent: f64,

    pub number_of_units: u32,
}

/// Reject NaN, infinities and negative values
fn check(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(AnalysisError::NonFinite {
            field: field.to_string(),
        });
    }
    if value < 0.0 {
        return Err(AnalysisError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

/// A lien with principal needs a term of one year or more; no lien may
/// exceed `MAX_AMORTIZATION_YEARS`
fn check_term(field: &str, principal: f64, years: u32) -> Result<()> {
    if (principal > 0.0 && years == 0) || years > MAX_AMORTIZATION_YEARS {
        return Err(AnalysisError::InvalidTerm {
            field: field.to_string(),
        });
    }
    Ok(())
}

impl ResolvedParameters {
    /// Apply defaults to a property and validate the result
    pub fn resolve(params: &PropertyParameters, defaults: &Defaults) -> Result<Self> {
        let purchase_price = check(
            "purchase_price",
            params.purchase_price.ok_or_else(|| AnalysisError::MissingField {
                field: "purchase_price".to_string(),
            })?,
        )?;
        let fair_market_value = check(
            "fair_market_value",
            params.fair_market_value.unwrap_or(purchase_price),
        )?;

        let repair_costs = check("repair_costs", params.repair_costs)?;
        let repair_contingency_percent = check(
            "repair_contingency_percent",
            params.repair_contingency_percent.unwrap_or(0.0),
        )?;

        for (i, item) in params.closing_cost_items.iter().enumerate() {
            check(&format!("closing_cost_items[{}].amount", i), item.amount)?;
        }
        let closing_costs = if params.closing_cost_items.iter().any(|item| item.amount != 0.0) {
            ClosingCosts::Itemized(params.closing_cost_items.clone())
        } else {
            ClosingCosts::Percent(check(
                "closing_cost_percent",
                params.closing_cost_percent.unwrap_or(defaults.closing_cost_rate),
            )?)
        };

        let number_of_units = params.number_of_units.unwrap_or(1);
        let gross_annual_rent = match (params.gross_annual_rent, params.monthly_rent_per_unit) {
            (Some(annual), _) => check("gross_annual_rent", annual)?,
            (None, Some(monthly)) => {
                check("monthly_rent_per_unit", monthly)? * 12.0 * number_of_units as f64
            }
            (None, None) => {
                return Err(AnalysisError::MissingField {
                    field: "gross_annual_rent".to_string(),
                })
            }
        };

        let other = &params.other_income;
        check("other_income.parking", other.parking)?;
        check("other_income.laundry", other.laundry)?;
        check("other_income.storage", other.storage)?;
        check("other_income.other", other.other)?;

        let opex = &params.operating_expenses;
        let expenses = ExpenseSchedule {
            property_tax: check("operating_expenses.property_tax", opex.property_tax)?,
            insurance: check("operating_expenses.insurance", opex.insurance)?,
            management_percent: check(
                "operating_expenses.management_percent",
                opex.management_percent.unwrap_or(defaults.management_rate),
            )?,
            maintenance_percent: check(
                "operating_expenses.maintenance_percent",
                opex.maintenance_percent.unwrap_or(defaults.maintenance_rate),
            )?,
            capex_percent: check(
                "operating_expenses.capex_percent",
                opex.capex_percent.unwrap_or(defaults.capex_rate),
            )?,
            hoa: check("operating_expenses.hoa", opex.hoa)?,
            utilities: check("operating_expenses.utilities", opex.utilities)?,
            other: check("operating_expenses.other", opex.other)?,
        };

        let fin = &params.financing;
        let first_principal = match fin.principal {
            Some(principal) => check("financing.principal", principal)?,
            None => {
                let ltv = check(
                    "financing.loan_to_value_percent",
                    fin.loan_to_value_percent.unwrap_or(defaults.loan_to_value),
                )?;
                purchase_price * pct(ltv)
            }
        };
        let first_lien = LienTerms {
            principal: first_principal,
            interest_rate_percent: check(
                "financing.interest_rate_percent",
                fin.interest_rate_percent.unwrap_or(defaults.interest_rate),
            )?,
            amortization_years: fin.amortization_years.unwrap_or(defaults.amortization_years),
        };
        check_term("financing.amortization_years", first_lien.principal, first_lien.amortization_years)?;

        let second_lien = match &fin.second_lien {
            Some(lien) => {
                let terms = LienTerms {
                    principal: check("financing.second_lien.principal", lien.principal)?,
                    interest_rate_percent: check(
                        "financing.second_lien.interest_rate_percent",
                        lien.interest_rate_percent,
                    )?,
                    amortization_years: lien.amortization_years,
                };
                check_term(
                    "financing.second_lien.amortization_years",
                    terms.principal,
                    terms.amortization_years,
                )?;
                Some(terms)
            }
            None => None,
        };

        let growth = &params.growth;
        let resolved = Self {
            property_id: params.property_id.clone(),
            purchase_price,
            fair_market_value,
            repair_costs,
            repair_contingency_percent,
            closing_costs,
            deposits: check("deposits", params.deposits)?,
            prorated_credits: check("prorated_credits", params.prorated_credits)?,
            gross_annual_rent,
            other_annual_income: other.total(),
            vacancy_rate_percent: check(
                "vacancy_rate_percent",
                params.vacancy_rate_percent.unwrap_or(defaults.vacancy_rate),
            )?,
            expenses,
            first_lien,
            mortgage_insurance_percent: check(
                "financing.mortgage_insurance_percent",
                fin.mortgage_insurance_percent.unwrap_or(0.0),
            )?,
            second_lien,
            appreciation_percent: check(
                "growth.appreciation_percent",
                growth.appreciation_percent.unwrap_or(defaults.appreciation_rate),
            )?,
            rent_growth_percent: check(
                "growth.rent_growth_percent",
                growth.rent_growth_percent.unwrap_or(defaults.rent_growth_rate),
            )?,
            expense_growth_percent: check(
                "growth.expense_growth_percent",
                growth.expense_growth_percent.unwrap_or(defaults.expense_growth_rate),
            )?,
            selling_cost_percent: check(
                "growth.selling_cost_percent",
                growth.selling_cost_percent.unwrap_or(defaults.selling_cost_rate),
            )?,
            number_of_units,
        };

        debug!(
            "Resolved property '{}': price={:.2} rent={:.2} first_lien={:.2}",
            resolved.property_id, resolved.purchase_price, resolved.gross_annual_rent, resolved.first_lien.principal
        );

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{FinancingTerms, GrowthAssumptions, OperatingExpenses, SecondLien};

    fn resolve(params: &PropertyParameters) -> Result<ResolvedParameters> {
        ResolvedParameters::resolve(params, &Defaults::standard())
    }

    #[test]
    fn test_absent_fields_take_defaults() {
        let r = resolve(&PropertyParameters::new(300_000.0, 30_000.0)).unwrap();

        assert_eq!(r.fair_market_value, 300_000.0);
        assert_eq!(r.vacancy_rate_percent, 5.0);
        assert_eq!(r.expenses.management_percent, 8.0);
        assert_eq!(r.expenses.maintenance_percent, 5.0);
        assert_eq!(r.expenses.capex_percent, 5.0);
        assert_eq!(r.first_lien.principal, 240_000.0);
        assert_eq!(r.first_lien.interest_rate_percent, 7.0);
        assert_eq!(r.first_lien.amortization_years, 30);
        assert_eq!(r.appreciation_percent, 3.0);
        assert_eq!(r.rent_growth_percent, 2.0);
        assert_eq!(r.expense_growth_percent, 2.0);
        assert_eq!(r.selling_cost_percent, 6.0);
        assert_eq!(r.closing_costs, ClosingCosts::Percent(3.0));
        assert_eq!(r.number_of_units, 1);
    }

    #[test]
    fn test_explicit_zero_is_honored() {
        let params = PropertyParameters {
            vacancy_rate_percent: Some(0.0),
            closing_cost_percent: Some(0.0),
            operating_expenses: OperatingExpenses {
                management_percent: Some(0.0),
                ..Default::default()
            },
            financing: FinancingTerms {
                loan_to_value_percent: Some(0.0),
                interest_rate_percent: Some(0.0),
                ..Default::default()
            },
            growth: GrowthAssumptions {
                appreciation_percent: Some(0.0),
                ..Default::default()
            },
            ..PropertyParameters::new(200_000.0, 20_000.0)
        };
        let r = resolve(&params).unwrap();

        assert_eq!(r.vacancy_rate_percent, 0.0);
        assert_eq!(r.closing_costs, ClosingCosts::Percent(0.0));
        assert_eq!(r.expenses.management_percent, 0.0);
        assert_eq!(r.first_lien.principal, 0.0);
        assert_eq!(r.first_lien.interest_rate_percent, 0.0);
        assert_eq!(r.appreciation_percent, 0.0);
    }

    #[test]
    fn test_itemized_closing_costs_take_precedence() {
        let params = PropertyParameters {
            closing_cost_items: vec![
                ClosingCostItem::new("Title", 0.0),
                ClosingCostItem::new("Appraisal", 500.0),
            ],
            closing_cost_percent: Some(4.0),
            ..PropertyParameters::new(100_000.0, 12_000.0)
        };
        assert!(matches!(resolve(&params).unwrap().closing_costs, ClosingCosts::Itemized(_)));

        let all_zero = PropertyParameters {
            closing_cost_items: vec![ClosingCostItem::new("Title", 0.0)],
            closing_cost_percent: Some(4.0),
            ..PropertyParameters::new(100_000.0, 12_000.0)
        };
        assert_eq!(resolve(&all_zero).unwrap().closing_costs, ClosingCosts::Percent(4.0));
    }

    #[test]
    fn test_rent_from_monthly_per_unit() {
        let params = PropertyParameters {
            purchase_price: Some(400_000.0),
            monthly_rent_per_unit: Some(1_250.0),
            number_of_units: Some(4),
            ..Default::default()
        };
        assert_eq!(resolve(&params).unwrap().gross_annual_rent, 60_000.0);
    }

    #[test]
    fn test_explicit_principal_overrides_ltv() {
        let params = PropertyParameters {
            financing: FinancingTerms {
                principal: Some(150_000.0),
                loan_to_value_percent: Some(90.0),
                ..Default::default()
            },
            ..PropertyParameters::new(300_000.0, 30_000.0)
        };
        assert_eq!(resolve(&params).unwrap().first_lien.principal, 150_000.0);
    }

    #[test]
    fn test_missing_rent_is_error() {
        let params = PropertyParameters {
            purchase_price: Some(100_000.0),
            ..Default::default()
        };
        assert_eq!(
            resolve(&params).unwrap_err(),
            AnalysisError::MissingField {
                field: "gross_annual_rent".to_string()
            }
        );
    }

    #[test]
    fn test_negative_price_is_error() {
        let err = resolve(&PropertyParameters::new(-1.0, 10_000.0)).unwrap_err();
        assert_eq!(err.field(), "purchase_price");
    }

    #[test]
    fn test_nan_is_error() {
        let params = PropertyParameters {
            operating_expenses: OperatingExpenses {
                insurance: f64::NAN,
                ..Default::default()
            },
            ..PropertyParameters::new(100_000.0, 10_000.0)
        };
        assert_eq!(
            resolve(&params).unwrap_err(),
            AnalysisError::NonFinite {
                field: "operating_expenses.insurance".to_string()
            }
        );
    }

    #[test]
    fn test_negative_rate_is_error() {
        let params = PropertyParameters {
            financing: FinancingTerms {
                interest_rate_percent: Some(-1.0),
                ..Default::default()
            },
            ..PropertyParameters::new(100_000.0, 10_000.0)
        };
        assert_eq!(resolve(&params).unwrap_err().field(), "financing.interest_rate_percent");
    }

    #[test]
    fn test_zero_term_with_principal_is_error() {
        let params = PropertyParameters {
            financing: FinancingTerms {
                amortization_years: Some(0),
                ..Default::default()
            },
            ..PropertyParameters::new(100_000.0, 10_000.0)
        };
        assert_eq!(
            resolve(&params).unwrap_err(),
            AnalysisError::InvalidTerm {
                field: "financing.amortization_years".to_string()
            }
        );
    }

    #[test]
    fn test_zero_term_without_principal_is_valid() {
        let params = PropertyParameters {
            financing: FinancingTerms {
                loan_to_value_percent: Some(0.0),
                amortization_years: Some(0),
                ..Default::default()
            },
            ..PropertyParameters::new(100_000.0, 10_000.0)
        };
        assert!(resolve(&params).is_ok());
    }

    #[test]
    fn test_second_lien_term_checked() {
        let params = PropertyParameters {
            financing: FinancingTerms {
                second_lien: Some(SecondLien {
                    principal: 20_000.0,
                    interest_rate_percent: 9.0,
                    amortization_years: 0,
                }),
                ..Default::default()
            },
            ..PropertyParameters::new(100_000.0, 10_000.0)
        };
        assert_eq!(
            resolve(&params).unwrap_err().field(),
            "financing.second_lien.amortization_years"
        );
    }

    #[test]
    fn test_term_beyond_limit_is_error() {
        for years in [MAX_AMORTIZATION_YEARS + 1, 200_000_000, 400_000_000] {
            let params = PropertyParameters {
                financing: FinancingTerms {
                    amortization_years: Some(years),
                    ..Default::default()
                },
                ..PropertyParameters::new(300_000.0, 30_000.0)
            };
            assert_eq!(
                resolve(&params).unwrap_err(),
                AnalysisError::InvalidTerm {
                    field: "financing.amortization_years".to_string()
                }
            );
        }

        let longest = PropertyParameters {
            financing: FinancingTerms {
                amortization_years: Some(MAX_AMORTIZATION_YEARS),
                ..Default::default()
            },
            ..PropertyParameters::new(300_000.0, 30_000.0)
        };
        assert!(resolve(&longest).is_ok());
    }
}
