//! Jurisdictions and their closing-cost tables.
//!
//! Transfer tax brackets, first-time-buyer rebates and fee estimates are
//! plain data. `JurisdictionTables::default()` carries the published Ontario,
//! Toronto and British Columbia residential tables; callers may deserialize
//! and inject their own.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::brackets::{BracketSchedule, TaxBracket};
use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Jurisdiction identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Province {
    Ontario,
    Bc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Toronto,
    Vancouver,
}

impl City {
    /// Province the city belongs to.
    pub fn province(self) -> Province {
        match self {
            City::Toronto => Province::Ontario,
            City::Vancouver => Province::Bc,
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Province::Ontario => write!(f, "Ontario"),
            Province::Bc => write!(f, "British Columbia"),
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            City::Toronto => write!(f, "Toronto"),
            City::Vancouver => write!(f, "Vancouver"),
        }
    }
}

/// Reject a city paired with a province it does not belong to.
pub fn validate_jurisdiction(province: Province, city: City) -> MortgageResult<()> {
    if city.province() != province {
        return Err(MortgageError::InvalidInput {
            field: "city".into(),
            reason: format!("{} is not in {}", city, province),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Table types
// ---------------------------------------------------------------------------

/// First-time-buyer rebate on one transfer tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebateRule {
    /// Largest rebate available; never more than the tax itself.
    pub max_amount: Money,
    /// Purchases above this price get no rebate.
    #[serde(default)]
    pub max_eligible_price: Option<Money>,
}

impl RebateRule {
    /// Rebate against `tax` for a purchase at `home_price`.
    pub fn rebate(&self, tax: Money, home_price: Money) -> Money {
        let eligible = self
            .max_eligible_price
            .map_or(true, |ceiling| home_price <= ceiling);
        if !eligible {
            return Decimal::ZERO;
        }
        self.max_amount.min(tax).max(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferTaxRules {
    pub name: String,
    pub brackets: BracketSchedule,
    #[serde(default)]
    pub first_time_buyer_rebate: Option<RebateRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvincialTable {
    pub province: Province,
    pub rules: TransferTaxRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalTable {
    pub city: City,
    pub rules: TransferTaxRules,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeRule {
    Flat(Money),
    PercentOfPrice(Rate),
}

impl FeeRule {
    pub fn amount(self, home_price: Money) -> Money {
        match self {
            FeeRule::Flat(amount) => amount,
            FeeRule::PercentOfPrice(rate) => home_price * rate,
        }
    }

    fn is_negative(self) -> bool {
        match self {
            FeeRule::Flat(amount) => amount < Decimal::ZERO,
            FeeRule::PercentOfPrice(rate) => rate < Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub legal_fees: FeeRule,
    pub title_insurance: FeeRule,
    pub home_inspection: FeeRule,
    pub appraisal: FeeRule,
    pub survey_fee: FeeRule,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            legal_fees: FeeRule::Flat(dec!(1500)),
            title_insurance: FeeRule::PercentOfPrice(dec!(0.0005)),
            home_inspection: FeeRule::Flat(dec!(500)),
            appraisal: FeeRule::Flat(dec!(350)),
            survey_fee: FeeRule::Flat(dec!(1000)),
        }
    }
}

/// Every table the closing-cost estimate draws on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionTables {
    pub provincial: Vec<ProvincialTable>,
    #[serde(default)]
    pub municipal: Vec<MunicipalTable>,
    #[serde(default)]
    pub fees: FeeSchedule,
}

impl JurisdictionTables {
    pub fn provincial_rules(&self, province: Province) -> MortgageResult<&TransferTaxRules> {
        self.provincial
            .iter()
            .find(|t| t.province == province)
            .map(|t| &t.rules)
            .ok_or_else(|| {
                MortgageError::UnknownJurisdiction(format!(
                    "no land transfer tax table for {}",
                    province
                ))
            })
    }

    /// Municipal rules for `city`, if the city levies its own transfer tax.
    pub fn municipal_rules(&self, city: City) -> Option<&TransferTaxRules> {
        self.municipal
            .iter()
            .find(|t| t.city == city)
            .map(|t| &t.rules)
    }

    pub fn validate(&self) -> MortgageResult<()> {
        for table in &self.provincial {
            validate_rules(&table.rules)?;
        }
        for table in &self.municipal {
            validate_rules(&table.rules)?;
        }

        let fees = [
            ("legal_fees", self.fees.legal_fees),
            ("title_insurance", self.fees.title_insurance),
            ("home_inspection", self.fees.home_inspection),
            ("appraisal", self.fees.appraisal),
            ("survey_fee", self.fees.survey_fee),
        ];
        for (field, rule) in fees {
            if rule.is_negative() {
                return Err(MortgageError::InvalidInput {
                    field: field.into(),
                    reason: "Fee estimate must be non-negative".into(),
                });
            }
        }
        Ok(())
    }
}

fn validate_rules(rules: &TransferTaxRules) -> MortgageResult<()> {
    rules.brackets.validate(&rules.name)?;
    if let Some(rebate) = &rules.first_time_buyer_rebate {
        if rebate.max_amount < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: rules.name.clone(),
                reason: "First-time buyer rebate must be non-negative".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

fn bracket(upper_bound: Option<Money>, rate: Rate) -> TaxBracket {
    TaxBracket { upper_bound, rate }
}

/// Ontario land transfer tax, residential rates.
pub fn ontario_land_transfer_tax() -> BracketSchedule {
    BracketSchedule::new(vec![
        bracket(Some(dec!(55_000)), dec!(0.005)),
        bracket(Some(dec!(250_000)), dec!(0.01)),
        bracket(Some(dec!(400_000)), dec!(0.015)),
        bracket(Some(dec!(2_000_000)), dec!(0.02)),
        bracket(None, dec!(0.025)),
    ])
}

/// Toronto municipal land transfer tax. Mirrors the provincial thresholds.
pub fn toronto_municipal_land_transfer_tax() -> BracketSchedule {
    BracketSchedule::new(vec![
        bracket(Some(dec!(55_000)), dec!(0.005)),
        bracket(Some(dec!(250_000)), dec!(0.01)),
        bracket(Some(dec!(400_000)), dec!(0.015)),
        bracket(Some(dec!(2_000_000)), dec!(0.02)),
        bracket(None, dec!(0.025)),
    ])
}

/// British Columbia property transfer tax, including the additional 2% above
/// $3M on residential property.
pub fn bc_property_transfer_tax() -> BracketSchedule {
    BracketSchedule::new(vec![
        bracket(Some(dec!(200_000)), dec!(0.01)),
        bracket(Some(dec!(2_000_000)), dec!(0.02)),
        bracket(Some(dec!(3_000_000)), dec!(0.03)),
        bracket(None, dec!(0.05)),
    ])
}

impl Default for JurisdictionTables {
    fn default() -> Self {
        JurisdictionTables {
            provincial: vec![
                ProvincialTable {
                    province: Province::Ontario,
                    rules: TransferTaxRules {
                        name: "Ontario Land Transfer Tax".into(),
                        brackets: ontario_land_transfer_tax(),
                        first_time_buyer_rebate: Some(RebateRule {
                            max_amount: dec!(4_000),
                            max_eligible_price: None,
                        }),
                    },
                },
                ProvincialTable {
                    province: Province::Bc,
                    rules: TransferTaxRules {
                        name: "BC Property Transfer Tax".into(),
                        brackets: bc_property_transfer_tax(),
                        first_time_buyer_rebate: Some(RebateRule {
                            max_amount: dec!(8_000),
                            max_eligible_price: Some(dec!(500_000)),
                        }),
                    },
                },
            ],
            municipal: vec![MunicipalTable {
                city: City::Toronto,
                rules: TransferTaxRules {
                    name: "Toronto Municipal Land Transfer Tax".into(),
                    brackets: toronto_municipal_land_transfer_tax(),
                    first_time_buyer_rebate: Some(RebateRule {
                        max_amount: dec!(4_475),
                        max_eligible_price: None,
                    }),
                },
            }],
            fees: FeeSchedule::default(),
        }
    }
}
