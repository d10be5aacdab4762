//! One-time purchase costs: land transfer taxes, rebates and fees.
//!
//! Provincial and municipal transfer taxes come from the injected
//! jurisdiction tables; fees are estimates, not quotes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::brackets::BracketSlice;
use super::jurisdiction::{validate_jurisdiction, City, JurisdictionTables, Province};
use crate::error::MortgageError;
use crate::types::{round_currency, with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingCostInput {
    pub home_price: Money,
    pub province: Province,
    pub city: City,
    #[serde(default)]
    pub is_first_time_buyer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingCostBreakdown {
    /// Provincial land transfer tax, before any rebate.
    pub land_transfer_tax: Money,
    /// Municipal land transfer tax, before any rebate. Zero outside Toronto.
    pub additional_tax: Money,
    pub legal_fees: Money,
    pub title_insurance: Money,
    pub home_inspection: Money,
    pub appraisal: Money,
    pub survey_fee: Money,
    /// Combined provincial and municipal rebate, subtracted from the total.
    pub first_time_buyer_rebate: Money,
    pub total: Money,
    pub land_transfer_tax_slices: Vec<BracketSlice>,
    pub additional_tax_slices: Vec<BracketSlice>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Estimate one-time purchase costs using the built-in Canadian tables.
pub fn estimate_closing_costs(
    input: &ClosingCostInput,
) -> MortgageResult<ComputationOutput<ClosingCostBreakdown>> {
    estimate_closing_costs_with_tables(input, &JurisdictionTables::default())
}

/// Estimate one-time purchase costs against caller-supplied tables.
///
/// Provincial and municipal transfer taxes run through their own bracket
/// schedules; each first-time-buyer rebate is capped at the tax it offsets.
pub fn estimate_closing_costs_with_tables(
    input: &ClosingCostInput,
    tables: &JurisdictionTables,
) -> MortgageResult<ComputationOutput<ClosingCostBreakdown>> {
    let start = Instant::now();
    let (breakdown, warnings) = calculate_closing_costs(input, tables)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Marginal bracket land transfer tax (provincial and municipal), \
         capped first-time buyer rebates, flat and percentage fee estimates",
        input,
        warnings,
        elapsed,
        breakdown,
    ))
}

/// Closing-cost computation without the output envelope.
pub(crate) fn calculate_closing_costs(
    input: &ClosingCostInput,
    tables: &JurisdictionTables,
) -> MortgageResult<(ClosingCostBreakdown, Vec<String>)> {
    validate_closing_cost_input(input)?;
    tables.validate()?;
    let mut warnings: Vec<String> = Vec::new();

    let price = input.home_price;

    let provincial = tables.provincial_rules(input.province)?;
    let land_transfer_tax = provincial.brackets.apply(price);
    let land_transfer_tax_slices = provincial.brackets.slices(price);

    let municipal = tables.municipal_rules(input.city);
    let (additional_tax, additional_tax_slices) = match municipal {
        Some(rules) => (rules.brackets.apply(price), rules.brackets.slices(price)),
        None => (Decimal::ZERO, Vec::new()),
    };

    let mut first_time_buyer_rebate = Decimal::ZERO;
    if input.is_first_time_buyer {
        let provincial_rebate = provincial
            .first_time_buyer_rebate
            .as_ref()
            .map_or(Decimal::ZERO, |r| r.rebate(land_transfer_tax, price));
        let municipal_rebate = municipal
            .and_then(|m| m.first_time_buyer_rebate.as_ref())
            .map_or(Decimal::ZERO, |r| r.rebate(additional_tax, price));
        first_time_buyer_rebate = provincial_rebate + municipal_rebate;

        if first_time_buyer_rebate.is_zero() {
            warnings.push(format!(
                "No first-time buyer rebate applies to a purchase at {} in {}",
                round_currency(price),
                input.city
            ));
        }
    }

    let fees = &tables.fees;
    let legal_fees = round_currency(fees.legal_fees.amount(price));
    let title_insurance = round_currency(fees.title_insurance.amount(price));
    let home_inspection = round_currency(fees.home_inspection.amount(price));
    let appraisal = round_currency(fees.appraisal.amount(price));
    let survey_fee = round_currency(fees.survey_fee.amount(price));

    let land_transfer_tax = round_currency(land_transfer_tax);
    let additional_tax = round_currency(additional_tax);
    let first_time_buyer_rebate = round_currency(first_time_buyer_rebate);

    let gross = land_transfer_tax
        + additional_tax
        + legal_fees
        + title_insurance
        + home_inspection
        + appraisal
        + survey_fee;
    let total = (gross - first_time_buyer_rebate).max(Decimal::ZERO);

    Ok((
        ClosingCostBreakdown {
            land_transfer_tax,
            additional_tax,
            legal_fees,
            title_insurance,
            home_inspection,
            appraisal,
            survey_fee,
            first_time_buyer_rebate,
            total,
            land_transfer_tax_slices,
            additional_tax_slices,
        },
        warnings,
    ))
}

fn validate_closing_cost_input(input: &ClosingCostInput) -> MortgageResult<()> {
    if input.home_price <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "home_price".into(),
            reason: "Home price must be positive".into(),
        });
    }
    validate_jurisdiction(input.province, input.city)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
