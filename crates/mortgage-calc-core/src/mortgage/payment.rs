//! Periodic mortgage payment from loan parameters.
//!
//! Level monthly payment from the standard annuity formula, with totals for
//! interest and cost over the full amortization. All math in
//! `rust_decimal::Decimal`; rounding to cents happens once, on output.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::time_value::annuity_payment;
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: u32 = 12;

/// Down payment share below which a Canadian mortgage must be insured.
const INSURED_DOWN_PAYMENT_THRESHOLD: Rate = dec!(0.20);

const MAX_INSURED_AMORTIZATION_YEARS: u32 = 25;
const MAX_LENDER_AMORTIZATION_YEARS: u32 = 30;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    BiWeekly,
}

impl PaymentFrequency {
    /// Divisor applied to the monthly payment to get the displayed payment.
    fn monthly_divisor(self) -> Decimal {
        match self {
            PaymentFrequency::Monthly => Decimal::ONE,
            PaymentFrequency::BiWeekly => dec!(2),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Purchase price of the home.
    pub home_price: Money,
    /// Cash paid up front; the remainder is financed.
    pub down_payment: Money,
    /// Annual interest rate as a percentage (5.25 = 5.25%).
    pub annual_interest_rate_pct: Decimal,
    /// Amortization period in years.
    pub amortization_years: u32,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub loan_amount: Money,
    /// Payment shown to the borrower for the chosen frequency.
    pub periodic_payment: Money,
    /// Un-rounded level monthly payment. Drives the amortization schedule
    /// regardless of the displayed frequency.
    pub monthly_payment: Money,
    pub monthly_rate: Rate,
    pub number_of_payments: u32,
    pub total_interest: Money,
    pub total_cost: Money,
    pub payment_frequency: PaymentFrequency,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the periodic payment, total interest and total cost of a mortgage.
///
/// Bi-weekly payments are half the monthly payment. The loan is not
/// re-amortized over 26 payments a year; only the displayed figure changes.
pub fn compute_payment(
    input: &LoanParameters,
) -> MortgageResult<ComputationOutput<PaymentResult>> {
    let start = Instant::now();
    let (result, warnings) = calculate_payment(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity payment: P·r(1+r)^n / ((1+r)^n − 1) on the financed amount, \
         monthly compounding, totals over the full amortization",
        input,
        warnings,
        elapsed,
        result,
    ))
}

/// Payment computation without the output envelope.
pub(crate) fn calculate_payment(
    input: &LoanParameters,
) -> MortgageResult<(PaymentResult, Vec<String>)> {
    validate_loan_parameters(input)?;
    let mut warnings: Vec<String> = Vec::new();

    let loan_amount = input.home_price - input.down_payment;
    let monthly_rate = input.annual_interest_rate_pct / dec!(100) / Decimal::from(MONTHS_PER_YEAR);
    let number_of_payments = input
        .amortization_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| MortgageError::InvalidInput {
            field: "amortization_years".into(),
            reason: format!(
                "{} years is more monthly payments than can be counted",
                input.amortization_years
            ),
        })?;

    let monthly_payment = annuity_payment(monthly_rate, number_of_payments, loan_amount)?;
    let periodic_payment = monthly_payment / input.payment_frequency.monthly_divisor();

    let total_cost = monthly_payment
        .checked_mul(Decimal::from(number_of_payments))
        .and_then(|paid| paid.checked_add(input.down_payment))
        .map(round_currency)
        .ok_or_else(|| MortgageError::InvalidInput {
            field: "amortization_years".into(),
            reason: format!(
                "Total of {} payments of {} exceeds the representable range",
                number_of_payments, monthly_payment
            ),
        })?;
    let total_interest = total_cost - round_currency(input.home_price);

    if input.payment_frequency == PaymentFrequency::BiWeekly {
        warnings.push(
            "Bi-weekly payment is half of the monthly payment; the loan is not \
             re-amortized over 26 payments per year"
                .into(),
        );
    }

    let down_payment_share = input.down_payment / input.home_price;
    let insured = loan_amount > Decimal::ZERO && down_payment_share < INSURED_DOWN_PAYMENT_THRESHOLD;
    if insured {
        warnings.push(format!(
            "Down payment of {}% is below 20% of the purchase price; mortgage \
             default insurance is required and is not included in these figures",
            (down_payment_share * dec!(100)).round_dp(2)
        ));
        if input.amortization_years > MAX_INSURED_AMORTIZATION_YEARS {
            warnings.push(format!(
                "Insured mortgages are generally limited to a {}-year amortization",
                MAX_INSURED_AMORTIZATION_YEARS
            ));
        }
    }
    if input.amortization_years > MAX_LENDER_AMORTIZATION_YEARS {
        warnings.push(format!(
            "Amortization of {} years exceeds the {}-year maximum offered by most lenders",
            input.amortization_years, MAX_LENDER_AMORTIZATION_YEARS
        ));
    }

    Ok((
        PaymentResult {
            loan_amount: round_currency(loan_amount),
            periodic_payment: round_currency(periodic_payment),
            monthly_payment,
            monthly_rate,
            number_of_payments,
            total_interest,
            total_cost,
            payment_frequency: input.payment_frequency,
        },
        warnings,
    ))
}

fn validate_loan_parameters(input: &LoanParameters) -> MortgageResult<()> {
    if input.home_price <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "home_price".into(),
            reason: "Home price must be positive".into(),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment must be non-negative".into(),
        });
    }
    if input.down_payment > input.home_price {
        return Err(MortgageError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot exceed the home price".into(),
        });
    }
    if input.annual_interest_rate_pct < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "annual_interest_rate_pct".into(),
            reason: "Interest rate must be non-negative".into(),
        });
    }
    if input.amortization_years == 0 {
        return Err(MortgageError::InvalidInput {
            field: "amortization_years".into(),
            reason: "Amortization period must be at least one year".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
