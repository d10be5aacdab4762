//! Year-by-year amortization schedule.
//!
//! The loan is re-simulated month by month at full decimal precision and
//! summarised into one row per loan-year. Row fields are rounded to cents
//! only when the row is emitted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payment::PaymentResult;
use crate::error::MortgageError;
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: u32 = 12;

/// Residual balance at maturity that is treated as rounding noise.
const BALANCE_TOLERANCE: Money = dec!(1);

/// Longest schedule generated; one row is kept per year.
pub const MAX_SCHEDULE_YEARS: u32 = 1_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub loan_amount: Money,
    /// Full monthly payment. Never the halved bi-weekly figure.
    pub monthly_payment: Money,
    pub monthly_rate: Rate,
    pub amortization_years: u32,
}

impl From<&PaymentResult> for ScheduleInput {
    fn from(payment: &PaymentResult) -> Self {
        ScheduleInput {
            loan_amount: payment.loan_amount,
            monthly_payment: payment.monthly_payment,
            monthly_rate: payment.monthly_rate,
            amortization_years: payment.number_of_payments / MONTHS_PER_YEAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYearRow {
    pub year: u32,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub total_payment: Money,
    /// Outstanding principal at the end of the year.
    pub balance: Money,
    pub cumulative_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub rows: Vec<AmortizationYearRow>,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    /// Month in which the balance reached zero.
    pub payoff_month: u32,
    /// Amount added to the last scheduled payment to retire the loan.
    pub final_payment_adjustment: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate a yearly amortization schedule by monthly simulation.
///
/// Exactly `amortization_years` rows are produced and the final row's balance
/// is zero. A payment that does not cover the first month's interest, or that
/// leaves more than one payment outstanding at maturity, is rejected.
pub fn generate_schedule(
    input: &ScheduleInput,
) -> MortgageResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let (schedule, warnings) = build_schedule(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly amortization simulation summarised by loan-year",
        input,
        warnings,
        elapsed,
        schedule,
    ))
}

/// Schedule computation without the output envelope.
pub(crate) fn build_schedule(
    input: &ScheduleInput,
) -> MortgageResult<(AmortizationSchedule, Vec<String>)> {
    validate_schedule_input(input)?;
    let mut warnings: Vec<String> = Vec::new();

    let total_months = input.amortization_years * MONTHS_PER_YEAR;
    let payment = input.monthly_payment;
    let rate = input.monthly_rate;

    let mut rows = Vec::with_capacity(input.amortization_years as usize);
    let mut balance = input.loan_amount;
    let mut cumulative_interest = Decimal::ZERO;
    let mut payoff_month = if balance.is_zero() { 0 } else { total_months };
    let mut payoff_found = balance.is_zero();
    let mut final_payment_adjustment = Decimal::ZERO;

    for year in 1..=input.amortization_years {
        let mut year_principal = Decimal::ZERO;
        let mut year_interest = Decimal::ZERO;

        for month_in_year in 1..=MONTHS_PER_YEAR {
            let month = (year - 1) * MONTHS_PER_YEAR + month_in_year;

            let interest = balance * rate;
            // Principal actually retired this month; the balance never goes negative.
            let mut principal = (payment - interest).min(balance);

            if month == total_months && balance - principal > Decimal::ZERO {
                let residual = balance - principal;
                if residual > payment {
                    return Err(MortgageError::DegenerateAmortization(format!(
                        "payment of {} leaves {} outstanding after {} months",
                        payment,
                        round_currency(residual),
                        total_months
                    )));
                }
                if residual > BALANCE_TOLERANCE {
                    final_payment_adjustment = residual;
                    warnings.push(format!(
                        "Final payment increased by {} to retire the remaining balance",
                        round_currency(residual)
                    ));
                }
                principal = balance;
            }

            balance -= principal;
            year_principal += principal;
            year_interest += interest;

            if !payoff_found && balance.is_zero() {
                payoff_month = month;
                payoff_found = true;
            }
        }

        cumulative_interest += year_interest;

        let principal_payment = round_currency(year_principal);
        let interest_payment = round_currency(year_interest);
        rows.push(AmortizationYearRow {
            year,
            principal_payment,
            interest_payment,
            total_payment: principal_payment + interest_payment,
            balance: round_currency(balance),
            cumulative_interest: round_currency(cumulative_interest),
        });
    }

    if payoff_found && payoff_month > 0 && payoff_month < total_months {
        warnings.push(format!(
            "Loan is fully repaid in month {} of {}",
            payoff_month, total_months
        ));
    }

    let total_principal = round_currency(input.loan_amount);
    let total_interest = round_currency(cumulative_interest);

    Ok((
        AmortizationSchedule {
            rows,
            total_principal,
            total_interest,
            total_paid: total_principal + total_interest,
            payoff_month,
            final_payment_adjustment: round_currency(final_payment_adjustment),
        },
        warnings,
    ))
}

fn validate_schedule_input(input: &ScheduleInput) -> MortgageResult<()> {
    if input.loan_amount < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be non-negative".into(),
        });
    }
    if input.monthly_payment < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "monthly_payment".into(),
            reason: "Monthly payment must be non-negative".into(),
        });
    }
    if input.monthly_rate < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Monthly rate must be non-negative".into(),
        });
    }
    if input.amortization_years == 0 {
        return Err(MortgageError::InvalidInput {
            field: "amortization_years".into(),
            reason: "Amortization period must be at least one year".into(),
        });
    }
    if input.amortization_years > MAX_SCHEDULE_YEARS {
        return Err(MortgageError::InvalidInput {
            field: "amortization_years".into(),
            reason: format!(
                "Schedules are limited to {} years, got {}",
                MAX_SCHEDULE_YEARS, input.amortization_years
            ),
        });
    }

    if input.loan_amount.is_zero() {
        return Ok(());
    }

    // Payment at or below the first month's interest never retires the loan.
    let covers_interest = input
        .loan_amount
        .checked_mul(input.monthly_rate)
        .filter(|first_interest| input.monthly_payment > *first_interest);
    if covers_interest.is_none() {
        return Err(MortgageError::DegenerateAmortization(format!(
            "monthly payment of {} does not cover the first month's interest on {} at {}",
            input.monthly_payment, input.loan_amount, input.monthly_rate
        )));
    }

    // Every running total is bounded by the payment over the term plus one
    // final adjustment.
    let payments = Decimal::from(input.amortization_years * MONTHS_PER_YEAR + 1);
    if input.monthly_payment.checked_mul(payments).is_none() {
        return Err(MortgageError::InvalidInput {
            field: "monthly_payment".into(),
            reason: format!(
                "Payments of {} over {} years exceed the representable range",
                input.monthly_payment, input.amortization_years
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
