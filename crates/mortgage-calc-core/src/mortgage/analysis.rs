//! Full purchase analysis: payment, amortization schedule and closing costs
//! from a single set of inputs.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payment::{calculate_payment, LoanParameters, PaymentResult};
use super::schedule::{build_schedule, AmortizationSchedule, ScheduleInput};
use crate::closing_costs::estimator::{
    calculate_closing_costs, ClosingCostBreakdown, ClosingCostInput,
};
use crate::closing_costs::jurisdiction::{
    validate_jurisdiction, City, JurisdictionTables, Province,
};
use crate::types::{round_currency, with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageAnalysisInput {
    #[serde(flatten)]
    pub loan: LoanParameters,
    pub province: Province,
    pub city: City,
    #[serde(default)]
    pub is_first_time_buyer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageAnalysis {
    pub payment: PaymentResult,
    pub schedule: AmortizationSchedule,
    pub closing_costs: ClosingCostBreakdown,
    /// Down payment plus closing costs.
    pub cash_to_close: Money,
}

pub fn analyze_mortgage(
    input: &MortgageAnalysisInput,
) -> MortgageResult<ComputationOutput<MortgageAnalysis>> {
    analyze_mortgage_with_tables(input, &JurisdictionTables::default())
}

/// Run all three calculations against injected jurisdiction tables. Any
/// failure aborts the whole analysis; no partial result is returned.
pub fn analyze_mortgage_with_tables(
    input: &MortgageAnalysisInput,
    tables: &JurisdictionTables,
) -> MortgageResult<ComputationOutput<MortgageAnalysis>> {
    let start = Instant::now();
    validate_jurisdiction(input.province, input.city)?;

    let (payment, mut warnings) = calculate_payment(&input.loan)?;
    let (schedule, schedule_warnings) = build_schedule(&ScheduleInput::from(&payment))?;
    warnings.extend(schedule_warnings);

    let closing_input = ClosingCostInput {
        home_price: input.loan.home_price,
        province: input.province,
        city: input.city,
        is_first_time_buyer: input.is_first_time_buyer,
    };
    let (closing_costs, closing_warnings) = calculate_closing_costs(&closing_input, tables)?;
    warnings.extend(closing_warnings);

    let cash_to_close = round_currency(input.loan.down_payment) + closing_costs.total;

    let analysis = MortgageAnalysis {
        payment,
        schedule,
        closing_costs,
        cash_to_close,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity payment, monthly amortization simulation summarised by year, \
         and bracketed land transfer tax closing cost estimate",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MortgageError;
    use crate::mortgage::payment::PaymentFrequency;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn toronto_purchase() -> MortgageAnalysisInput {
        MortgageAnalysisInput {
            loan: LoanParameters {
                home_price: dec!(500_000),
                down_payment: dec!(100_000),
                annual_interest_rate_pct: dec!(5.25),
                amortization_years: 25,
                payment_frequency: PaymentFrequency::Monthly,
            },
            province: Province::Ontario,
            city: City::Toronto,
            is_first_time_buyer: false,
        }
    }

    #[test]
    fn test_analysis_combines_components() {
        let out = analyze_mortgage(&toronto_purchase()).unwrap().result;
        assert_eq!(out.payment.periodic_payment, dec!(2396.99));
        assert_eq!(out.schedule.rows.len(), 25);
        assert_eq!(out.schedule.rows.last().unwrap().balance, Decimal::ZERO);
        assert_eq!(out.closing_costs.total, dec!(16_550));
        assert_eq!(out.cash_to_close, dec!(116_550));
    }

    #[test]
    fn test_analysis_rejects_mismatched_jurisdiction() {
        let mut input = toronto_purchase();
        input.province = Province::Bc;
        match analyze_mortgage(&input) {
            Err(MortgageError::InvalidInput { field, .. }) => assert_eq!(field, "city"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_analysis_collects_warnings() {
        let mut input = toronto_purchase();
        input.loan.payment_frequency = PaymentFrequency::BiWeekly;
        input.loan.down_payment = dec!(50_000);
        let output = analyze_mortgage(&input).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("Bi-weekly")));
        assert!(output.warnings.iter().any(|w| w.contains("insurance")));
    }

    #[test]
    fn test_analysis_input_from_flat_json() {
        let input: MortgageAnalysisInput = serde_json::from_str(
            r#"{
                "home_price": "750000",
                "down_payment": "150000",
                "annual_interest_rate_pct": "4.79",
                "amortization_years": 30,
                "payment_frequency": "bi_weekly",
                "province": "bc",
                "city": "vancouver",
                "is_first_time_buyer": true
            }"#,
        )
        .unwrap();
        assert_eq!(input.loan.amortization_years, 30);
        assert_eq!(input.loan.payment_frequency, PaymentFrequency::BiWeekly);
        assert!(analyze_mortgage(&input).is_ok());
    }
}
