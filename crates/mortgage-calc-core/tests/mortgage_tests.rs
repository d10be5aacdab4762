use mortgage_calc_core::mortgage::payment::{self, LoanParameters, PaymentFrequency};
use mortgage_calc_core::mortgage::schedule::{self, ScheduleInput};
use mortgage_calc_core::MortgageError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn loan(price: Decimal, down: Decimal, rate_pct: Decimal, years: u32) -> LoanParameters {
    LoanParameters {
        home_price: price,
        down_payment: down,
        annual_interest_rate_pct: rate_pct,
        amortization_years: years,
        payment_frequency: PaymentFrequency::Monthly,
    }
}

fn scenarios() -> Vec<LoanParameters> {
    let mut out = Vec::new();
    for rate in [dec!(0), dec!(0.01), dec!(2.5), dec!(5.25), dec!(9.99), dec!(18)] {
        for years in [1, 15, 20, 25, 30, 40] {
            out.push(loan(dec!(650_000), dec!(65_000), rate, years));
        }
    }
    out.push(loan(dec!(1_999_999.99), dec!(400_000.01), dec!(6.34), 25));
    out.push(loan(dec!(89_000), dec!(4_450), dec!(3.1), 15));
    out
}

// ===========================================================================
// Payment properties
// ===========================================================================

#[test]
fn test_reference_scenario() {
    let result = payment::compute_payment(&loan(dec!(500_000), dec!(100_000), dec!(5.25), 25))
        .unwrap()
        .result;
    assert_eq!(result.loan_amount, dec!(400_000));
    assert_eq!(result.periodic_payment, dec!(2396.99));
}

#[test]
fn test_zero_rate_payment_is_exact_division() {
    for years in [15u32, 20, 25, 30] {
        let result = payment::compute_payment(&loan(dec!(480_000), dec!(120_000), dec!(0), years))
            .unwrap()
            .result;
        let expected = dec!(360_000) / Decimal::from(years * 12);
        assert_eq!(result.periodic_payment, expected.round_dp(2));
        assert_eq!(result.total_interest, Decimal::ZERO);
    }
}

#[test]
fn test_total_cost_identity_across_scenarios() {
    for params in scenarios() {
        let result = payment::compute_payment(&params).unwrap().result;
        assert_eq!(
            result.total_cost,
            result.total_interest + params.home_price,
            "identity failed for {:?}",
            params
        );
    }
}

#[test]
fn test_higher_rate_never_lowers_payment() {
    let mut previous = Decimal::ZERO;
    for rate in [dec!(0), dec!(1), dec!(2.5), dec!(4), dec!(6.5), dec!(10)] {
        let result = payment::compute_payment(&loan(dec!(700_000), dec!(140_000), rate, 25))
            .unwrap()
            .result;
        assert!(result.periodic_payment >= previous, "rate {}", rate);
        previous = result.periodic_payment;
    }
}

#[test]
fn test_invalid_inputs_rejected_before_computation() {
    let cases = [
        (loan(dec!(-1), dec!(0), dec!(5), 25), "home_price"),
        (loan(dec!(500_000), dec!(-5), dec!(5), 25), "down_payment"),
        (loan(dec!(500_000), dec!(600_000), dec!(5), 25), "down_payment"),
        (loan(dec!(500_000), dec!(100_000), dec!(-0.01), 25), "annual_interest_rate_pct"),
        (loan(dec!(500_000), dec!(100_000), dec!(5), 0), "amortization_years"),
    ];
    for (params, expected_field) in cases {
        match payment::compute_payment(&params) {
            Err(MortgageError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("Expected InvalidInput on {}, got {:?}", expected_field, other),
        }
    }
}

// ===========================================================================
// Schedule properties
// ===========================================================================

#[test]
fn test_schedule_terminal_balance_is_zero() {
    for params in scenarios() {
        let pay = payment::compute_payment(&params).unwrap().result;
        let sched = schedule::generate_schedule(&ScheduleInput::from(&pay))
            .unwrap()
            .result;
        assert_eq!(sched.rows.len(), params.amortization_years as usize);
        assert_eq!(
            sched.rows.last().unwrap().balance,
            Decimal::ZERO,
            "non-zero terminal balance for {:?}",
            params
        );
    }
}

#[test]
fn test_schedule_monotonicity() {
    for params in scenarios() {
        let pay = payment::compute_payment(&params).unwrap().result;
        let sched = schedule::generate_schedule(&ScheduleInput::from(&pay))
            .unwrap()
            .result;
        let mut balance = pay.loan_amount;
        let mut cumulative = Decimal::ZERO;
        for row in &sched.rows {
            assert!(row.balance <= balance, "{:?} year {}", params, row.year);
            assert!(row.cumulative_interest >= cumulative, "{:?} year {}", params, row.year);
            assert_eq!(row.total_payment, row.principal_payment + row.interest_payment);
            balance = row.balance;
            cumulative = row.cumulative_interest;
        }
    }
}

#[test]
fn test_schedule_interest_round_trips_payment_total() {
    for params in scenarios() {
        let pay = payment::compute_payment(&params).unwrap().result;
        let sched = schedule::generate_schedule(&ScheduleInput::from(&pay))
            .unwrap()
            .result;
        let diff = (sched.total_interest - pay.total_interest).abs();
        assert!(diff <= dec!(0.02), "{:?}: diff {}", params, diff);

        let row_sum: Decimal = sched.rows.iter().map(|r| r.interest_payment).sum();
        let row_diff = (row_sum - pay.total_interest).abs();
        assert!(row_diff <= dec!(0.25), "{:?}: row diff {}", params, row_diff);
    }
}

#[test]
fn test_bi_weekly_display_only() {
    let mut params = loan(dec!(900_000), dec!(180_000), dec!(4.49), 30);
    let monthly = payment::compute_payment(&params).unwrap().result;
    params.payment_frequency = PaymentFrequency::BiWeekly;
    let bi_weekly = payment::compute_payment(&params).unwrap().result;

    assert_eq!(bi_weekly.monthly_payment, monthly.monthly_payment);
    assert_eq!(
        bi_weekly.periodic_payment,
        (monthly.monthly_payment / dec!(2)).round_dp(2)
    );

    let a = schedule::generate_schedule(&ScheduleInput::from(&monthly)).unwrap().result;
    let b = schedule::generate_schedule(&ScheduleInput::from(&bi_weekly)).unwrap().result;
    assert_eq!(a.rows, b.rows);
}

#[test]
fn test_negative_amortization_rejected() {
    let input = ScheduleInput {
        loan_amount: dec!(500_000),
        monthly_payment: dec!(1_000),
        monthly_rate: dec!(0.005),
        amortization_years: 25,
    };
    assert!(matches!(
        schedule::generate_schedule(&input),
        Err(MortgageError::DegenerateAmortization(_))
    ));
}
