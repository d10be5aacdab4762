use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;

use mortgage_calc_core::mortgage::analysis::{self, MortgageAnalysisInput};
use mortgage_calc_core::mortgage::payment::{self, LoanParameters};
use mortgage_calc_core::mortgage::schedule::{self, ScheduleInput};
use mortgage_calc_core::records::CalculationRecord;
use mortgage_calc_core::time_value::annuity_payment;

use super::{load_tables, FrequencyArg, JurisdictionFlags};
use crate::input;

/// Loan terms shared by every mortgage command
#[derive(Args)]
pub struct LoanFlags {
    /// Purchase price of the home
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual interest rate in percent (e.g. 5.25)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Amortization period in years
    #[arg(long, default_value = "25")]
    pub years: u32,

    /// Payment frequency shown to the borrower
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,
}

impl LoanFlags {
    fn to_params(&self) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        Ok(LoanParameters {
            home_price: self
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment: self.down_payment,
            annual_interest_rate_pct: self.rate.ok_or("--rate is required (or provide --input)")?,
            amortization_years: self.years,
            payment_frequency: self.frequency.into(),
        })
    }
}

/// Arguments for the periodic payment calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaymentArgs {
    #[command(flatten)]
    pub loan: LoanFlags,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the yearly amortization schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Amount financed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 5.25)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Amortization period in years
    #[arg(long, default_value = "25")]
    pub years: u32,

    /// Monthly payment (derived from the annuity formula when omitted)
    #[arg(long)]
    pub monthly_payment: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the combined payment, schedule and closing cost analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub loan: LoanFlags,

    #[command(flatten)]
    pub jurisdiction: JurisdictionFlags,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for building a persistable calculation record
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RecordArgs {
    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    /// Free-text notes stored with the record (replaces notes from --input)
    #[arg(long)]
    pub notes: Option<String>,

    /// Free-text comments stored with the record (replaces comments from --input)
    #[arg(long)]
    pub comments: Option<String>,
}

#[derive(Deserialize)]
struct RecordInput {
    #[serde(flatten)]
    analysis: MortgageAnalysisInput,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    comments: Option<String>,
}

impl RecordInput {
    /// `--notes` and `--comments` replace the annotations read from JSON.
    fn with_annotations(mut self, notes: Option<String>, comments: Option<String>) -> Self {
        if notes.is_some() {
            self.notes = notes;
        }
        if comments.is_some() {
            self.comments = comments;
        }
        self
    }
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: LoanParameters = match input::load(args.input.as_deref())? {
        Some(params) => params,
        None => args.loan.to_params()?,
    };
    let result = payment::compute_payment(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = match input::load(args.input.as_deref())? {
        Some(schedule_input) => schedule_input,
        None => {
            let loan_amount = args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?;
            let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
            let monthly_rate = rate / dec!(100) / dec!(12);
            let monthly_payment = match args.monthly_payment {
                Some(pmt) => pmt,
                None => {
                    let months = args
                        .years
                        .checked_mul(12)
                        .ok_or("--years is too large to count in months")?;
                    annuity_payment(monthly_rate, months, loan_amount)?
                }
            };
            ScheduleInput {
                loan_amount,
                monthly_payment,
                monthly_rate,
                amortization_years: args.years,
            }
        }
    };
    let result = schedule::generate_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tables = load_tables(args.jurisdiction.tables.as_deref())?;
    let analysis_input = match input::load(args.input.as_deref())? {
        Some(analysis_input) => analysis_input,
        None => analysis_from_flags(&args)?,
    };
    let result = analysis::analyze_mortgage_with_tables(&analysis_input, &tables)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_record(args: RecordArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tables = load_tables(args.analyze.jurisdiction.tables.as_deref())?;
    let record_input = match input::load::<RecordInput>(args.analyze.input.as_deref())? {
        Some(record_input) => record_input.with_annotations(args.notes, args.comments),
        None => RecordInput {
            analysis: analysis_from_flags(&args.analyze)?,
            notes: args.notes,
            comments: args.comments,
        },
    };

    let output = analysis::analyze_mortgage_with_tables(&record_input.analysis, &tables)?;
    let record = CalculationRecord::from_analysis(
        &record_input.analysis,
        &output.result,
        record_input.notes,
        record_input.comments,
    )?;
    Ok(serde_json::to_value(record)?)
}

fn analysis_from_flags(
    args: &AnalyzeArgs,
) -> Result<MortgageAnalysisInput, Box<dyn std::error::Error>> {
    let (province, city) = args.jurisdiction.resolve()?;
    Ok(MortgageAnalysisInput {
        loan: args.loan.to_params()?,
        province,
        city,
        is_first_time_buyer: args.jurisdiction.first_time_buyer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortgage_calc_core::closing_costs::jurisdiction::City;

    fn json_record_input() -> RecordInput {
        serde_json::from_str(
            r#"{
                "home_price": "500000",
                "down_payment": "100000",
                "annual_interest_rate_pct": "5.25",
                "amortization_years": 25,
                "province": "ontario",
                "city": "toronto",
                "notes": "from file",
                "comments": "seller motivated"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_record_input_reads_annotations() {
        let record_input = json_record_input();
        assert_eq!(record_input.analysis.city, City::Toronto);
        assert_eq!(record_input.notes.as_deref(), Some("from file"));
    }

    #[test]
    fn test_flag_annotations_override_json() {
        let record_input =
            json_record_input().with_annotations(Some("from flag".into()), None);
        assert_eq!(record_input.notes.as_deref(), Some("from flag"));
        assert_eq!(record_input.comments.as_deref(), Some("seller motivated"));
    }

    #[test]
    fn test_json_annotations_kept_without_flags() {
        let record_input = json_record_input().with_annotations(None, None);
        assert_eq!(record_input.notes.as_deref(), Some("from file"));
        assert_eq!(record_input.comments.as_deref(), Some("seller motivated"));
    }
}
