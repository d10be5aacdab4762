use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_calc_core::closing_costs::estimator::{self, ClosingCostInput};

use super::{load_tables, JurisdictionFlags};
use crate::input;

/// Arguments for the closing cost estimate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ClosingCostArgs {
    /// Purchase price of the home
    #[arg(long)]
    pub home_price: Option<Decimal>,

    #[command(flatten)]
    pub jurisdiction: JurisdictionFlags,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for printing jurisdiction tables
#[derive(Args)]
pub struct TablesArgs {
    /// Validate and print this tables file instead of the built-in tables
    #[arg(long)]
    pub tables: Option<String>,
}

pub fn run_closing_costs(args: ClosingCostArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tables = load_tables(args.jurisdiction.tables.as_deref())?;
    let closing_input: ClosingCostInput = match input::load(args.input.as_deref())? {
        Some(closing_input) => closing_input,
        None => {
            let (province, city) = args.jurisdiction.resolve()?;
            ClosingCostInput {
                home_price: args
                    .home_price
                    .ok_or("--home-price is required (or provide --input)")?,
                province,
                city,
                is_first_time_buyer: args.jurisdiction.first_time_buyer,
            }
        }
    };
    let result = estimator::estimate_closing_costs_with_tables(&closing_input, &tables)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_tables(args: TablesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tables = load_tables(args.tables.as_deref())?;
    Ok(serde_json::to_value(tables)?)
}
