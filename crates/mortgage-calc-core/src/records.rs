//! Flattened calculation record handed to the persistence layer.
//!
//! The engine never stores anything itself. This is the row shape the web
//! application saves alongside the user's own notes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::closing_costs::jurisdiction::{City, Province};
use crate::error::MortgageError;
use crate::mortgage::analysis::{MortgageAnalysis, MortgageAnalysisInput};
use crate::mortgage::payment::PaymentFrequency;
use crate::types::{round_currency, Money};
use crate::MortgageResult;

/// Longest notes or comments accepted, in characters.
pub const MAX_ANNOTATION_CHARS: usize = 5_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub home_price: Money,
    pub down_payment: Money,
    /// Annual rate as entered, in percent.
    pub interest_rate: Decimal,
    pub amortization_years: u32,
    pub payment_frequency: PaymentFrequency,
    pub province: Province,
    pub city: City,
    pub is_first_time_buyer: bool,
    /// Full monthly payment rounded to cents, whatever the display frequency.
    pub monthly_payment: Money,
    pub total_interest: Money,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl CalculationRecord {
    pub fn from_analysis(
        input: &MortgageAnalysisInput,
        analysis: &MortgageAnalysis,
        notes: Option<String>,
        comments: Option<String>,
    ) -> MortgageResult<Self> {
        let record = CalculationRecord {
            home_price: input.loan.home_price,
            down_payment: input.loan.down_payment,
            interest_rate: input.loan.annual_interest_rate_pct,
            amortization_years: input.loan.amortization_years,
            payment_frequency: input.loan.payment_frequency,
            province: input.province,
            city: input.city,
            is_first_time_buyer: input.is_first_time_buyer,
            monthly_payment: round_currency(analysis.payment.monthly_payment),
            total_interest: analysis.payment.total_interest,
            notes: normalize(notes),
            comments: normalize(comments),
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> MortgageResult<()> {
        check_length("notes", self.notes.as_deref())?;
        check_length("comments", self.comments.as_deref())
    }
}

/// Blank annotations are stored as absent.
fn normalize(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn check_length(field: &str, text: Option<&str>) -> MortgageResult<()> {
    if let Some(text) = text {
        let chars = text.chars().count();
        if chars > MAX_ANNOTATION_CHARS {
            return Err(MortgageError::InvalidInput {
                field: field.into(),
                reason: format!(
                    "{} characters exceeds the limit of {}",
                    chars, MAX_ANNOTATION_CHARS
                ),
            });
        }
    }
    Ok(())
}
