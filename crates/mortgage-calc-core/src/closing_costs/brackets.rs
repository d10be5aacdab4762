//! Marginal bracket schedules.
//!
//! A schedule is an ordered list of brackets, each taxing the slice of an
//! amount between the previous bracket's upper bound and its own. The final
//! bracket is open-ended.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound of the slice; `None` for the top bracket.
    pub upper_bound: Option<Money>,
    /// Marginal rate applied to the slice (0.015 = 1.5%).
    pub rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketSchedule {
    pub brackets: Vec<TaxBracket>,
}

/// Portion of an amount falling in one bracket, and the tax on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub rate: Rate,
    pub taxable_amount: Money,
    pub tax: Money,
}

impl BracketSchedule {
    pub fn new(brackets: Vec<TaxBracket>) -> Self {
        BracketSchedule { brackets }
    }

    /// Check the schedule is well formed: at least one bracket, strictly
    /// increasing positive upper bounds, only the last bracket open-ended and
    /// no negative rates. `name` identifies the schedule in the error.
    pub fn validate(&self, name: &str) -> MortgageResult<()> {
        let invalid = |reason: String| MortgageError::InvalidInput {
            field: name.to_string(),
            reason,
        };

        if self.brackets.is_empty() {
            return Err(invalid("Bracket schedule must contain at least one bracket".into()));
        }

        let last = self.brackets.len() - 1;
        let mut previous = Decimal::ZERO;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return Err(invalid(format!("Bracket {} has a negative rate", i + 1)));
            }
            match bracket.upper_bound {
                Some(upper) if i == last => {
                    return Err(invalid(format!(
                        "Top bracket must be open-ended, found upper bound {}",
                        upper
                    )));
                }
                Some(upper) if upper <= previous => {
                    return Err(invalid(format!(
                        "Bracket {} upper bound {} must exceed {}",
                        i + 1,
                        upper,
                        previous
                    )));
                }
                Some(upper) => previous = upper,
                None if i != last => {
                    return Err(invalid(format!(
                        "Only the top bracket may be open-ended (bracket {})",
                        i + 1
                    )));
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Tax owed on `amount`: the sum over every bracket the amount reaches of
    /// `(min(amount, upper) − lower) × rate`.
    pub fn apply(&self, amount: Money) -> Money {
        self.slices(amount).iter().map(|s| s.tax).sum()
    }

    /// Per-bracket breakdown of the tax on `amount`. Brackets above the amount
    /// are omitted.
    pub fn slices(&self, amount: Money) -> Vec<BracketSlice> {
        let mut slices = Vec::new();
        let mut lower = Decimal::ZERO;

        for bracket in &self.brackets {
            if amount <= lower {
                break;
            }
            let top = match bracket.upper_bound {
                Some(upper) => amount.min(upper),
                None => amount,
            };
            let taxable_amount = top - lower;
            slices.push(BracketSlice {
                lower_bound: lower,
                upper_bound: bracket.upper_bound,
                rate: bracket.rate,
                taxable_amount,
                tax: taxable_amount * bracket.rate,
            });

            match bracket.upper_bound {
                Some(upper) => lower = upper,
                None => break,
            }
        }
        slices
    }

    /// Rate applied to the next dollar above `amount`.
    pub fn marginal_rate_at(&self, amount: Money) -> Rate {
        self.brackets
            .iter()
            .find(|b| b.upper_bound.map_or(true, |upper| amount < upper))
            .or_else(|| self.brackets.last())
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn two_tier() -> BracketSchedule {
        BracketSchedule::new(vec![
            TaxBracket {
                upper_bound: Some(dec!(100_000)),
                rate: dec!(0.01),
            },
            TaxBracket {
                upper_bound: None,
                rate: dec!(0.02),
            },
        ])
    }

    #[test]
    fn test_apply_within_first_bracket() {
        assert_eq!(two_tier().apply(dec!(50_000)), dec!(500));
    }

    #[test]
    fn test_apply_at_boundary() {
        assert_eq!(two_tier().apply(dec!(100_000)), dec!(1000));
    }

    #[test]
    fn test_apply_spanning_brackets() {
        // 100,000 × 1% + 50,000 × 2%
        assert_eq!(two_tier().apply(dec!(150_000)), dec!(2000));
    }

    #[test]
    fn test_apply_zero_and_negative() {
        assert_eq!(two_tier().apply(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(two_tier().apply(dec!(-10)), Decimal::ZERO);
    }

    #[test]
    fn test_slices_breakdown() {
        let slices = two_tier().slices(dec!(150_000));
        assert_eq!(
            slices,
            vec![
                BracketSlice {
                    lower_bound: Decimal::ZERO,
                    upper_bound: Some(dec!(100_000)),
                    rate: dec!(0.01),
                    taxable_amount: dec!(100_000),
                    tax: dec!(1000),
                },
                BracketSlice {
                    lower_bound: dec!(100_000),
                    upper_bound: None,
                    rate: dec!(0.02),
                    taxable_amount: dec!(50_000),
                    tax: dec!(1000),
                },
            ]
        );
    }

    #[test]
    fn test_marginal_rate_at() {
        let schedule = two_tier();
        assert_eq!(schedule.marginal_rate_at(dec!(99_999)), dec!(0.01));
        assert_eq!(schedule.marginal_rate_at(dec!(100_000)), dec!(0.02));
        assert_eq!(schedule.marginal_rate_at(dec!(5_000_000)), dec!(0.02));
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(two_tier().validate("two_tier").is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(BracketSchedule::new(vec![]).validate("empty").is_err());
    }

    #[test]
    fn test_validate_rejects_unordered_bounds() {
        let schedule = BracketSchedule::new(vec![
            TaxBracket {
                upper_bound: Some(dec!(200_000)),
                rate: dec!(0.01),
            },
            TaxBracket {
                upper_bound: Some(dec!(100_000)),
                rate: dec!(0.02),
            },
            TaxBracket {
                upper_bound: None,
                rate: dec!(0.03),
            },
        ]);
        match schedule.validate("unordered") {
            Err(MortgageError::InvalidInput { field, .. }) => assert_eq!(field, "unordered"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bounded_top_bracket() {
        let schedule = BracketSchedule::new(vec![TaxBracket {
            upper_bound: Some(dec!(100_000)),
            rate: dec!(0.01),
        }]);
        assert!(schedule.validate("bounded").is_err());
    }

    #[test]
    fn test_validate_rejects_open_middle_bracket() {
        let schedule = BracketSchedule::new(vec![
            TaxBracket {
                upper_bound: None,
                rate: dec!(0.01),
            },
            TaxBracket {
                upper_bound: None,
                rate: dec!(0.02),
            },
        ]);
        assert!(schedule.validate("open_middle").is_err());
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let schedule = BracketSchedule::new(vec![TaxBracket {
            upper_bound: None,
            rate: dec!(-0.01),
        }]);
        assert!(schedule.validate("negative").is_err());
    }
}
