use rust_decimal::Decimal;

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// (1 + rate)^n by repeated squaring, or `None` once the factor leaves the
/// range of `Decimal`.
///
/// `rate` must be non-negative. Every intermediate is bounded by the final
/// factor, so an overflow anywhere means the result itself is unrepresentable.
pub fn compound_factor(rate: Rate, nper: u32) -> Option<Decimal> {
    let mut base = Decimal::ONE.checked_add(rate)?;
    let mut factor = Decimal::ONE;
    let mut exp = nper;
    while exp > 0 {
        if exp & 1 == 1 {
            factor = factor.checked_mul(base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = base.checked_mul(base)?;
        }
    }
    Some(factor)
}

/// Level payment that fully amortizes `principal` over `nper` periods at
/// `rate` per period.
///
/// P·r·(1+r)^n / ((1+r)^n − 1), or P / n when the rate is zero. When (1+r)^n
/// is too large to represent, the ratio (1+r)^n / ((1+r)^n − 1) equals one to
/// full precision and the payment is the interest-only amount P·r.
pub fn annuity_payment(rate: Rate, nper: u32, principal: Money) -> MortgageResult<Money> {
    if nper == 0 {
        return Err(MortgageError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if rate < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be non-negative".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let ratio = match compound_factor(rate, nper) {
        Some(factor) => {
            let denominator = factor - Decimal::ONE;
            if denominator.is_zero() {
                // A rate so small that (1+r)^n rounds to 1 behaves like a zero rate.
                return Ok(principal / Decimal::from(nper));
            }
            factor / denominator
        }
        None => Decimal::ONE,
    };

    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_mul(ratio))
        .ok_or_else(|| MortgageError::InvalidInput {
            field: "principal".into(),
            reason: format!(
                "Payment on {} at a periodic rate of {} exceeds the representable range",
                principal, rate
            ),
        })
}
