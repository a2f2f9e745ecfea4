//! Decimal statistics shared by the calculators.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};

/// Arithmetic mean; zero for an empty slice, `None` if the sum overflows.
pub(crate) fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return Some(Decimal::ZERO);
    }
    checked_sum(values.iter().copied())?.checked_div(Decimal::from(values.len()))
}

/// Population standard deviation (divides by `n`); zero below two observations.
///
/// `None` if the squared deviations leave the decimal range.
pub(crate) fn population_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return Some(Decimal::ZERO);
    }
    let avg = mean(values)?;
    let mut squares = Decimal::ZERO;
    for v in values {
        let d = v.checked_sub(avg)?;
        squares = squares.checked_add(d.checked_mul(d)?)?;
    }
    Some(sqrt(squares.checked_div(Decimal::from(values.len()))?))
}

/// `(end − start − flows) / start`, or `None` on overflow.
///
/// The caller guards `start > 0`.
pub(crate) fn simple_return(start: Decimal, end: Decimal, flows: Decimal) -> Option<Decimal> {
    end.checked_sub(start)?.checked_sub(flows)?.checked_div(start)
}

/// Geometric link `Π(1 + rᵢ) − 1`, or `None` on overflow.
pub(crate) fn link<'a>(returns: impl IntoIterator<Item = &'a Decimal>) -> Option<Decimal> {
    returns
        .into_iter()
        .try_fold(Decimal::ONE, |acc, r| acc.checked_mul(Decimal::ONE.checked_add(*r)?))?
        .checked_sub(Decimal::ONE)
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Square root, zero for non-positive input.
pub(crate) fn sqrt(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    value.sqrt().unwrap_or(Decimal::ZERO)
}

/// `base^exponent` for fractional exponents, via `f64`.
///
/// Returns `None` when the result is not a finite real number.
pub(crate) fn powf(base: Decimal, exponent: Decimal) -> Option<Decimal> {
    let result = base.to_f64()?.powf(exponent.to_f64()?);
    if !result.is_finite() {
        return None;
    }
    Decimal::from_f64(result)
}
