//! Scaled arithmetic for amounts, prices and transfer rates.
//!
//! Amounts are `i64` and rates carry nine implied decimals ([`RATE_ONE`]).
//! Products are taken in 128 bits before dividing back down.
//!
//! ```
//! use newcoin_common::math::{mul_div, Rounding};
//!
//! assert_eq!(mul_div(1_000_000_000, 1_000_000, 1000, Rounding::Down), Ok(1_000_000_000_000));
//! ```

use thiserror::Error;

/// A transfer rate of exactly 1: nothing is skimmed.
pub const RATE_ONE: u32 = 1_000_000_000;

/// Which way a quotient with a remainder goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("scaled result does not fit in 64 bits")]
    Overflow,
    #[error("zero divisor")]
    ZeroDivisor,
    #[error("negative operand")]
    Negative,
}

/// `value * numerator / denominator` for non-negative operands.
pub fn mul_div(
    value: i64,
    numerator: i64,
    denominator: i64,
    rounding: Rounding,
) -> Result<i64, MathError> {
    if value < 0 || numerator < 0 || denominator < 0 {
        return Err(MathError::Negative);
    }
    let wide = mul_div_u64(value as u64, numerator as u64, denominator as u64, rounding)?;
    i64::try_from(wide).map_err(|_| MathError::Overflow)
}

/// Unsigned form of [`mul_div`].
pub fn mul_div_u64(
    value: u64,
    numerator: u64,
    denominator: u64,
    rounding: Rounding,
) -> Result<u64, MathError> {
    if denominator == 0 {
        return Err(MathError::ZeroDivisor);
    }
    let product = u128::from(value) * u128::from(numerator);
    let denominator = u128::from(denominator);
    let quotient = match rounding {
        Rounding::Down => product / denominator,
        Rounding::Up => product.div_ceil(denominator),
    };
    u64::try_from(quotient).map_err(|_| MathError::Overflow)
}

/// What must go into an account charging `rate` for `amount` to come out.
pub fn apply_rate(amount: i64, rate: u32, rounding: Rounding) -> Result<i64, MathError> {
    mul_div(amount, i64::from(rate), i64::from(RATE_ONE), rounding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding() {
        assert_eq!(mul_div(9, 2, 6, Rounding::Down), Ok(3));
        assert_eq!(mul_div(7, 3, 5, Rounding::Down), Ok(4));
        assert_eq!(mul_div(7, 3, 5, Rounding::Up), Ok(5));
    }

    #[test]
    fn test_wide_intermediate() {
        let big = i64::MAX / 3;
        assert_eq!(mul_div(big, 6, 6, Rounding::Up), Ok(big));
        assert_eq!(mul_div(i64::MAX, 3, 2, Rounding::Down), Err(MathError::Overflow));
    }

    #[test]
    fn test_bad_operands() {
        assert_eq!(mul_div(5, -1, 1, Rounding::Down), Err(MathError::Negative));
        assert_eq!(mul_div(5, 1, 0, Rounding::Down), Err(MathError::ZeroDivisor));
        assert_eq!(mul_div_u64(5, 1, 0, Rounding::Up), Err(MathError::ZeroDivisor));
    }

    #[test]
    fn test_transfer_rates() {
        assert_eq!(apply_rate(250, RATE_ONE, Rounding::Up), Ok(250));
        // A 1.1 rate on 100.
        assert_eq!(apply_rate(100, 1_100_000_000, Rounding::Up), Ok(110));
        assert_eq!(apply_rate(3, 1_200_000_000, Rounding::Up), Ok(4));
        assert_eq!(apply_rate(3, 1_200_000_000, Rounding::Down), Ok(3));
    }
}
