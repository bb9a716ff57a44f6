//! Money helpers shared by every calculator
//!
//! All monetary amounts are exact base-10 decimals. Amounts are expressed in
//! 万元 (ten-thousands of yuan) unless a field says otherwise.
//!
//! Every calculator output goes through [`round_money`] so totals are
//! reproducible across call sites.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CalcError;

/// Decimal places kept on every monetary output
pub const MONEY_SCALE: u32 = 2;

/// Watts per megawatt
pub const WATTS_PER_MW: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Yuan per 万元
pub const YUAN_PER_WAN: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Round to 2 places, half away from zero, and pin the scale at 2.
///
/// `1.005 -> 1.01`, `-1.005 -> -1.01`, `3 -> 3.00`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Parse a decimal literal such as `"1.72"` or `"-600"`.
pub fn parse_amount(field: &'static str, literal: &str) -> Result<Decimal, CalcError> {
    Decimal::from_str(literal.trim()).map_err(|_| CalcError::InvalidInput {
        field,
        value: literal.to_string(),
    })
}

/// Convert a float handed over by a collaborator into a decimal.
///
/// The float is formatted to its shortest round-trip representation first,
/// so `0.1` becomes exactly `0.1` rather than its binary expansion.
pub fn decimal_from_f64(field: &'static str, value: f64) -> Result<Decimal, CalcError> {
    if !value.is_finite() {
        return Err(CalcError::InvalidInput {
            field,
            value: value.to_string(),
        });
    }
    parse_amount(field, &value.to_string())
}

/// Convert an amount in yuan to 万元
#[inline]
pub fn yuan_to_wan(yuan: Decimal) -> Decimal {
    yuan / YUAN_PER_WAN
}

/// Convert megawatts to watts
pub fn mw_to_watts(field: &'static str, capacity_mw: Decimal) -> Result<Decimal, CalcError> {
    checked_mul(field, capacity_mw, WATTS_PER_MW)
}

fn out_of_range(field: &'static str, op: &str, lhs: Decimal, rhs: Decimal) -> CalcError {
    CalcError::InvalidInput {
        field,
        value: format!("{} {} {} is out of range", lhs, op, rhs),
    }
}

/// `lhs × rhs`, or `InvalidInput` for `field` when the product does not fit
pub fn checked_mul(field: &'static str, lhs: Decimal, rhs: Decimal) -> Result<Decimal, CalcError> {
    lhs.checked_mul(rhs).ok_or_else(|| out_of_range(field, "*", lhs, rhs))
}

/// `lhs ÷ rhs`, or `InvalidInput` for `field` on overflow or a zero divisor
pub fn checked_div(field: &'static str, lhs: Decimal, rhs: Decimal) -> Result<Decimal, CalcError> {
    lhs.checked_div(rhs).ok_or_else(|| out_of_range(field, "/", lhs, rhs))
}

pub fn checked_add(field: &'static str, lhs: Decimal, rhs: Decimal) -> Result<Decimal, CalcError> {
    lhs.checked_add(rhs).ok_or_else(|| out_of_range(field, "+", lhs, rhs))
}

pub fn checked_sub(field: &'static str, lhs: Decimal, rhs: Decimal) -> Result<Decimal, CalcError> {
    lhs.checked_sub(rhs).ok_or_else(|| out_of_range(field, "-", lhs, rhs))
}

/// Sum of `values`, failing instead of panicking on overflow
pub fn checked_sum(
    field: &'static str,
    values: impl IntoIterator<Item = Decimal>,
) -> Result<Decimal, CalcError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| checked_add(field, acc, value))
}
