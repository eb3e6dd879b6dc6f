//! Exact monetary arithmetic backed by rust_decimal.
//!
//! All engine math runs on `Money` without rounding; amounts are rounded to
//! 2 decimal places (half-up) only at the point they are emitted, so repeated
//! calculations over the same inputs cannot drift.

use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// A monetary amount (or rate) with exact decimal semantics.
///
/// Serializes to a JSON number, not a string.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Money {
    pub fn new(value: RustDecimal) -> Self {
        Money(value)
    }

    /// Parse from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Money)
    }

    /// Format as a canonical string (no exponent notation, no trailing zeros).
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn zero() -> Self {
        Money(RustDecimal::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn from_i64(value: i64) -> Self {
        Money(RustDecimal::from(value))
    }

    /// Round to 2 decimal places, half-up. Applied once, at emission.
    pub fn round2(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// `rate` percent of this amount, where rate is on the 0-100 scale.
    pub fn percent(&self, rate: Money) -> Self {
        Money(self.0 * rate.0 / RustDecimal::ONE_HUNDRED)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Money {
    fn from(value: RustDecimal) -> Self {
        Money(value)
    }
}

impl From<Money> for RustDecimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Money {
    type Output = Money;

    fn mul(self, rhs: Money) -> Money {
        Money(self.0 * rhs.0)
    }
}

impl std::ops::Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * RustDecimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_parse_roundtrip() {
        let test_cases = vec!["12.50", "0.01", "1000000", "0", "99.999"];

        for s in test_cases {
            let money = Money::from_str_canonical(s).expect("parse failed");
            let formatted = money.to_canonical_string();
            let reparsed = Money::from_str_canonical(&formatted).expect("reparse failed");
            assert_eq!(money, reparsed, "roundtrip failed for {}", s);
        }
    }

    #[test]
    fn test_round2_half_up() {
        let m = Money::from_str_canonical("1.005").unwrap();
        assert_eq!(m.round2().to_canonical_string(), "1.01");

        let m = Money::from_str_canonical("1.004").unwrap();
        assert_eq!(m.round2().to_canonical_string(), "1");

        let m = Money::from_str_canonical("5.01").unwrap();
        assert_eq!(m.round2().to_canonical_string(), "5.01");
    }

    #[test]
    fn test_percent() {
        let subtotal = Money::from_str_canonical("50").unwrap();
        let rate = Money::from_str_canonical("8").unwrap();
        assert_eq!(subtotal.percent(rate).to_canonical_string(), "4");
    }

    #[test]
    fn test_quantity_multiplication() {
        let unit = Money::from_str_canonical("12.50").unwrap();
        let line = unit * 2;
        assert_eq!(line.to_canonical_string(), "25");
    }

    #[test]
    fn test_sum() {
        let total: Money = vec!["1.10", "2.20", "3.30"]
            .into_iter()
            .map(|s| Money::from_str_canonical(s).unwrap())
            .sum();
        assert_eq!(total.to_canonical_string(), "6.6");
    }

    #[test]
    fn test_json_serialization_is_number() {
        let money = Money::from_str_canonical("12.5").unwrap();
        let json = serde_json::to_value(money).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "12.5");
    }

    #[test]
    fn test_is_negative() {
        assert!(Money::from_str_canonical("-0.01").unwrap().is_negative());
        assert!(!Money::zero().is_negative());
        assert!(!Money::from_str_canonical("1").unwrap().is_negative());
    }
}
