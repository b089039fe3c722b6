use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------       Money         ---------------------------------------------------------
/// A fixed-point currency amount with two fraction digits, stored as an integer number of cents.
///
/// `Money` is stored in the database as its underlying integer, and renders as a two-decimal
/// string (`"20.00"`) via [`Display`] and on serialization boundaries, so amounts never pass
/// through binary floating point.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a money amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl FromStr for Money {
    type Err = MoneyConversionError;

    /// Parses a decimal string such as `"10"`, `"10.5"` or `"10.00"`. Amounts with more than two
    /// fraction digits are rounded half-up to the nearest cent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (sign, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        let all_digits =
            int_part.chars().all(|c| c.is_ascii_digit()) && frac_part.chars().all(|c| c.is_ascii_digit());
        if !all_digits || (int_part.is_empty() && frac_part.is_empty()) {
            return Err(MoneyConversionError(s.to_string()));
        }
        let units: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| MoneyConversionError(s.to_string()))?
        };
        let mut frac = frac_part.chars().map(|c| c as i64 - '0' as i64);
        let tens = frac.next().unwrap_or(0);
        let ones = frac.next().unwrap_or(0);
        let round_up = frac.next().map(|d| d >= 5).unwrap_or(false);
        let cents = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(tens * 10 + ones + i64::from(round_up)))
            .ok_or_else(|| MoneyConversionError(s.to_string()))?;
        Ok(Self(sign * cents))
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: serde::Serializer {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: serde::Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in cents.
    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::Money;

    #[test]
    fn parses_two_decimal_strings() {
        assert_eq!("10.00".parse::<Money>().unwrap(), Money::from_cents(1000));
        assert_eq!("0.50".parse::<Money>().unwrap(), Money::from_cents(50));
        assert_eq!("10".parse::<Money>().unwrap(), Money::from_cents(1000));
        assert_eq!("10.5".parse::<Money>().unwrap(), Money::from_cents(1050));
        assert_eq!("-3.25".parse::<Money>().unwrap(), Money::from_cents(-325));
    }

    #[test]
    fn rounds_half_up_past_two_digits() {
        assert_eq!("10.005".parse::<Money>().unwrap(), Money::from_cents(1001));
        assert_eq!("10.0049".parse::<Money>().unwrap(), Money::from_cents(1000));
        assert_eq!("0.999".parse::<Money>().unwrap(), Money::from_cents(100));
    }

    #[test]
    fn rejects_non_numeric_strings() {
        for s in ["", "  ", "abc", "10.0.0", "1o", "£5", "-"] {
            assert!(s.parse::<Money>().is_err(), "expected {s:?} to be rejected");
        }
    }

    #[test]
    fn displays_with_two_decimals() {
        assert_eq!(Money::from_cents(2000).to_string(), "20.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-50).to_string(), "-0.50");
    }

    #[test]
    fn serializes_as_a_string() {
        let json = serde_json::to_string(&Money::from_cents(1999)).unwrap();
        assert_eq!(json, "\"19.99\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::from_cents(1999));
    }

    #[test]
    fn arithmetic() {
        let total: Money = [Money::from_cents(100), Money::from_cents(250)].into_iter().sum();
        assert_eq!(total, Money::from_cents(350));
        assert_eq!(Money::from_cents(1000) * 3, Money::from_cents(3000));
        assert_eq!(-Money::from_cents(5), Money::from_cents(-5));
    }
}
