use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use serde::{
    Deserialize, Deserializer,
    de::{self, Visitor},
};

use crate::EngineError;

/// Money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (fares, caps,
/// accumulated totals, charges) to avoid floating-point drift when caps are
/// compared against running sums.
///
/// # Examples
///
/// ```rust
/// use fare_engine::MoneyCents;
///
/// let amount = MoneyCents::new(2_50);
/// assert_eq!(amount.cents(), 250);
/// assert_eq!(amount.to_string(), "$2.50");
/// assert_eq!(MoneyCents::from_units(115).to_string(), "$115");
/// ```
///
/// Arithmetic saturates at the `i64` bounds, so running totals of huge
/// configured amounts stay ordered against their caps.
///
/// Parsing from text (accepts `.` or `,` as decimal separator; rejects > 2
/// decimals):
///
/// ```rust
/// use fare_engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates a new amount from whole currency units.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Converts a configuration number into cents.
    ///
    /// Rejects negative values, non-finite values and more than two decimals.
    pub fn try_from_f64(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(format!("{value} is not a number")));
        }
        if value < 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "{value} must not be negative"
            )));
        }
        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(EngineError::InvalidAmount(format!(
                "{value} has too many decimals"
            )));
        }
        if rounded > i64::MAX as f64 {
            return Err(EngineError::InvalidAmount(format!("{value} is too large")));
        }

        Ok(MoneyCents(rounded as i64))
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        if cents == 0 {
            write!(f, "{sign}${units}")
        } else {
            write!(f, "{sign}${units}.{cents:02}")
        }
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, Add::add)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a non-negative decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid/negative strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s:?}"));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let normalized = trimmed.replace(',', ".");
        let mut parts = normalized.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| invalid())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .map(MoneyCents)
            .ok_or_else(overflow)
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = MoneyCents;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative amount with at most two decimals")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        i64::try_from(value)
            .ok()
            .and_then(|units| units.checked_mul(100))
            .map(MoneyCents)
            .ok_or_else(|| E::custom(format!("amount {value} is too large")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        if value < 0 {
            return Err(E::custom(format!("amount {value} must not be negative")));
        }
        value
            .checked_mul(100)
            .map(MoneyCents)
            .ok_or_else(|| E::custom(format!("amount {value} is too large")))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        MoneyCents::try_from_f64(value).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for MoneyCents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_dollars() {
        assert_eq!(MoneyCents::new(0).to_string(), "$0");
        assert_eq!(MoneyCents::new(1).to_string(), "$0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "$0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "$10.50");
        assert_eq!(MoneyCents::from_units(115).to_string(), "$115");
        assert_eq!(MoneyCents::new(-250).to_string(), "-$2.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("  2.30 ".parse::<MoneyCents>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<MoneyCents>().is_err());
        assert!("0.001".parse::<MoneyCents>().is_err());
        assert!("-1".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn deserialize_integers_and_floats() {
        let amounts: Vec<MoneyCents> = serde_json::from_str("[2, 0, 2.5, 0.05, 55.0]").unwrap();
        assert_eq!(
            amounts,
            vec![
                MoneyCents::new(200),
                MoneyCents::ZERO,
                MoneyCents::new(250),
                MoneyCents::new(5),
                MoneyCents::new(5500),
            ]
        );
    }

    #[test]
    fn deserialize_rejects_negative_and_fractional_cents() {
        assert!(serde_json::from_str::<MoneyCents>("-1").is_err());
        assert!(serde_json::from_str::<MoneyCents>("-0.5").is_err());
        assert!(serde_json::from_str::<MoneyCents>("1.234").is_err());
        assert!(serde_json::from_str::<MoneyCents>("true").is_err());
    }

    #[test]
    fn arithmetic_saturates() {
        let max = MoneyCents::new(i64::MAX);
        assert_eq!(max + MoneyCents::new(1), max);
        let mut total = MoneyCents::from_units(500_000_000_000_000);
        total += max;
        assert_eq!(total, max);
        assert_eq!(MoneyCents::new(i64::MIN) - MoneyCents::new(1), MoneyCents::new(i64::MIN));
        assert_eq!([max, max].into_iter().sum::<MoneyCents>(), max);
    }

    #[test]
    fn sums_charges() {
        let total: MoneyCents = [2, 2, 0, 1].into_iter().map(MoneyCents::from_units).sum();
        assert_eq!(total, MoneyCents::from_units(5));
    }
}
