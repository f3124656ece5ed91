//! Exact decimal quantities for durations, dates and margins.
//!
//! A `Quantity` is a fixed-point value `units / 10^scale`. Sums and
//! differences of durations stay exact, and display follows the schedule
//! rule: integral values print without a fractional part, others print at
//! their scale with trailing zeros trimmed.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest supported number of fractional digits.
pub const MAX_SCALE: u32 = 18;

/// Errors when parsing, converting or combining `Quantity` values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("not a decimal number: {0:?}")]
    Malformed(String),
    #[error("value is not finite")]
    NotFinite,
    #[error("value out of range: {0}")]
    OutOfRange(String),
    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}

#[inline]
fn pow10(exp: u32) -> i128 {
    10i128.pow(exp)
}

/// Fixed-point decimal number.
///
/// Every value stays representable at `MAX_SCALE`, so two quantities of any
/// scales can always be aligned to a common scale without overflow.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quantity {
    units: i128,
    scale: u32,
}

impl Quantity {
    pub const ZERO: Quantity = Quantity { units: 0, scale: 0 };

    /// `units / 10^scale`.
    pub fn new(units: i128, scale: u32) -> Result<Self, QuantityError> {
        if scale > MAX_SCALE {
            return Err(QuantityError::OutOfRange(format!("scale {scale}")));
        }
        Self::bounded(units, scale)
            .ok_or_else(|| QuantityError::OutOfRange(format!("{units}e-{scale}")))
    }

    pub const fn integer(value: i64) -> Self {
        Self {
            units: value as i128,
            scale: 0,
        }
    }

    /// `None` when `units / 10^scale` would not fit once aligned to `MAX_SCALE`.
    fn bounded(units: i128, scale: u32) -> Option<Self> {
        units.checked_mul(pow10(MAX_SCALE - scale))?;
        Some(Self { units, scale })
    }

    /// Number of fractional digits carried.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    #[inline]
    pub fn units(&self) -> i128 {
        self.units
    }

    pub fn is_negative(&self) -> bool {
        self.units < 0
    }

    pub fn is_integral(&self) -> bool {
        self.units % pow10(self.scale) == 0
    }

    /// Same value expressed with `scale` fractional digits, rounding half
    /// away from zero when digits are dropped.
    pub fn rescaled(&self, scale: u32) -> Result<Self, QuantityError> {
        if scale > MAX_SCALE {
            return Err(QuantityError::OutOfRange(format!("scale {scale}")));
        }
        let units = match scale.cmp(&self.scale) {
            Ordering::Equal => self.units,
            // In range: the value is representable at MAX_SCALE.
            Ordering::Greater => self.units * pow10(scale - self.scale),
            Ordering::Less => {
                let div = pow10(self.scale - scale);
                let q = self.units / div;
                let r = self.units % div;
                if 2 * r.abs() >= div {
                    q + self.units.signum()
                } else {
                    q
                }
            }
        };
        Self::bounded(units, scale).ok_or_else(|| QuantityError::OutOfRange(self.to_string()))
    }

    /// Both operands as units at their common (larger) scale.
    fn aligned(self, other: Quantity) -> (i128, i128, u32) {
        let scale = self.scale.max(other.scale);
        let a = self.units * pow10(scale - self.scale);
        let b = other.units * pow10(scale - other.scale);
        (a, b, scale)
    }

    /// Exact sum; fails instead of losing digits or wrapping.
    pub fn checked_add(self, rhs: Quantity) -> Result<Quantity, QuantityError> {
        let (a, b, scale) = self.aligned(rhs);
        a.checked_add(b)
            .and_then(|units| Self::bounded(units, scale))
            .ok_or_else(|| QuantityError::Overflow(format!("{self} + {rhs}")))
    }

    /// Exact difference; fails instead of losing digits or wrapping.
    pub fn checked_sub(self, rhs: Quantity) -> Result<Quantity, QuantityError> {
        let (a, b, scale) = self.aligned(rhs);
        a.checked_sub(b)
            .and_then(|units| Self::bounded(units, scale))
            .ok_or_else(|| QuantityError::Overflow(format!("{self} - {rhs}")))
    }

    pub fn to_f64(&self) -> f64 {
        self.units as f64 / pow10(self.scale) as f64
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity::integer(value)
    }
}

impl TryFrom<f64> for Quantity {
    type Error = QuantityError;

    /// Converts through the shortest decimal representation of `value`,
    /// so `2.5` has scale 1 and `7.0` has scale 0.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(QuantityError::NotFinite);
        }
        format!("{value}").parse()
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || QuantityError::Malformed(s.to_string());
        let out_of_range = || QuantityError::OutOfRange(s.to_string());
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let scale = frac_part.len() as u32;
        if scale > MAX_SCALE {
            return Err(out_of_range());
        }

        let mut units: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(i128::from(b - b'0')))
                .ok_or_else(out_of_range)?;
        }
        if negative {
            units = -units;
        }
        Self::bounded(units, scale).ok_or_else(out_of_range)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(*other);
        a.cmp(&b)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let div = pow10(self.scale);
        let sign = if self.units < 0 { "-" } else { "" };
        let magnitude = self.units.unsigned_abs();
        let int_part = magnitude / div as u128;
        let frac_part = magnitude % div as u128;
        if frac_part == 0 {
            return write!(f, "{sign}{int_part}");
        }
        let digits = format!("{:0width$}", frac_part, width = self.scale as usize);
        write!(f, "{sign}{int_part}.{}", digits.trim_end_matches('0'))
    }
}

/// Display precision of a schedule: the largest number of fractional digits
/// among its input durations. Fixed once when the graph is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Precision(u32);

impl Precision {
    pub fn of<'a>(values: impl IntoIterator<Item = &'a Quantity>) -> Self {
        Self(values.into_iter().map(|q| q.scale()).max().unwrap_or(0))
    }

    #[inline]
    pub fn digits(&self) -> u32 {
        self.0
    }

    /// Display form of `value`: integral values without fractional part,
    /// others rounded to this precision.
    pub fn format(&self, value: Quantity) -> String {
        if value.is_integral() || value.scale() <= self.0 {
            return value.to_string();
        }
        match value.rescaled(self.0) {
            Ok(rounded) => rounded.to_string(),
            Err(_) => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Quantity {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(q("7"), Quantity::integer(7));
        assert_eq!(q("2.5").scale(), 1);
        assert_eq!(q("2.5").units(), 25);
        assert_eq!(q(".5"), q("0.5"));
        assert_eq!(q("-1.25").units(), -125);
        assert!("".parse::<Quantity>().is_err());
        assert!("1e3".parse::<Quantity>().is_err());
        assert!("1.2.3".parse::<Quantity>().is_err());
        assert!(".".parse::<Quantity>().is_err());
    }

    #[test]
    fn test_equality_ignores_trailing_zeros() {
        assert_eq!(q("2.50"), q("2.5"));
        assert_eq!(q("3.0"), Quantity::integer(3));
        assert!(q("2.25") < q("2.5"));
    }

    #[test]
    fn test_exact_arithmetic() {
        let sum = q("0.1").checked_add(q("0.2")).unwrap();
        assert_eq!(sum, q("0.3"));
        assert_eq!(q("1.5").checked_sub(q("0.25")).unwrap().to_string(), "1.25");
        assert_eq!(Quantity::integer(3).checked_sub(q("3.0")).unwrap().to_string(), "0");
    }

    #[test]
    fn test_mixed_scale_arithmetic_is_exact() {
        let tiny = q("0.000000000000000001");
        let sum = Quantity::integer(100).checked_add(tiny).unwrap();
        assert_eq!(sum.scale(), 18);
        assert_eq!(sum.to_string(), "100.000000000000000001");
        assert_eq!(sum.checked_sub(tiny).unwrap(), Quantity::integer(100));

        let big = Quantity::integer(i64::MAX);
        assert_eq!(big.checked_add(tiny).unwrap().checked_sub(big).unwrap(), tiny);
    }

    #[test]
    fn test_overflow_is_an_error() {
        // Largest integer still representable with 18 fractional digits.
        let max = q("170141183460469231731");
        assert!("170141183460469231732".parse::<Quantity>().is_err());
        assert!(matches!(
            max.checked_add(Quantity::integer(1)),
            Err(QuantityError::Overflow(_))
        ));
        assert!(matches!(
            q("-170141183460469231731").checked_sub(q("0.5")),
            Err(QuantityError::Overflow(_))
        ));
        assert!(matches!(
            Quantity::new(i128::MAX, 0),
            Err(QuantityError::OutOfRange(_))
        ));
        assert!(max.rescaled(MAX_SCALE).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(Quantity::integer(25).to_string(), "25");
        assert_eq!(q("4.50").to_string(), "4.5");
        assert_eq!(q("-0.75").to_string(), "-0.75");
        assert_eq!(q("0.05").to_string(), "0.05");
        assert_eq!(q("12.000").to_string(), "12");
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Quantity::try_from(7.0).unwrap().scale(), 0);
        assert_eq!(Quantity::try_from(2.5).unwrap(), q("2.5"));
        assert_eq!(Quantity::try_from(0.1).unwrap().scale(), 1);
        assert_eq!(Quantity::try_from(f64::NAN), Err(QuantityError::NotFinite));
    }

    #[test]
    fn test_rescaled_rounds_half_away_from_zero() {
        assert_eq!(q("1.25").rescaled(1).unwrap().units(), 13);
        assert_eq!(q("-1.25").rescaled(1).unwrap().units(), -13);
        assert_eq!(q("1.5").rescaled(3).unwrap().units(), 1500);
    }

    #[test]
    fn test_precision() {
        let values = [q("7"), q("2.5"), q("0.125")];
        let precision = Precision::of(&values);
        assert_eq!(precision.digits(), 3);
        assert_eq!(precision.format(q("11.000")), "11");
        assert_eq!(Precision::of(&[q("1.5")]).format(q("2.25")), "2.3");
        assert_eq!(Precision::of(std::iter::empty::<&Quantity>()).digits(), 0);
    }
}
