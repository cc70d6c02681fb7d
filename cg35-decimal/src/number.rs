//! Decimal number representation, parsing and formatting

use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;
use core::ops::Neg;
use core::str::FromStr;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::ParseDecimalError;

/// Value class of a decimal
#[derive(Debug, Clone)]
pub(crate) enum Repr {
    /// `coefficient × 10^exponent`
    Finite { coefficient: BigUint, exponent: i64 },
    Infinite,
    NaN,
}

/// Arbitrary precision signed decimal number
///
/// Trailing zeros in the coefficient are significant to the representation
/// (`1.50` and `1.5` format differently) but not to comparison: equality and
/// ordering are numeric.
#[derive(Debug, Clone)]
pub struct Decimal {
    pub(crate) negative: bool,
    pub(crate) repr: Repr,
}

/// `10^n`
pub(crate) fn pow10(n: u32) -> BigUint {
    BigUint::from(10u32).pow(n)
}

/// Number of decimal digits in `n` (zero has one digit)
pub(crate) fn digit_count(n: &BigUint) -> u32 {
    if n.is_zero() {
        1
    } else {
        n.to_str_radix(10).len() as u32
    }
}

impl Decimal {
    /// Positive zero with exponent 0
    pub fn zero() -> Self {
        Self::from_parts(false, BigUint::zero(), 0)
    }

    /// Exact one
    pub fn one() -> Self {
        Self::from_parts(false, BigUint::one(), 0)
    }

    /// Signed infinity
    pub fn infinity(negative: bool) -> Self {
        Self {
            negative,
            repr: Repr::Infinite,
        }
    }

    /// Quiet NaN
    pub fn nan() -> Self {
        Self {
            negative: false,
            repr: Repr::NaN,
        }
    }

    /// Build a finite value `(-1)^negative × coefficient × 10^exponent`
    pub fn from_parts(negative: bool, coefficient: BigUint, exponent: i64) -> Self {
        Self {
            negative,
            repr: Repr::Finite {
                coefficient,
                exponent,
            },
        }
    }

    /// Check if this is a finite number
    pub fn is_finite(&self) -> bool {
        matches!(self.repr, Repr::Finite { .. })
    }

    /// Check if this is positive or negative infinity
    pub fn is_infinite(&self) -> bool {
        matches!(self.repr, Repr::Infinite)
    }

    /// Check if this is NaN
    pub fn is_nan(&self) -> bool {
        matches!(self.repr, Repr::NaN)
    }

    /// Check if this is a zero of either sign
    pub fn is_zero(&self) -> bool {
        matches!(&self.repr, Repr::Finite { coefficient, .. } if coefficient.is_zero())
    }

    /// Sign bit, set for negative zero as well
    pub fn is_sign_negative(&self) -> bool {
        self.negative
    }

    /// Check if the value is strictly below zero
    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero() && !self.is_nan()
    }

    /// Coefficient of a finite value
    pub fn coefficient(&self) -> Option<&BigUint> {
        match &self.repr {
            Repr::Finite { coefficient, .. } => Some(coefficient),
            _ => None,
        }
    }

    /// Exponent of a finite value
    pub fn exponent(&self) -> Option<i64> {
        match &self.repr {
            Repr::Finite { exponent, .. } => Some(*exponent),
            _ => None,
        }
    }

    /// Exponent of the most significant digit
    ///
    /// `123.45` has adjusted exponent 2. Non-finite values report 0.
    pub fn adjusted(&self) -> i64 {
        match &self.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } => {
                if coefficient.is_zero() {
                    *exponent
                } else {
                    exponent + digit_count(coefficient) as i64 - 1
                }
            }
            _ => 0,
        }
    }

    /// Check if a finite value has no fractional part
    pub fn is_integral(&self) -> bool {
        match &self.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } => {
                if *exponent >= 0 || coefficient.is_zero() {
                    return true;
                }
                let shift = exponent.unsigned_abs();
                if shift > u64::from(digit_count(coefficient)) {
                    return false;
                }
                (coefficient % pow10(shift as u32)).is_zero()
            }
            _ => false,
        }
    }

    /// Check if the value is an odd integer
    pub(crate) fn is_odd_integer(&self) -> bool {
        match &self.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } if self.is_integral() => {
                if *exponent > 0 {
                    return false;
                }
                let integer = coefficient / pow10(exponent.unsigned_abs() as u32);
                integer.is_odd()
            }
            _ => false,
        }
    }

    /// Same value with the sign bit cleared
    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            repr: self.repr.clone(),
        }
    }

    /// Same value with the sign bit flipped
    pub fn negated(&self) -> Self {
        Self {
            negative: !self.negative,
            repr: self.repr.clone(),
        }
    }

    /// Integer value if the number is integral and fits an `i64`
    pub fn to_i64(&self) -> Option<i64> {
        match &self.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } if self.is_integral() => {
                let magnitude = if *exponent >= 0 {
                    if *exponent > 19 && !coefficient.is_zero() {
                        return None;
                    }
                    coefficient * pow10(*exponent as u32)
                } else {
                    coefficient / pow10(exponent.unsigned_abs() as u32)
                };
                let value = magnitude.to_i64()?;
                Some(if self.negative { -value } else { value })
            }
            _ => None,
        }
    }

    /// Coefficient digits with trailing zeros removed, or `None` if not finite
    pub(crate) fn reduced(&self) -> Option<(BigUint, i64)> {
        match &self.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } => {
                if coefficient.is_zero() {
                    return Some((BigUint::zero(), 0));
                }
                let ten = BigUint::from(10u32);
                let mut coefficient = coefficient.clone();
                let mut exponent = *exponent;
                loop {
                    let (quotient, remainder) = coefficient.div_rem(&ten);
                    if !remainder.is_zero() {
                        break;
                    }
                    coefficient = quotient;
                    exponent += 1;
                }
                Some((coefficient, exponent))
            }
            _ => None,
        }
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::from_parts(value < 0, BigUint::from(value.unsigned_abs()), 0)
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Self::from_parts(false, BigUint::from(value), 0)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Self::Output {
        Self {
            negative: !self.negative,
            repr: self.repr,
        }
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

/// Compare magnitudes of two finite values
pub(crate) fn compare_magnitude(
    a_coefficient: &BigUint,
    a_exponent: i64,
    b_coefficient: &BigUint,
    b_exponent: i64,
) -> Ordering {
    match (a_coefficient.is_zero(), b_coefficient.is_zero()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let a_adjusted = a_exponent + digit_count(a_coefficient) as i64;
    let b_adjusted = b_exponent + digit_count(b_coefficient) as i64;
    if a_adjusted != b_adjusted {
        return a_adjusted.cmp(&b_adjusted);
    }

    // Same magnitude order, so the exponent gap is bounded by the digit counts
    let exponent = a_exponent.min(b_exponent);
    let a_scaled = a_coefficient * pow10((a_exponent - exponent) as u32);
    let b_scaled = b_coefficient * pow10((b_exponent - exponent) as u32);
    a_scaled.cmp(&b_scaled)
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (&self.repr, &other.repr) {
            (Repr::NaN, _) | (_, Repr::NaN) => None,
            (Repr::Infinite, Repr::Infinite) => Some(other.negative.cmp(&self.negative)),
            (Repr::Infinite, _) => Some(if self.negative {
                Ordering::Less
            } else {
                Ordering::Greater
            }),
            (_, Repr::Infinite) => Some(if other.negative {
                Ordering::Greater
            } else {
                Ordering::Less
            }),
            (
                Repr::Finite {
                    coefficient: a_coefficient,
                    exponent: a_exponent,
                },
                Repr::Finite {
                    coefficient: b_coefficient,
                    exponent: b_exponent,
                },
            ) => {
                let a_sign = signum(self.negative, a_coefficient);
                let b_sign = signum(other.negative, b_coefficient);
                if a_sign != b_sign {
                    return Some(a_sign.cmp(&b_sign));
                }
                let magnitude =
                    compare_magnitude(a_coefficient, *a_exponent, b_coefficient, *b_exponent);
                Some(if a_sign < 0 {
                    magnitude.reverse()
                } else {
                    magnitude
                })
            }
        }
    }
}

fn signum(negative: bool, coefficient: &BigUint) -> i8 {
    if coefficient.is_zero() {
        0
    } else if negative {
        -1
    } else {
        1
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Parse `[+|-]digits[.digits][E[+|-]digits]`, `Infinity` or `NaN`
    ///
    /// The literal is kept exactly: no rounding, trailing zeros preserved.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        if body.eq_ignore_ascii_case("infinity") || body.eq_ignore_ascii_case("inf") {
            return Ok(Self::infinity(negative));
        }
        if body.eq_ignore_ascii_case("nan") {
            return Ok(Self::nan());
        }

        let (mantissa, exponent_text) = match body.find(|c: char| c == 'e' || c == 'E') {
            Some(index) => (&body[..index], Some(&body[index + 1..])),
            None => (body, None),
        };
        let (integer, fraction) = match mantissa.find('.') {
            Some(index) => (&mantissa[..index], &mantissa[index + 1..]),
            None => (mantissa, ""),
        };

        if integer.is_empty() && fraction.is_empty() {
            return Err(ParseDecimalError::Empty);
        }
        if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(ParseDecimalError::InvalidDigit);
        }

        let mut exponent = match exponent_text {
            Some(text) => parse_exponent(text)?,
            None => 0,
        };
        exponent = exponent
            .checked_sub(fraction.len() as i64)
            .ok_or(ParseDecimalError::ExponentOutOfRange)?;

        let mut digits = String::with_capacity(integer.len() + fraction.len());
        digits.push_str(integer);
        digits.push_str(fraction);
        let coefficient =
            BigUint::parse_bytes(digits.as_bytes(), 10).ok_or(ParseDecimalError::InvalidDigit)?;

        Ok(Self::from_parts(negative, coefficient, exponent))
    }
}

fn parse_exponent(text: &str) -> Result<i64, ParseDecimalError> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() {
        return Err(ParseDecimalError::Empty);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseDecimalError::InvalidDigit);
    }
    let magnitude: i64 = digits
        .parse()
        .map_err(|_| ParseDecimalError::ExponentOutOfRange)?;
    Ok(if negative { -magnitude } else { magnitude })
}

impl fmt::Display for Decimal {
    /// Scientific string: plain notation when the exponent is not positive and
    /// the value is not too small, otherwise `d.ddddE±n`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative && !self.is_nan() {
            f.write_str("-")?;
        }
        let (coefficient, exponent) = match &self.repr {
            Repr::NaN => return f.write_str("NaN"),
            Repr::Infinite => return f.write_str("Infinity"),
            Repr::Finite {
                coefficient,
                exponent,
            } => (coefficient, *exponent),
        };

        let digits = coefficient.to_str_radix(10);
        let len = digits.len() as i64;
        let leftdigits = exponent + len;
        let dotplace = if exponent <= 0 && leftdigits > -6 {
            leftdigits
        } else {
            1
        };

        if dotplace <= 0 {
            f.write_str("0.")?;
            for _ in 0..-dotplace {
                f.write_str("0")?;
            }
            f.write_str(&digits)?;
        } else if dotplace >= len {
            f.write_str(&digits)?;
            for _ in 0..dotplace - len {
                f.write_str("0")?;
            }
        } else {
            let (integer, fraction) = digits.split_at(dotplace as usize);
            write!(f, "{integer}.{fraction}")?;
        }

        if leftdigits != dotplace {
            write!(f, "E{:+}", leftdigits - dotplace)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_keeps_trailing_zeros() {
        let value = dec("123.0000000");
        assert_eq!(value.exponent(), Some(-7));
        assert_eq!(value.coefficient(), Some(&BigUint::from(1_230_000_000u64)));
        assert_eq!(value.to_string(), "123.0000000");
    }

    #[test]
    fn test_parse_with_exponent() {
        let value = dec("+1.000000000E2");
        assert_eq!(value.to_string(), "100.0000000");
        assert_eq!(dec("-5E-3").to_string(), "-0.005");
        assert_eq!(dec("1E+5").to_string(), "1E+5");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Decimal>().unwrap_err(), ParseDecimalError::Empty);
        assert_eq!(".".parse::<Decimal>().unwrap_err(), ParseDecimalError::Empty);
        assert_eq!(
            "1.2.3".parse::<Decimal>().unwrap_err(),
            ParseDecimalError::InvalidDigit
        );
        assert_eq!("1E".parse::<Decimal>().unwrap_err(), ParseDecimalError::Empty);
        assert_eq!(
            "12a".parse::<Decimal>().unwrap_err(),
            ParseDecimalError::InvalidDigit
        );
    }

    #[test]
    fn test_special_values() {
        assert!(dec("Infinity").is_infinite());
        assert!(dec("-inf").is_sign_negative());
        assert!(dec("NaN").is_nan());
        assert_eq!(Decimal::infinity(true).to_string(), "-Infinity");
    }

    #[test]
    fn test_scientific_formatting() {
        assert_eq!(dec("0.000001").to_string(), "0.000001");
        assert_eq!(dec("0.0000001").to_string(), "1E-7");
        assert_eq!(dec("1234567890E3").to_string(), "1.234567890E+12");
        assert_eq!(dec("0E-7").to_string(), "0E-7");
        assert_eq!(dec("0E2").to_string(), "0E+2");
        assert_eq!(dec("-0").to_string(), "-0");
    }

    #[test]
    fn test_numeric_equality() {
        assert_eq!(dec("1.50"), dec("1.5"));
        assert_eq!(dec("0"), dec("-0.000"));
        assert!(dec("-2") < dec("1"));
        assert!(dec("1E+3") > dec("999.9999"));
        assert!(dec("-Infinity") < dec("-1E+99"));
        assert!(dec("NaN") != dec("NaN"));
    }

    #[test]
    fn test_adjusted_and_integral() {
        assert_eq!(dec("123.45").adjusted(), 2);
        assert_eq!(dec("0.001").adjusted(), -3);
        assert!(dec("3.000").is_integral());
        assert!(!dec("3.5").is_integral());
        assert!(dec("7.0").is_odd_integer());
        assert!(!dec("8").is_odd_integer());
        assert_eq!(dec("-42.00").to_i64(), Some(-42));
    }

    #[test]
    fn test_reduced() {
        let (coefficient, exponent) = dec("1200.00").reduced().unwrap();
        assert_eq!(coefficient, BigUint::from(12u32));
        assert_eq!(exponent, 2);
    }
}
