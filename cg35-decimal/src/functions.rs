//! Square root, logarithms, exponential and power

use core::cmp::Ordering;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::context::Context;
use crate::error::DecimalError;
use crate::fixed;
use crate::number::{digit_count, pow10, Decimal, Repr};

/// Largest integral exponent evaluated by exact repeated multiplication
const EXACT_POWER_LIMIT: u64 = 999;

/// Coefficient digits beyond which an exact power is not attempted
const EXACT_POWER_DIGITS: u64 = 10_000;

impl Context {
    /// Digits carried by fixed-point evaluations
    pub(crate) fn working_precision(&self, extra: u32) -> u32 {
        2 * self.precision() + 10 + extra
    }

    /// Round a fixed-point result to this context
    pub(crate) fn fix_fixed(&self, v: &BigInt, wp: u32) -> Result<Decimal, DecimalError> {
        self.round(&fixed::to_decimal(v, wp))
    }

    /// Magnitude beyond which `exp` certainly overflows or underflows
    fn exp_limit(&self) -> i64 {
        3 * (self.emax().max(-self.etiny()) + 2)
    }

    /// Square root, correctly rounded
    ///
    /// Exact roots keep the ideal exponent `floor(e / 2)`, so `√4 = 2` and
    /// `√0.25 = 0.5`.
    pub fn sqrt(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        let (coefficient, exponent) = match &x.repr {
            Repr::NaN => return Ok(Decimal::nan()),
            Repr::Infinite if x.negative => return Err(DecimalError::InvalidOperation),
            Repr::Infinite => return Ok(x.clone()),
            Repr::Finite {
                coefficient,
                exponent,
            } => (coefficient, *exponent),
        };

        if coefficient.is_zero() {
            return self.fix(x.negative, BigUint::zero(), exponent >> 1);
        }
        if x.negative {
            return Err(DecimalError::InvalidOperation);
        }

        let precision = i64::from(self.precision()) + 1;
        let length = i64::from(digit_count(coefficient));
        let (mut radicand, half_length) = if exponent & 1 == 1 {
            (coefficient * 10u32, (length >> 1) + 1)
        } else {
            (coefficient.clone(), (length + 1) >> 1)
        };

        let shift = precision - half_length;
        let mut exact = if shift >= 0 {
            radicand *= pow10(2 * shift as u32);
            true
        } else {
            let (quotient, remainder) = radicand.div_rem(&pow10(2 * (-shift) as u32));
            radicand = quotient;
            remainder.is_zero()
        };

        let mut root_exponent = (exponent >> 1) - shift;
        let mut root = radicand.sqrt();
        exact = exact && &root * &root == radicand;

        if exact {
            if shift >= 0 {
                root /= pow10(shift as u32);
            } else {
                root *= pow10((-shift) as u32);
            }
            root_exponent += shift;
        } else if (&root % 5u32).is_zero() {
            root += 1u32;
        }

        self.fix(false, root, root_exponent)
    }

    /// Natural logarithm
    ///
    /// `ln 0` is `-Infinity` and `ln 1` is exactly zero.
    pub fn ln(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        let (coefficient, exponent) = match log_argument(x)? {
            LogArgument::Finite(coefficient, exponent) => (coefficient, exponent),
            LogArgument::Special(value) => return Ok(value),
        };
        if coefficient.is_one() && exponent == 0 {
            return Ok(Decimal::zero());
        }

        let wp = self.working_precision(digit_count(coefficient));
        let value = ln_fixed(coefficient, exponent, wp);
        self.fix_fixed(&value, wp)
    }

    /// Base-10 logarithm, exact for powers of ten
    pub fn log10(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        let (coefficient, exponent) = match log_argument(x)? {
            LogArgument::Finite(coefficient, exponent) => (coefficient, exponent),
            LogArgument::Special(value) => return Ok(value),
        };

        if let Some((reduced, _)) = x.reduced() {
            if reduced.is_one() {
                return self.round(&Decimal::from(x.adjusted()));
            }
        }

        let wp = self.working_precision(digit_count(coefficient));
        let value = fixed::div(&ln_fixed(coefficient, exponent, wp), &fixed::ln10(wp), wp);
        self.fix_fixed(&value, wp)
    }

    /// `e^x`
    pub fn exp(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        match &x.repr {
            Repr::NaN => return Ok(Decimal::nan()),
            Repr::Infinite if x.negative => return Ok(Decimal::zero()),
            Repr::Infinite => return Ok(x.clone()),
            Repr::Finite { .. } if x.is_zero() => return Ok(Decimal::one()),
            Repr::Finite { .. } => {}
        }

        let limit_digits = digit_count(&BigUint::from(self.exp_limit().unsigned_abs())) as i64;
        if x.adjusted() >= limit_digits {
            return if x.negative {
                self.fix(false, BigUint::zero(), self.etiny())
            } else {
                Err(DecimalError::Overflow)
            };
        }

        let wp = self.working_precision(x.adjusted().max(0) as u32 + 2);
        let t = fixed::to_fixed(x, wp).ok_or(DecimalError::InvalidOperation)?;
        self.exp_fixed(&t, wp, false)
    }

    /// Round `±e^t` for a fixed-point exponent `t`
    fn exp_fixed(&self, t: &BigInt, wp: u32, negative: bool) -> Result<Decimal, DecimalError> {
        let limit = BigInt::from(self.exp_limit()) * fixed::one(wp);
        if t.abs() > limit {
            return if t.is_negative() {
                self.fix(negative, BigUint::zero(), self.etiny())
            } else {
                Err(DecimalError::Overflow)
            };
        }

        // e^t = e^r × 10^n with |r| ≤ ln(10) / 2
        let ln10 = fixed::ln10(wp);
        let n = fixed::div_round_nearest(t, &ln10);
        let r = t - &n * &ln10;
        let (_, magnitude) = fixed::exp_series(&r, wp).into_parts();
        let n = n.to_i64().ok_or(DecimalError::Overflow)?;

        self.fix(negative, magnitude, n - i64::from(wp))
    }

    /// `x ** y`
    ///
    /// Integral powers up to 999 are computed exactly and rounded once.
    /// A negative base needs an integral power; `0 ** 0` is invalid and
    /// `0 ** -n` is infinite.
    pub fn pow(&self, x: &Decimal, y: &Decimal) -> Result<Decimal, DecimalError> {
        if x.is_nan() || y.is_nan() {
            return Ok(Decimal::nan());
        }
        if y.is_zero() {
            return if x.is_zero() {
                Err(DecimalError::InvalidOperation)
            } else {
                Ok(Decimal::one())
            };
        }

        let negative = x.is_sign_negative() && y.is_odd_integer();
        if x.is_negative() && !y.is_integral() {
            return Err(DecimalError::InvalidOperation);
        }

        if x.is_zero() {
            return Ok(if y.is_negative() {
                Decimal::infinity(negative)
            } else {
                Decimal::from_parts(negative, BigUint::zero(), 0)
            });
        }
        if x.is_infinite() {
            return Ok(if y.is_negative() {
                Decimal::from_parts(negative, BigUint::zero(), 0)
            } else {
                Decimal::infinity(negative)
            });
        }

        let (coefficient, exponent) = match &x.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } => (coefficient, *exponent),
            _ => return Ok(Decimal::nan()),
        };
        let base_order = compare_magnitude_to_one(coefficient, exponent);

        if y.is_infinite() {
            return Ok(match base_order {
                Ordering::Equal => Decimal::one(),
                order if (order == Ordering::Greater) != y.is_negative() => {
                    Decimal::infinity(false)
                }
                _ => Decimal::zero(),
            });
        }

        if base_order == Ordering::Equal {
            return self.fix(negative, BigUint::one(), 0);
        }

        if let Some(n) = y.to_i64() {
            if let Some(result) = self.pow_integral(coefficient, exponent, n, negative)? {
                return Ok(result);
            }
        }

        // |y × ln|x|| is astronomically large
        if y.adjusted() > i64::from(digit_count(coefficient)) + 12 {
            return if (base_order == Ordering::Greater) != y.is_negative() {
                Err(DecimalError::Overflow)
            } else {
                self.fix(negative, BigUint::zero(), self.etiny())
            };
        }

        let extra = digit_count(coefficient) + y.adjusted().max(0) as u32 + 2;
        let wp = self.working_precision(extra);
        let ln_x = ln_fixed(coefficient, exponent, wp);
        let y_fixed = fixed::to_fixed(y, wp).ok_or(DecimalError::InvalidOperation)?;
        let t = fixed::mul(&y_fixed, &ln_x, wp);
        self.exp_fixed(&t, wp, negative)
    }

    /// Exact `|x| ** n` rounded once, `None` when too large to expand
    fn pow_integral(
        &self,
        coefficient: &BigUint,
        exponent: i64,
        n: i64,
        negative: bool,
    ) -> Result<Option<Decimal>, DecimalError> {
        let magnitude = n.unsigned_abs();
        if magnitude > EXACT_POWER_LIMIT
            || u64::from(digit_count(coefficient)) * magnitude > EXACT_POWER_DIGITS
        {
            return Ok(None);
        }

        let power = coefficient.pow(magnitude as u32);
        let power_exponent = exponent * magnitude as i64;
        let result = if n > 0 {
            self.fix(negative, power, power_exponent)?
        } else {
            let reciprocal = self.div(
                &Decimal::one(),
                &Decimal::from_parts(false, power, power_exponent),
            )?;
            if negative {
                reciprocal.negated()
            } else {
                reciprocal
            }
        };
        Ok(Some(result))
    }
}

enum LogArgument<'a> {
    Finite(&'a BigUint, i64),
    Special(Decimal),
}

/// Screen a logarithm argument: NaN, infinities, zero and negatives
fn log_argument(x: &Decimal) -> Result<LogArgument<'_>, DecimalError> {
    match &x.repr {
        Repr::NaN => Ok(LogArgument::Special(Decimal::nan())),
        Repr::Infinite if x.negative => Err(DecimalError::InvalidOperation),
        Repr::Infinite => Ok(LogArgument::Special(x.clone())),
        Repr::Finite { coefficient, .. } if coefficient.is_zero() => {
            Ok(LogArgument::Special(Decimal::infinity(true)))
        }
        Repr::Finite { .. } if x.negative => Err(DecimalError::InvalidOperation),
        Repr::Finite {
            coefficient,
            exponent,
        } => Ok(LogArgument::Finite(coefficient, *exponent)),
    }
}

fn compare_magnitude_to_one(coefficient: &BigUint, exponent: i64) -> Ordering {
    crate::number::compare_magnitude(coefficient, exponent, &BigUint::one(), 0)
}

/// `ln(coefficient × 10^exponent)` in fixed point, coefficient non-zero
///
/// The mantissa `m ∈ [1, 10)` is halved below 1.5 and finished with
/// `ln m = 2 atanh((m - 1) / (m + 1))`.
pub(crate) fn ln_fixed(coefficient: &BigUint, exponent: i64, wp: u32) -> BigInt {
    let length = digit_count(coefficient);
    let adjusted = exponent + i64::from(length) - 1;

    let one = fixed::one(wp);
    let mantissa = Decimal::from_parts(false, coefficient.clone(), -(i64::from(length) - 1));
    let mut m = fixed::to_fixed(&mantissa, wp).unwrap_or_else(|| one.clone());

    let threshold = &one * 3u32 / 2u32;
    let two = BigInt::from(2);
    let mut halvings = 0u32;
    while m >= threshold {
        m = fixed::div_round_nearest(&m, &two);
        halvings += 1;
    }

    let y = fixed::div(&(&m - &one), &(&m + &one), wp);
    let mut value = fixed::atanh_series(&y, wp) * 2;
    if halvings > 0 {
        value += fixed::ln2(wp) * halvings;
    }
    if adjusted != 0 {
        value += fixed::ln10(wp) * adjusted;
    }
    value
}
