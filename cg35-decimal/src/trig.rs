//! Circular functions in radians
//!
//! Direct functions reduce the argument by multiples of π/2 and evaluate
//! Taylor series on `[-π/4, π/4]`. Inverse functions go through `atan`,
//! which inverts large arguments and halves the angle three times before
//! summing its series.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::context::Context;
use crate::error::DecimalError;
use crate::fixed;
use crate::number::{digit_count, Decimal, Repr};

/// Arguments with a larger adjusted exponent are not reduced
const MAX_REDUCIBLE_ADJUSTED: i64 = 1000;

impl Context {
    /// π rounded to this context
    pub fn pi(&self) -> Result<Decimal, DecimalError> {
        let wp = self.precision() + 10;
        self.fix_fixed(&fixed::pi(wp), wp)
    }

    /// Working precision for an argument, widened for tiny and huge values
    fn trig_precision(&self, x: &Decimal) -> u32 {
        let adjusted = x.adjusted();
        let digits = x.coefficient().map(digit_count).unwrap_or(1);
        self.working_precision(adjusted.unsigned_abs() as u32 + digits + 2)
    }

    /// Argument in fixed point reduced to `[-π/4, π/4]` and its quadrant
    fn reduce(&self, x: &Decimal) -> Result<(BigInt, u8, u32), DecimalError> {
        if !x.is_finite() || x.adjusted() > MAX_REDUCIBLE_ADJUSTED {
            return Err(DecimalError::InvalidOperation);
        }
        let wp = self.trig_precision(x);
        let value = fixed::to_fixed(x, wp).ok_or(DecimalError::InvalidOperation)?;
        let half_pi = fixed::pi(wp) / 2u32;
        let k = fixed::div_round_nearest(&value, &half_pi);
        let reduced = &value - &k * &half_pi;
        let quadrant = k.mod_floor(&BigInt::from(4)).to_u8().unwrap_or(0);
        Ok((reduced, quadrant, wp))
    }

    /// Sine
    pub fn sin(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        if x.is_nan() {
            return Ok(Decimal::nan());
        }
        if x.is_zero() {
            return self.round(x);
        }
        let (r, quadrant, wp) = self.reduce(x)?;
        let value = match quadrant {
            0 => fixed::sin_series(&r, wp),
            1 => fixed::cos_series(&r, wp),
            2 => -fixed::sin_series(&r, wp),
            _ => -fixed::cos_series(&r, wp),
        };
        self.fix_fixed(&value, wp)
    }

    /// Cosine
    pub fn cos(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        if x.is_nan() {
            return Ok(Decimal::nan());
        }
        if x.is_zero() {
            return Ok(Decimal::one());
        }
        let (r, quadrant, wp) = self.reduce(x)?;
        let value = match quadrant {
            0 => fixed::cos_series(&r, wp),
            1 => -fixed::sin_series(&r, wp),
            2 => -fixed::cos_series(&r, wp),
            _ => fixed::sin_series(&r, wp),
        };
        self.fix_fixed(&value, wp)
    }

    /// Tangent as `sin / cos` over a single reduction
    pub fn tan(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        if x.is_nan() {
            return Ok(Decimal::nan());
        }
        if x.is_zero() {
            return self.round(x);
        }
        let (r, quadrant, wp) = self.reduce(x)?;
        let sin = fixed::sin_series(&r, wp);
        let cos = fixed::cos_series(&r, wp);
        let (numerator, denominator) = if quadrant % 2 == 0 {
            (sin, cos)
        } else {
            (cos, -sin)
        };
        if denominator.is_zero() {
            return Err(DecimalError::DivisionByZero);
        }
        self.fix_fixed(&fixed::div(&numerator, &denominator, wp), wp)
    }

    /// Arc tangent in `(-π/2, π/2)`
    pub fn atan(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        match &x.repr {
            Repr::NaN => return Ok(Decimal::nan()),
            Repr::Infinite => {
                let wp = self.precision() + 10;
                let half_pi = fixed::pi(wp) / 2u32;
                let value = if x.negative { -half_pi } else { half_pi };
                return self.fix_fixed(&value, wp);
            }
            Repr::Finite { .. } if x.is_zero() => return self.round(x),
            Repr::Finite { .. } => {}
        }
        let wp = self.trig_precision(x);
        let value = fixed::to_fixed(x, wp).ok_or(DecimalError::InvalidOperation)?;
        self.fix_fixed(&atan_fixed(&value, wp), wp)
    }

    /// Arc sine in `[-π/2, π/2]`
    pub fn asin(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        if x.is_nan() {
            return Ok(Decimal::nan());
        }
        if x.is_zero() {
            return self.round(x);
        }
        let (value, wp) = self.unit_argument(x)?;
        self.fix_fixed(&asin_fixed(&value, wp), wp)
    }

    /// Arc cosine in `[0, π]`
    pub fn acos(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        if x.is_nan() {
            return Ok(Decimal::nan());
        }
        let (value, wp) = self.unit_argument(x)?;
        if value == fixed::one(wp) {
            return Ok(Decimal::zero());
        }
        let half_pi = fixed::pi(wp) / 2u32;
        self.fix_fixed(&(half_pi - asin_fixed(&value, wp)), wp)
    }

    /// Fixed-point argument of `asin`/`acos`, which must lie in `[-1, 1]`
    fn unit_argument(&self, x: &Decimal) -> Result<(BigInt, u32), DecimalError> {
        if !x.is_finite() || x.abs() > Decimal::one() {
            return Err(DecimalError::InvalidOperation);
        }
        let wp = self.trig_precision(x);
        let value = fixed::to_fixed(x, wp).ok_or(DecimalError::InvalidOperation)?;
        Ok((value, wp))
    }
}

/// `atan(a)` in fixed point
fn atan_fixed(a: &BigInt, wp: u32) -> BigInt {
    let one = fixed::one(wp);
    let mut value = a.abs();
    let invert = value > one;
    if invert {
        value = fixed::div(&one, &value, wp);
    }

    // atan(a) = 2 atan(a / (1 + √(1 + a²)))
    for _ in 0..3 {
        let root = fixed::sqrt(&(&one + fixed::mul(&value, &value, wp)), wp);
        value = fixed::div(&value, &(&one + root), wp);
    }
    let mut angle = fixed::atan_series(&value, wp) * 8u32;

    if invert {
        angle = fixed::pi(wp) / 2u32 - angle;
    }
    if a.is_negative() {
        -angle
    } else {
        angle
    }
}

/// `asin(x)` in fixed point for `|x| ≤ 1`
fn asin_fixed(x: &BigInt, wp: u32) -> BigInt {
    let one = fixed::one(wp);
    if x.abs() == one {
        let half_pi = fixed::pi(wp) / 2u32;
        return if x.is_negative() { -half_pi } else { half_pi };
    }
    let cosine = fixed::sqrt(&(&one - fixed::mul(x, x, wp)), wp);
    atan_fixed(&fixed::div(x, &cosine, wp), wp)
}
