//! Scaled-integer fixed point used by the transcendental functions
//!
//! A fixed value `v` at working precision `wp` stands for `v / 10^wp`.
//! Every helper rounds to nearest, so an evaluation loses at most a few
//! units in the last place; callers carry enough guard digits to absorb that
//! before the final context rounding.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::number::{digit_count, pow10, Decimal, Repr};

/// Guard digits used when computing constants
const CONSTANT_GUARD: u32 = 10;

/// Fixed-point one
pub(crate) fn one(wp: u32) -> BigInt {
    BigInt::from(pow10(wp))
}

/// `n / d` rounded to nearest, ties away from zero
pub(crate) fn div_round_nearest(n: &BigInt, d: &BigInt) -> BigInt {
    let (quotient, remainder) = n.div_rem(d);
    if (remainder.abs() * 2u32) >= d.abs() {
        if n.is_negative() == d.is_negative() {
            quotient + 1
        } else {
            quotient - 1
        }
    } else {
        quotient
    }
}

/// Drop `digits` digits of precision from a fixed value
pub(crate) fn rescale_down(v: &BigInt, digits: u32) -> BigInt {
    div_round_nearest(v, &BigInt::from(pow10(digits)))
}

/// Convert a finite decimal to fixed point, `None` for infinities and NaN
pub(crate) fn to_fixed(x: &Decimal, wp: u32) -> Option<BigInt> {
    let Repr::Finite {
        coefficient,
        exponent,
    } = &x.repr
    else {
        return None;
    };
    let magnitude = BigInt::from(coefficient.clone());
    let shift = exponent + i64::from(wp);
    let scaled = if shift >= 0 {
        magnitude * BigInt::from(pow10(shift as u32))
    } else {
        let drop = shift.unsigned_abs();
        if drop > u64::from(wp) + 2 + u64::from(digit_count(coefficient)) {
            BigInt::zero()
        } else {
            div_round_nearest(&magnitude, &BigInt::from(pow10(drop as u32)))
        }
    };
    Some(if x.negative { -scaled } else { scaled })
}

/// Unrounded decimal holding a fixed value
pub(crate) fn to_decimal(v: &BigInt, wp: u32) -> Decimal {
    Decimal::from_parts(
        v.sign() == Sign::Minus,
        v.magnitude().clone(),
        -i64::from(wp),
    )
}

/// `a × b`
pub(crate) fn mul(a: &BigInt, b: &BigInt, wp: u32) -> BigInt {
    div_round_nearest(&(a * b), &one(wp))
}

/// `a ÷ b`, `b` non-zero
pub(crate) fn div(a: &BigInt, b: &BigInt, wp: u32) -> BigInt {
    div_round_nearest(&(a * one(wp)), b)
}

/// `√a` for non-negative `a`, truncated
pub(crate) fn sqrt(a: &BigInt, wp: u32) -> BigInt {
    (a * one(wp)).sqrt()
}

/// `atan(1/n)` by its alternating power series
fn atan_inv(n: u32, wp: u32) -> BigInt {
    let n_squared = BigInt::from(n) * n;
    let mut power = one(wp) / n;
    let mut sum = BigInt::zero();
    let mut k = 0u32;
    loop {
        let term = &power / (2 * k + 1);
        if term.is_zero() {
            break;
        }
        if k % 2 == 0 {
            sum += term;
        } else {
            sum -= term;
        }
        power /= &n_squared;
        k += 1;
    }
    sum
}

/// `atanh(1/n)` by its power series
fn atanh_inv(n: u32, wp: u32) -> BigInt {
    let n_squared = BigInt::from(n) * n;
    let mut power = one(wp) / n;
    let mut sum = BigInt::zero();
    let mut k = 0u32;
    loop {
        let term = &power / (2 * k + 1);
        if term.is_zero() {
            break;
        }
        sum += term;
        power /= &n_squared;
        k += 1;
    }
    sum
}

/// π by Machin's formula
pub(crate) fn pi(wp: u32) -> BigInt {
    let guarded = wp + CONSTANT_GUARD;
    let value = atan_inv(5, guarded) * 16 - atan_inv(239, guarded) * 4;
    rescale_down(&value, CONSTANT_GUARD)
}

fn ln2_guarded(guarded: u32) -> BigInt {
    atanh_inv(3, guarded) * 2
}

/// `ln 2 = 2 atanh(1/3)`
pub(crate) fn ln2(wp: u32) -> BigInt {
    rescale_down(&ln2_guarded(wp + CONSTANT_GUARD), CONSTANT_GUARD)
}

/// `ln 10 = 3 ln 2 + 2 atanh(1/9)`
pub(crate) fn ln10(wp: u32) -> BigInt {
    let guarded = wp + CONSTANT_GUARD;
    let value = ln2_guarded(guarded) * 3 + atanh_inv(9, guarded) * 2;
    rescale_down(&value, CONSTANT_GUARD)
}

/// `e^r` for `|r|` around one or smaller
pub(crate) fn exp_series(r: &BigInt, wp: u32) -> BigInt {
    let mut term = one(wp);
    let mut sum = term.clone();
    let mut k = 1u32;
    loop {
        term = div_round_nearest(&mul(&term, r, wp), &BigInt::from(k));
        if term.is_zero() {
            break;
        }
        sum += &term;
        k += 1;
    }
    sum
}

/// `atanh(y)` for `|y|` well below one
pub(crate) fn atanh_series(y: &BigInt, wp: u32) -> BigInt {
    let y_squared = mul(y, y, wp);
    let mut power = y.clone();
    let mut sum = BigInt::zero();
    let mut k = 0u32;
    loop {
        let term = div_round_nearest(&power, &BigInt::from(2 * k + 1));
        if term.is_zero() {
            break;
        }
        sum += term;
        power = mul(&power, &y_squared, wp);
        k += 1;
    }
    sum
}

/// `atan(a)` for `|a|` well below one
pub(crate) fn atan_series(a: &BigInt, wp: u32) -> BigInt {
    let a_squared = mul(a, a, wp);
    let mut power = a.clone();
    let mut sum = BigInt::zero();
    let mut k = 0u32;
    loop {
        let term = div_round_nearest(&power, &BigInt::from(2 * k + 1));
        if term.is_zero() {
            break;
        }
        if k % 2 == 0 {
            sum += term;
        } else {
            sum -= term;
        }
        power = mul(&power, &a_squared, wp);
        k += 1;
    }
    sum
}

/// `sin(r)` for `|r| ≤ π/4`
pub(crate) fn sin_series(r: &BigInt, wp: u32) -> BigInt {
    let r_squared = mul(r, r, wp);
    let mut term = r.clone();
    let mut sum = term.clone();
    let mut k = 1u32;
    loop {
        let divisor = BigInt::from(2 * k) * (2 * k + 1);
        term = -div_round_nearest(&mul(&term, &r_squared, wp), &divisor);
        if term.is_zero() {
            break;
        }
        sum += &term;
        k += 1;
    }
    sum
}

/// `cos(r)` for `|r| ≤ π/4`
pub(crate) fn cos_series(r: &BigInt, wp: u32) -> BigInt {
    let r_squared = mul(r, r, wp);
    let mut term = one(wp);
    let mut sum = term.clone();
    let mut k = 1u32;
    loop {
        let divisor = BigInt::from(2 * k - 1) * (2 * k);
        term = -div_round_nearest(&mul(&term, &r_squared, wp), &divisor);
        if term.is_zero() {
            break;
        }
        sum += &term;
        k += 1;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const WP: u32 = 30;

    fn digits(v: &BigInt) -> alloc::string::String {
        v.to_string()
    }

    #[test]
    fn test_constants() {
        assert_eq!(digits(&pi(WP)), "3141592653589793238462643383280");
        assert_eq!(digits(&ln2(WP)), "693147180559945309417232121458");
        assert_eq!(digits(&ln10(WP)), "2302585092994045684017991454684");
    }

    #[test]
    fn test_div_round_nearest() {
        let seven = BigInt::from(7);
        assert_eq!(div_round_nearest(&BigInt::from(10), &seven), BigInt::from(1));
        assert_eq!(div_round_nearest(&BigInt::from(11), &seven), BigInt::from(2));
        assert_eq!(div_round_nearest(&BigInt::from(-11), &seven), BigInt::from(-2));
        assert_eq!(div_round_nearest(&BigInt::from(5), &BigInt::from(2)), BigInt::from(3));
    }

    #[test]
    fn test_exp_of_one() {
        let e = exp_series(&one(WP), WP);
        assert_eq!(rescale_down(&e, 10), BigInt::from(271_828_182_845_904_523_536u128));
    }

    #[test]
    fn test_to_fixed() {
        let x: Decimal = "-1.25".parse().unwrap();
        assert_eq!(to_fixed(&x, 3), Some(BigInt::from(-1250)));
        let tiny: Decimal = "1E-90".parse().unwrap();
        assert_eq!(to_fixed(&tiny, 3), Some(BigInt::zero()));
        assert_eq!(to_fixed(&Decimal::nan(), 3), None);
    }

    #[test]
    fn test_sqrt_truncates() {
        assert_eq!(sqrt(&(one(4) * 2), 4), BigInt::from(14142));
    }
}
