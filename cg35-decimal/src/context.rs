//! Arithmetic context: precision, exponent bounds and rounding
//!
//! Every operation produces an exact intermediate result and then rounds it
//! to the context with `fix`. Exact quotients and sums keep the exponent the
//! General Decimal Arithmetic rules call ideal, so `6 / 2` is `3` rather than
//! `3.000000000`.

use core::cmp::Ordering;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::DecimalError;
use crate::number::{compare_magnitude, digit_count, pow10, Decimal, Repr};

/// Rounding applied when a result has more digits than the precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rounding {
    /// Round to nearest, ties to even digit
    #[default]
    HalfEven,
    /// Round to nearest, ties away from zero
    HalfUp,
    /// Truncate toward zero
    Down,
}

/// Arithmetic context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Context {
    /// Significant digits kept in results
    precision: u32,
    /// Smallest adjusted exponent of a normal number
    emin: i64,
    /// Largest adjusted exponent
    emax: i64,
    /// Rounding mode
    rounding: Rounding,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            precision: 28,
            emin: -999_999,
            emax: 999_999,
            rounding: Rounding::HalfEven,
        }
    }
}

impl Context {
    /// Create a context with the given precision and default bounds
    ///
    /// A precision of zero is raised to one digit.
    pub fn new(precision: u32) -> Self {
        Self {
            precision: precision.max(1),
            ..Self::default()
        }
    }

    /// Set the exponent range
    pub fn with_exponent_range(mut self, emin: i64, emax: i64) -> Self {
        self.emin = emin.min(0);
        self.emax = emax.max(0);
        self
    }

    /// Set the rounding mode
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Same bounds and rounding with a different precision
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision.max(1);
        self
    }

    /// Significant digits kept in results
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Smallest adjusted exponent of a normal number
    pub fn emin(&self) -> i64 {
        self.emin
    }

    /// Largest adjusted exponent
    pub fn emax(&self) -> i64 {
        self.emax
    }

    /// Rounding mode
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Smallest exponent a subnormal result can have
    pub fn etiny(&self) -> i64 {
        self.emin - self.precision as i64 + 1
    }

    /// Largest exponent of a full-precision coefficient
    fn etop(&self) -> i64 {
        self.emax - self.precision as i64 + 1
    }

    /// Round a finite triple to this context
    pub(crate) fn fix(
        &self,
        negative: bool,
        coefficient: BigUint,
        exponent: i64,
    ) -> Result<Decimal, DecimalError> {
        let etiny = self.etiny();
        let etop = self.etop();

        if coefficient.is_zero() {
            let exponent = exponent.max(etiny).min(self.emax);
            return Ok(Decimal::from_parts(negative, coefficient, exponent));
        }

        let length = digit_count(&coefficient) as i64;
        let mut exponent_min = length + exponent - self.precision as i64;
        if exponent_min > etop {
            return Err(DecimalError::Overflow);
        }
        if exponent_min < etiny {
            exponent_min = etiny;
        }
        if exponent >= exponent_min {
            return Ok(Decimal::from_parts(negative, coefficient, exponent));
        }

        let drop = (exponent_min - exponent) as u32;
        let divisor = pow10(drop);
        let (mut kept, remainder) = coefficient.div_rem(&divisor);
        let twice = remainder * 2u32;
        let round_up = match self.rounding {
            Rounding::HalfEven => match twice.cmp(&divisor) {
                Ordering::Greater => true,
                Ordering::Equal => kept.is_odd(),
                Ordering::Less => false,
            },
            Rounding::HalfUp => twice >= divisor,
            Rounding::Down => false,
        };
        if round_up {
            kept += 1u32;
            if digit_count(&kept) as i64 > self.precision as i64 {
                kept /= 10u32;
                exponent_min += 1;
            }
        }
        if exponent_min > etop {
            return Err(DecimalError::Overflow);
        }

        Ok(Decimal::from_parts(negative, kept, exponent_min))
    }

    /// Round a value to this context (division by one)
    pub fn round(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        match &x.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } => self.fix(x.negative, coefficient.clone(), *exponent),
            _ => Ok(x.clone()),
        }
    }

    /// `a + b`
    pub fn add(&self, a: &Decimal, b: &Decimal) -> Result<Decimal, DecimalError> {
        let (
            Repr::Finite {
                coefficient: a_coefficient,
                exponent: a_exponent,
            },
            Repr::Finite {
                coefficient: b_coefficient,
                exponent: b_exponent,
            },
        ) = (&a.repr, &b.repr)
        else {
            return add_special(a, b);
        };

        let (a_coefficient, b_coefficient, exponent) = self.align(
            a_coefficient,
            *a_exponent,
            b_coefficient,
            *b_exponent,
        );

        let (negative, coefficient) = if a.negative == b.negative {
            (a.negative, a_coefficient + b_coefficient)
        } else {
            match a_coefficient.cmp(&b_coefficient) {
                Ordering::Greater => (a.negative, a_coefficient - b_coefficient),
                Ordering::Less => (b.negative, b_coefficient - a_coefficient),
                Ordering::Equal => (false, BigUint::zero()),
            }
        };

        self.fix(negative, coefficient, exponent)
    }

    /// `a - b`
    pub fn sub(&self, a: &Decimal, b: &Decimal) -> Result<Decimal, DecimalError> {
        self.add(a, &b.negated())
    }

    /// Bring two coefficients to a common exponent
    ///
    /// An operand far below the other's rounding window only matters as a
    /// sticky digit, so it is replaced by a single unit just below the window
    /// instead of scaling the larger operand by a huge power of ten.
    fn align(
        &self,
        a_coefficient: &BigUint,
        a_exponent: i64,
        b_coefficient: &BigUint,
        b_exponent: i64,
    ) -> (BigUint, BigUint, i64) {
        let swapped = a_exponent < b_exponent;
        let (high, high_exponent, mut low, mut low_exponent) = if swapped {
            (b_coefficient, b_exponent, a_coefficient.clone(), a_exponent)
        } else {
            (a_coefficient, a_exponent, b_coefficient.clone(), b_exponent)
        };

        if !high.is_zero() && !low.is_zero() {
            let high_length = digit_count(high) as i64;
            let window = high_exponent + (-1i64).min(high_length - self.precision as i64 - 2);
            let low_top = digit_count(&low) as i64 + low_exponent - 1;
            if low_top < window {
                low = BigUint::one();
                low_exponent = window;
            }
        }

        let shift = (high_exponent - low_exponent).max(0) as u32;
        let high = high * pow10(shift);
        let exponent = low_exponent.min(high_exponent);

        if swapped {
            (low, high, exponent)
        } else {
            (high, low, exponent)
        }
    }

    /// `a × b`
    pub fn mul(&self, a: &Decimal, b: &Decimal) -> Result<Decimal, DecimalError> {
        let negative = a.negative != b.negative;
        match (&a.repr, &b.repr) {
            (Repr::NaN, _) | (_, Repr::NaN) => Ok(Decimal::nan()),
            (Repr::Infinite, _) | (_, Repr::Infinite) => {
                if a.is_zero() || b.is_zero() {
                    Err(DecimalError::InvalidOperation)
                } else {
                    Ok(Decimal::infinity(negative))
                }
            }
            (
                Repr::Finite {
                    coefficient: a_coefficient,
                    exponent: a_exponent,
                },
                Repr::Finite {
                    coefficient: b_coefficient,
                    exponent: b_exponent,
                },
            ) => self.fix(
                negative,
                a_coefficient * b_coefficient,
                a_exponent + b_exponent,
            ),
        }
    }

    /// `a ÷ b`
    pub fn div(&self, a: &Decimal, b: &Decimal) -> Result<Decimal, DecimalError> {
        let negative = a.negative != b.negative;
        let (a_coefficient, a_exponent, b_coefficient, b_exponent) = match (&a.repr, &b.repr) {
            (Repr::NaN, _) | (_, Repr::NaN) => return Ok(Decimal::nan()),
            (Repr::Infinite, Repr::Infinite) => return Err(DecimalError::InvalidOperation),
            (Repr::Infinite, _) => return Ok(Decimal::infinity(negative)),
            (_, Repr::Infinite) => {
                return Ok(Decimal::from_parts(negative, BigUint::zero(), self.etiny()))
            }
            (
                Repr::Finite {
                    coefficient: a_coefficient,
                    exponent: a_exponent,
                },
                Repr::Finite {
                    coefficient: b_coefficient,
                    exponent: b_exponent,
                },
            ) => (a_coefficient, *a_exponent, b_coefficient, *b_exponent),
        };

        if b_coefficient.is_zero() {
            return if a_coefficient.is_zero() {
                Err(DecimalError::InvalidOperation)
            } else {
                Err(DecimalError::DivisionByZero)
            };
        }

        let ideal_exponent = a_exponent - b_exponent;
        if a_coefficient.is_zero() {
            return self.fix(negative, BigUint::zero(), ideal_exponent);
        }

        // Enough quotient digits for the precision plus a rounding digit
        let shift = digit_count(b_coefficient) as i64 - digit_count(a_coefficient) as i64
            + self.precision as i64
            + 1;
        let mut exponent = ideal_exponent - shift;
        let (mut quotient, remainder) = if shift >= 0 {
            (a_coefficient * pow10(shift as u32)).div_rem(b_coefficient)
        } else {
            a_coefficient.div_rem(&(b_coefficient * pow10((-shift) as u32)))
        };

        let ten = BigUint::from(10u32);
        if !remainder.is_zero() {
            // Sticky digit so a tie in the kept digits is never mistaken for exact
            if (&quotient % 5u32).is_zero() {
                quotient += 1u32;
            }
        } else {
            while exponent < ideal_exponent {
                let (reduced, digit) = quotient.div_rem(&ten);
                if !digit.is_zero() {
                    break;
                }
                quotient = reduced;
                exponent += 1;
            }
        }

        self.fix(negative, quotient, exponent)
    }

    /// Truncated remainder `a - b × trunc(a / b)`, carrying the sign of `a`
    pub fn rem(&self, a: &Decimal, b: &Decimal) -> Result<Decimal, DecimalError> {
        let (a_coefficient, a_exponent, b_coefficient, b_exponent) = match (&a.repr, &b.repr) {
            (Repr::NaN, _) | (_, Repr::NaN) => return Ok(Decimal::nan()),
            (Repr::Infinite, _) => return Err(DecimalError::InvalidOperation),
            (_, Repr::Infinite) => return self.round(a),
            (
                Repr::Finite {
                    coefficient: a_coefficient,
                    exponent: a_exponent,
                },
                Repr::Finite {
                    coefficient: b_coefficient,
                    exponent: b_exponent,
                },
            ) => (a_coefficient, *a_exponent, b_coefficient, *b_exponent),
        };

        if b_coefficient.is_zero() {
            return Err(DecimalError::InvalidOperation);
        }

        let ideal_exponent = a_exponent.min(b_exponent);
        if a_coefficient.is_zero() {
            return self.fix(a.negative, BigUint::zero(), ideal_exponent);
        }

        if compare_magnitude(a_coefficient, a_exponent, b_coefficient, b_exponent)
            == Ordering::Less
        {
            let coefficient = a_coefficient * pow10((a_exponent - ideal_exponent) as u32);
            return self.fix(a.negative, coefficient, ideal_exponent);
        }

        // The integer quotient must fit the precision
        if a.adjusted() - b.adjusted() > self.precision as i64 {
            return Err(DecimalError::InvalidOperation);
        }

        let a_scaled = a_coefficient * pow10((a_exponent - ideal_exponent) as u32);
        let b_scaled = b_coefficient * pow10((b_exponent - ideal_exponent) as u32);
        let (quotient, remainder) = a_scaled.div_rem(&b_scaled);
        if digit_count(&quotient) > self.precision {
            return Err(DecimalError::InvalidOperation);
        }

        self.fix(a.negative, remainder, ideal_exponent)
    }
}

/// Addition where at least one operand is not finite
fn add_special(a: &Decimal, b: &Decimal) -> Result<Decimal, DecimalError> {
    match (&a.repr, &b.repr) {
        (Repr::NaN, _) | (_, Repr::NaN) => Ok(Decimal::nan()),
        (Repr::Infinite, Repr::Infinite) => {
            if a.negative != b.negative {
                Err(DecimalError::InvalidOperation)
            } else {
                Ok(a.clone())
            }
        }
        (Repr::Infinite, _) => Ok(a.clone()),
        _ => Ok(b.clone()),
    }
}
