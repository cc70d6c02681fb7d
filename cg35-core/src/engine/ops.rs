//! Arithmetic behind the monadic and dyadic keys
//!
//! Everything is evaluated at internal precision. Trigonometry works in
//! degrees: arguments are reduced modulo 360, exact multiples of 90° come
//! from a table and everything else is converted to radians at a few guard
//! digits above internal precision.

use cg35_decimal::{Context, Decimal, DecimalError};

use super::machine::ErrorKind;
use crate::keys::Key;

/// Guard digits for degree/radian conversions
const TRIG_GUARD_DIGITS: u32 = 5;

/// Functions of X
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Function {
    Log,
    Ln,
    Exp,
    Sqrt,
    Reciprocal,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

impl Function {
    /// Function selected by a monadic key, inverse trig when `arc` is set
    ///
    /// Returns `None` for ARC itself and for keys that are not monadic.
    pub fn from_key(key: Key, arc: bool) -> Option<Self> {
        let function = match (key, arc) {
            (Key::Log, _) => Function::Log,
            (Key::Ln, _) => Function::Ln,
            (Key::Exp, _) => Function::Exp,
            (Key::Sqrt, _) => Function::Sqrt,
            (Key::Reciprocal, _) => Function::Reciprocal,
            (Key::Sin, false) => Function::Sin,
            (Key::Cos, false) => Function::Cos,
            (Key::Tan, false) => Function::Tan,
            (Key::Sin, true) => Function::Asin,
            (Key::Cos, true) => Function::Acos,
            (Key::Tan, true) => Function::Atan,
            _ => return None,
        };
        Some(function)
    }

    /// Check if this is a direct or inverse trig function
    pub fn is_trig(&self) -> bool {
        matches!(
            self,
            Function::Sin
                | Function::Cos
                | Function::Tan
                | Function::Asin
                | Function::Acos
                | Function::Atan
        )
    }
}

/// Operators combining Y and X
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operator {
    /// `X ** Y` into X, the stack does not drop
    Power,
    Subtract,
    Add,
    Multiply,
    Divide,
}

impl Operator {
    /// Operator for a dyadic key
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Power => Some(Operator::Power),
            Key::Subtract => Some(Operator::Subtract),
            Key::Add => Some(Operator::Add),
            Key::Multiply => Some(Operator::Multiply),
            Key::Divide => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Check if the stack drops after this operator
    pub fn pulls(&self) -> bool {
        !matches!(self, Operator::Power)
    }
}

/// Degree argument after reduction modulo 360
enum Angle {
    /// Exact multiple of 90°, quadrant 0-3
    Quadrant(usize),
    /// Any other angle, in radians at guard precision
    Radians(Decimal),
}

/// Evaluates key operations at internal precision
#[derive(Debug, Clone)]
pub struct Operations {
    internal: Context,
    guard: Context,
    pi: Decimal,
    guard_pi: Decimal,
}

impl Operations {
    /// Create an evaluator for the given internal context
    pub fn new(internal: Context) -> Self {
        let guard = internal.with_precision(internal.precision() + TRIG_GUARD_DIGITS);
        Self {
            pi: constant_pi(&internal),
            guard_pi: constant_pi(&guard),
            internal,
            guard,
        }
    }

    /// π at internal precision
    pub fn pi(&self) -> Result<Decimal, ErrorKind> {
        checked(Ok(self.pi.clone()))
    }

    /// Apply a function to X
    pub fn monadic(&self, function: Function, x: &Decimal) -> Result<Decimal, ErrorKind> {
        let cx = &self.internal;
        let result = match function {
            Function::Log => cx.log10(x),
            Function::Ln => cx.ln(x),
            Function::Exp => cx.exp(x),
            Function::Sqrt => cx.sqrt(x),
            Function::Reciprocal => cx.div(&Decimal::one(), x),
            Function::Sin => self.sin_degrees(x),
            Function::Cos => self.cos_degrees(x),
            Function::Tan => self.tan_degrees(x),
            Function::Asin => self.guard.asin(x).and_then(|r| self.to_degrees(&r)),
            Function::Acos => self.guard.acos(x).and_then(|r| self.to_degrees(&r)),
            Function::Atan => self.guard.atan(x).and_then(|r| self.to_degrees(&r)),
        };
        checked(result)
    }

    /// Combine Y and X
    ///
    /// Returns the new X for [`Operator::Power`] and the new Y otherwise.
    pub fn dyadic(
        &self,
        operator: Operator,
        x: &Decimal,
        y: &Decimal,
    ) -> Result<Decimal, ErrorKind> {
        let cx = &self.internal;
        let result = match operator {
            Operator::Power => cx.pow(x, y),
            Operator::Subtract => cx.sub(y, x),
            Operator::Add => cx.add(y, x),
            Operator::Multiply => cx.mul(y, x),
            Operator::Divide => cx.div(y, x),
        };
        checked(result)
    }

    fn sin_degrees(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        match self.reduce_degrees(x)? {
            Angle::Quadrant(q) => Ok(Decimal::from([0i64, 1, 0, -1][q])),
            Angle::Radians(r) => self.internal.round(&self.guard.sin(&r)?),
        }
    }

    fn cos_degrees(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        match self.reduce_degrees(x)? {
            Angle::Quadrant(q) => Ok(Decimal::from([1i64, 0, -1, 0][q])),
            Angle::Radians(r) => self.internal.round(&self.guard.cos(&r)?),
        }
    }

    fn tan_degrees(&self, x: &Decimal) -> Result<Decimal, DecimalError> {
        match self.reduce_degrees(x)? {
            Angle::Quadrant(q) if q % 2 == 0 => Ok(Decimal::zero()),
            Angle::Quadrant(_) => Err(DecimalError::DivisionByZero),
            Angle::Radians(r) => self.internal.round(&self.guard.tan(&r)?),
        }
    }

    fn reduce_degrees(&self, x: &Decimal) -> Result<Angle, DecimalError> {
        let full_turn = Decimal::from(360i64);
        let right_angle = Decimal::from(90i64);
        let reduced = self.internal.rem(x, &full_turn)?;

        if self.internal.rem(&reduced, &right_angle)?.is_zero() {
            let quadrant = self
                .internal
                .div(&reduced, &right_angle)?
                .to_i64()
                .ok_or(DecimalError::InvalidOperation)?;
            return Ok(Angle::Quadrant(quadrant.rem_euclid(4) as usize));
        }

        let scaled = self.guard.mul(&reduced, &self.guard_pi)?;
        Ok(Angle::Radians(self.guard.div(&scaled, &Decimal::from(180i64))?))
    }

    fn to_degrees(&self, radians: &Decimal) -> Result<Decimal, DecimalError> {
        let scaled = self.guard.mul(radians, &Decimal::from(180i64))?;
        self.internal.round(&self.guard.div(&scaled, &self.guard_pi)?)
    }
}

/// π is computed once per context; a failure leaves NaN, which faults on use
fn constant_pi(cx: &Context) -> Decimal {
    cx.pi().unwrap_or_else(|error| {
        log::warn!("pi unavailable at this context: {}", error);
        Decimal::nan()
    })
}

/// Map a decimal result to an engine fault
fn checked(result: Result<Decimal, DecimalError>) -> Result<Decimal, ErrorKind> {
    match result {
        Ok(value) if value.is_infinite() => Err(ErrorKind::InfiniteValue),
        Ok(value) if value.is_nan() => Err(ErrorKind::InvalidOperation),
        Ok(value) => Ok(value),
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn ops() -> Operations {
        Operations::new(Context::new(20).with_exponent_range(-99, 99))
    }

    /// Result rounded to ten digits, as the display would show it
    fn shown(result: Result<Decimal, ErrorKind>) -> String {
        let display = Context::new(10).with_exponent_range(-99, 99);
        display.round(&result.unwrap()).unwrap().to_string()
    }

    fn monadic(function: Function, x: &str) -> Result<Decimal, ErrorKind> {
        ops().monadic(function, &dec(x))
    }

    #[test]
    fn test_function_from_key() {
        assert_eq!(Function::from_key(Key::Sin, false), Some(Function::Sin));
        assert_eq!(Function::from_key(Key::Sin, true), Some(Function::Asin));
        assert_eq!(Function::from_key(Key::Log, true), Some(Function::Log));
        assert_eq!(Function::from_key(Key::Arc, false), None);
        assert_eq!(Function::from_key(Key::Add, false), None);
        assert!(Function::Atan.is_trig());
        assert!(!Function::Sqrt.is_trig());
    }

    #[test]
    fn test_operator_from_key() {
        assert_eq!(Operator::from_key(Key::Divide), Some(Operator::Divide));
        assert_eq!(Operator::from_key(Key::Enter), None);
        assert!(!Operator::Power.pulls());
        assert!(Operator::Subtract.pulls());
    }

    #[test]
    fn test_logs_and_roots() {
        assert_eq!(shown(monadic(Function::Log, "1000")), "3");
        assert_eq!(shown(monadic(Function::Ln, "10")), "2.302585093");
        assert_eq!(shown(monadic(Function::Exp, "1")), "2.718281828");
        assert_eq!(shown(monadic(Function::Sqrt, "2")), "1.414213562");
        assert_eq!(shown(monadic(Function::Reciprocal, "4")), "0.25");
    }

    #[test]
    fn test_exact_quadrants() {
        assert_eq!(monadic(Function::Sin, "180"), Ok(Decimal::zero()));
        assert_eq!(monadic(Function::Sin, "-90"), Ok(Decimal::from(-1i64)));
        assert_eq!(monadic(Function::Sin, "450"), Ok(Decimal::one()));
        assert_eq!(monadic(Function::Cos, "90"), Ok(Decimal::zero()));
        assert_eq!(monadic(Function::Cos, "-180"), Ok(Decimal::from(-1i64)));
        assert_eq!(monadic(Function::Tan, "180"), Ok(Decimal::zero()));
        assert_eq!(monadic(Function::Tan, "90"), Err(ErrorKind::DivisionByZero));
        assert_eq!(monadic(Function::Tan, "-270"), Err(ErrorKind::DivisionByZero));
    }

    #[test]
    fn test_trig_in_degrees() {
        assert_eq!(shown(monadic(Function::Sin, "30")), "0.5000000000");
        assert_eq!(shown(monadic(Function::Cos, "60")), "0.5000000000");
        assert_eq!(shown(monadic(Function::Tan, "45")), "1.000000000");
        assert_eq!(shown(monadic(Function::Sin, "1")), "0.01745240644");
        assert_eq!(shown(monadic(Function::Sin, "390")), "0.5000000000");
        assert_eq!(shown(monadic(Function::Cos, "-120")), "-0.5000000000");
    }

    #[test]
    fn test_inverse_trig_in_degrees() {
        assert_eq!(shown(monadic(Function::Asin, "0.5")), "30.00000000");
        assert_eq!(shown(monadic(Function::Asin, "-1")), "-90.00000000");
        assert_eq!(shown(monadic(Function::Acos, "0")), "90.00000000");
        assert_eq!(shown(monadic(Function::Atan, "1")), "45.00000000");
        assert_eq!(monadic(Function::Acos, "1"), Ok(Decimal::zero()));
    }

    #[test]
    fn test_domain_faults() {
        assert_eq!(monadic(Function::Sqrt, "-4"), Err(ErrorKind::InvalidOperation));
        assert_eq!(monadic(Function::Log, "-1"), Err(ErrorKind::InvalidOperation));
        assert_eq!(monadic(Function::Asin, "2"), Err(ErrorKind::InvalidOperation));
        assert_eq!(monadic(Function::Reciprocal, "0"), Err(ErrorKind::DivisionByZero));
        assert_eq!(monadic(Function::Ln, "0"), Err(ErrorKind::InfiniteValue));
        assert_eq!(monadic(Function::Exp, "1000"), Err(ErrorKind::Overflow));
    }

    #[test]
    fn test_dyadic() {
        let ops = ops();
        let (x, y) = (dec("3"), dec("5"));
        assert_eq!(ops.dyadic(Operator::Subtract, &x, &y), Ok(dec("2")));
        assert_eq!(ops.dyadic(Operator::Add, &x, &y), Ok(dec("8")));
        assert_eq!(ops.dyadic(Operator::Multiply, &x, &y), Ok(dec("15")));
        assert_eq!(shown(ops.dyadic(Operator::Divide, &x, &y)), "1.666666667");
        // X ** Y
        assert_eq!(ops.dyadic(Operator::Power, &x, &y), Ok(dec("243")));
    }

    #[test]
    fn test_dyadic_faults() {
        let ops = ops();
        let zero = Decimal::zero();
        assert_eq!(
            ops.dyadic(Operator::Divide, &zero, &dec("5")),
            Err(ErrorKind::DivisionByZero)
        );
        assert_eq!(
            ops.dyadic(Operator::Divide, &zero, &zero),
            Err(ErrorKind::InvalidOperation)
        );
        assert_eq!(
            ops.dyadic(Operator::Multiply, &dec("1E60"), &dec("1E60")),
            Err(ErrorKind::Overflow)
        );
        assert_eq!(
            ops.dyadic(Operator::Power, &zero, &dec("-1")),
            Err(ErrorKind::InfiniteValue)
        );
    }

    #[test]
    fn test_pi() {
        let ops = ops();
        assert_eq!(ops.pi().unwrap().to_string(), "3.1415926535897932385");
        assert_eq!(ops.pi(), ops.pi());
        assert_eq!(ops.guard_pi.to_string(), "3.141592653589793238462643");
    }
}
