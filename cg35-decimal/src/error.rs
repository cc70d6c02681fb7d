//! Error conditions raised by decimal operations

use core::fmt;

/// Exceptional conditions that abort an operation
///
/// Underflow and inexact results are not errors; they quietly produce
/// subnormal or rounded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecimalError {
    /// Finite non-zero dividend with a zero divisor
    DivisionByZero,
    /// Argument outside the domain of the operation
    InvalidOperation,
    /// Adjusted exponent of the rounded result exceeds `emax`
    Overflow,
}

impl fmt::Display for DecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecimalError::DivisionByZero => "DivisionByZero",
            DecimalError::InvalidOperation => "InvalidOperation",
            DecimalError::Overflow => "Overflow",
        };
        f.write_str(name)
    }
}

impl core::error::Error for DecimalError {}

/// Errors from parsing a decimal literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseDecimalError {
    /// No digits in the coefficient
    Empty,
    /// Character that is not part of a decimal literal
    InvalidDigit,
    /// Exponent does not fit the exponent type
    ExponentOutOfRange,
}

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDecimalError::Empty => f.write_str("no digits in decimal literal"),
            ParseDecimalError::InvalidDigit => f.write_str("invalid character in decimal literal"),
            ParseDecimalError::ExponentOutOfRange => f.write_str("decimal exponent out of range"),
        }
    }
}

impl core::error::Error for ParseDecimalError {}
