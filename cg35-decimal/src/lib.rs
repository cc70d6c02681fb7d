//! Arbitrary precision decimal arithmetic for the calculator core
//!
//! This crate provides the number type behind the stack registers:
//!
//! - `Decimal`: sign, arbitrary precision coefficient and decimal exponent,
//!   plus infinities and NaN
//! - `Context`: precision, exponent bounds and rounding applied to every result
//! - Basic arithmetic with the General Decimal Arithmetic exponent rules
//! - Square root, logarithms, exponential, power and trigonometry evaluated in
//!   scaled-integer fixed point and rounded once to the context
//!
//! Values are exact until a context operation rounds them. Parsing never
//! rounds; `Context::round` is the explicit rescale used at precision
//! boundaries.
//!
//! ```
//! use cg35_decimal::{Context, Decimal};
//!
//! let cx = Context::new(10).with_exponent_range(-99, 99);
//! let one: Decimal = "1".parse().unwrap();
//! let three: Decimal = "3".parse().unwrap();
//! let third = cx.div(&one, &three).unwrap();
//! assert_eq!(third.to_string(), "0.3333333333");
//! ```

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

mod context;
mod error;
mod fixed;
mod functions;
mod number;
mod trig;

pub use context::{Context, Rounding};
pub use error::{DecimalError, ParseDecimalError};
pub use number::Decimal;
