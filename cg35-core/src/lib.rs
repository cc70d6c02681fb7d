//! Board-agnostic core of the CG-35 calculator
//!
//! This crate contains everything between a key press and the text on the
//! bubble display, without depending on a particular board:
//!
//! - Display codec (15-character display text to and from decimal values)
//! - RPN engine: four-register stack, entry buffer and key-driven state machine
//! - Key vocabulary
//! - Display presenter (error blink and status timing)
//! - Collaborator traits for the readout and keypad
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod codec;
pub mod config;
pub mod display;
pub mod engine;
pub mod keys;
pub mod traits;

pub use codec::{DisplayCodec, DisplayText};
pub use config::CalculatorConfig;
pub use display::{Presenter, Timing};
pub use engine::{Calculator, Response, Status};
pub use keys::Key;
pub use traits::{Keypad, Readout};
