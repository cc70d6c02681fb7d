//! Collaborator traits
//!
//! These traits define the interface between the engine and whatever
//! shows the display and produces key presses.

pub mod keypad;
pub mod readout;

pub use keypad::{Keypad, KeypadError};
pub use readout::{Readout, ReadoutError};
