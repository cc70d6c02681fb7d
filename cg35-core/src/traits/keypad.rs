//! Keypad trait

use crate::keys::Key;

/// Errors that can occur while reading keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeypadError {
    /// Key source failed
    Read,
}

impl core::fmt::Display for KeypadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KeypadError::Read => f.write_str("keypad read failed"),
        }
    }
}

impl core::error::Error for KeypadError {}

/// Trait for key sources
pub trait Keypad {
    /// Block until the next key press
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    fn next_key(&mut self) -> Result<Option<Key>, KeypadError>;
}
