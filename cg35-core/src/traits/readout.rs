//! Readout trait for the bubble display and status area

use crate::codec::DisplayText;

/// Errors that can occur while updating the readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadoutError {
    /// Display did not accept the update
    Write,
    /// Display not connected
    Disconnected,
}

impl core::fmt::Display for ReadoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReadoutError::Write => f.write_str("readout write failed"),
            ReadoutError::Disconnected => f.write_str("readout disconnected"),
        }
    }
}

impl core::error::Error for ReadoutError {}

/// Trait for the calculator readout
///
/// The readout is dumb: it shows whatever 15 characters it is given and a
/// short status line. Timing is handled by the presenter.
pub trait Readout {
    /// Show display text
    fn show(&mut self, text: &DisplayText) -> Result<(), ReadoutError>;

    /// Show a status message
    ///
    /// `hold` marks a message latched until the next key.
    fn status(&mut self, text: &str, hold: bool) -> Result<(), ReadoutError>;

    /// Clear the status area
    fn clear_status(&mut self) -> Result<(), ReadoutError>;
}
