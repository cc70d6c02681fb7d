//! Display presenter
//!
//! Turns engine responses into readout updates. Errors blink the display
//! (dots, blank, dots) before latching their status; transient status
//! messages time out, and the startup banner is shown once.

use embedded_hal::delay::DelayNs;

use crate::codec::DisplayText;
use crate::config::CalculatorConfig;
use crate::engine::{Response, Status};
use crate::traits::{Readout, ReadoutError};

/// Startup banner text
pub const READY_BANNER: &str = "... READY ...";

/// Presenter timing in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Interval between error blink frames
    pub flash_interval_ms: u32,
    /// Transient status duration
    pub status_ms: u32,
    /// Startup banner duration
    pub ready_ms: u32,
}

impl From<&CalculatorConfig> for Timing {
    fn from(config: &CalculatorConfig) -> Self {
        Self {
            flash_interval_ms: config.flash_interval_ms,
            status_ms: config.status_ms,
            ready_ms: config.ready_ms,
        }
    }
}

/// Drives a readout from engine responses
pub struct Presenter<R: Readout, D: DelayNs> {
    readout: R,
    delay: D,
    timing: Timing,
}

impl<R: Readout, D: DelayNs> Presenter<R, D> {
    /// Create a presenter
    pub fn new(readout: R, delay: D, timing: Timing) -> Self {
        Self {
            readout,
            delay,
            timing,
        }
    }

    /// Show the startup display with the ready banner
    pub fn ready(&mut self, display: &DisplayText) -> Result<(), ReadoutError> {
        self.readout.show(display)?;
        self.show_status(&Status::transient(READY_BANNER), self.timing.ready_ms)
    }

    /// Render one response
    ///
    /// The previous status is cleared first, as every key press does.
    pub fn render(&mut self, response: &Response) -> Result<(), ReadoutError> {
        self.readout.clear_status()?;
        if response.flash {
            self.blink()?;
        }
        self.readout.show(&response.display)?;
        match &response.status {
            Some(status) => self.show_status(status, self.timing.status_ms),
            None => Ok(()),
        }
    }

    /// Dots, blank, then the caller's final frame
    fn blink(&mut self) -> Result<(), ReadoutError> {
        self.readout.show(&DisplayText::flash())?;
        self.delay.delay_ms(self.timing.flash_interval_ms);
        self.readout.show(&DisplayText::blank())?;
        self.delay.delay_ms(self.timing.flash_interval_ms);
        Ok(())
    }

    /// Latch the status, or show it for `duration_ms` when transient
    fn show_status(&mut self, status: &Status, duration_ms: u32) -> Result<(), ReadoutError> {
        self.readout.status(&status.text, status.hold)?;
        if !status.hold {
            self.delay.delay_ms(duration_ms);
            self.readout.clear_status()?;
        }
        Ok(())
    }

    /// Borrow the readout
    pub fn readout(&self) -> &R {
        &self.readout
    }

    /// Give back the readout and delay
    pub fn release(self) -> (R, D) {
        (self.readout, self.delay)
    }
}
